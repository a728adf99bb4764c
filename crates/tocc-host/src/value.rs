//! Host value representation
//!
//! - None, Bool, Int, Float: immediate values
//! - Str: reference-counted host text (`HostStr`)
//! - List, Dict: reference-counted mutable containers (`Arc<Mutex<..>>`),
//!   reference semantics like the host's own containers
//! - Object: reference-counted opaque object owned by a binding module
//!
//! Cloning a `Value` is how the host takes a new reference; dropping it
//! releases one. `ref_count()` exposes the count for heap values.

use crate::object::{HostObject, ObjectRef};
use crate::text::HostStr;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Host list. Clones share the same storage.
#[derive(Clone, Default)]
pub struct ValueList(Arc<Mutex<Vec<Value>>>);

impl ValueList {
    pub fn new() -> Self {
        ValueList::default()
    }

    /// Allocate storage for exactly `len` elements up front
    pub fn with_capacity(len: usize) -> Self {
        ValueList(Arc::new(Mutex::new(Vec::with_capacity(len))))
    }

    pub fn from_vec(values: Vec<Value>) -> Self {
        ValueList(Arc::new(Mutex::new(values)))
    }

    pub fn len(&self) -> usize {
        lock(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.0).is_empty()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.0).capacity()
    }

    /// New reference to the element at `index`
    pub fn get(&self, index: usize) -> Option<Value> {
        lock(&self.0).get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        lock(&self.0).push(value);
    }

    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut items = lock(&self.0);
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the element references, in order
    pub fn snapshot(&self) -> Vec<Value> {
        lock(&self.0).clone()
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &ValueList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ValueList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.snapshot() == other.snapshot()
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        ValueList::from_vec(iter.into_iter().collect())
    }
}

/// Host dict keyed by text. Clones share the same storage.
#[derive(Clone, Default)]
pub struct ValueDict(Arc<Mutex<HashMap<HostStr, Value>>>);

impl ValueDict {
    pub fn new() -> Self {
        ValueDict::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.0).is_empty()
    }

    pub fn insert(&self, key: HostStr, value: Value) -> Option<Value> {
        lock(&self.0).insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        lock(&self.0).get(&HostStr::from(key)).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        lock(&self.0).contains_key(&HostStr::from(key))
    }

    /// Copy of the entries (unordered)
    pub fn entries(&self) -> Vec<(HostStr, Value)> {
        lock(&self.0)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for ValueDict {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        // Neither lock may be held while nested values compare
        let mine = lock(&self.0).clone();
        let theirs = lock(&other.0).clone();
        mine == theirs
    }
}

/// Host runtime value
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(HostStr),
    List(ValueList),
    Dict(ValueDict),
    Object(ObjectRef),
}

impl Value {
    /// Create a host string value
    pub fn str(s: impl Into<HostStr>) -> Self {
        Value::Str(s.into())
    }

    /// Create a host list from values
    pub fn list(values: Vec<Value>) -> Self {
        Value::List(ValueList::from_vec(values))
    }

    /// Create a host list of strings
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<HostStr>,
    {
        Value::List(items.into_iter().map(|s| Value::Str(s.into())).collect())
    }

    pub fn object<T: HostObject>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Runtime type name, as used in type-error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Object(obj) => obj.type_object().name,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&HostStr> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ValueList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&ValueDict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Downcast an object value to its concrete binding type
    pub fn downcast_ref<T: HostObject>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Reference count of heap values; `None` for immediates
    pub fn ref_count(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.ref_count()),
            Value::List(list) => Some(list.ref_count()),
            Value::Dict(dict) => Some(dict.ref_count()),
            Value::Object(obj) => Some(Arc::strong_count(obj)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(list) => f.debug_list().entries(list.snapshot()).finish(),
            Value::Dict(dict) => f.debug_map().entries(dict.entries()).finish(),
            Value::Object(obj) => write!(f, "<{} object>", obj.type_object().name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

impl From<HostStr> for Value {
    fn from(s: HostStr) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::list(values)
    }
}
