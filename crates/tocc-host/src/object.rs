//! Opaque host objects and their type descriptors
//!
//! A binding module defines a concrete Rust type, implements [`HostObject`]
//! for it and describes its host-visible surface with a static
//! [`TypeObject`]: the qualified type name, a doc string and a method table.

use crate::args::CallArgs;
use crate::error::{HostError, HostResult};
use crate::value::Value;
use std::any::Any;
use std::sync::Arc;

/// Shared reference to a host object
pub type ObjectRef = Arc<dyn HostObject>;

/// Method implementation: receives the receiver value and the call arguments
pub type MethodFn = fn(&Value, &CallArgs) -> HostResult<Value>;

/// One entry of a type's method table
#[derive(Clone, Copy)]
pub struct MethodDef {
    pub name: &'static str,
    pub doc: &'static str,
    pub call: MethodFn,
}

impl std::fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Host-visible description of a binding type
#[derive(Debug)]
pub struct TypeObject {
    /// Module-qualified name, e.g. `file_info.FileInfo`
    pub name: &'static str,
    pub doc: &'static str,
    pub methods: &'static [MethodDef],
}

impl TypeObject {
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Unqualified type name (`FileInfo` for `file_info.FileInfo`)
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit('.').next().unwrap_or(self.name)
    }
}

/// Implemented by every concrete object type a binding module exposes
pub trait HostObject: Any + Send + Sync + 'static {
    fn type_object(&self) -> &'static TypeObject;

    fn as_any(&self) -> &dyn Any;
}

/// True if `value` is an object whose type is exactly `ty`
pub fn is_instance(value: &Value, ty: &'static TypeObject) -> bool {
    match value {
        Value::Object(obj) => std::ptr::eq(obj.type_object(), ty),
        _ => false,
    }
}

/// Look up `name` in the receiver's method table and call it
pub fn call_method(receiver: &Value, name: &str, args: &CallArgs) -> HostResult<Value> {
    let Value::Object(obj) = receiver else {
        return Err(HostError::attribute_error(format!(
            "'{}' object has no attribute '{}'",
            receiver.type_name(),
            name
        )));
    };

    let ty = obj.type_object();
    let method = ty.method(name).ok_or_else(|| {
        HostError::attribute_error(format!(
            "'{}' object has no attribute '{}'",
            ty.short_name(),
            name
        ))
    })?;

    tracing::trace!(target: "tocc.host", type_name = ty.name, method = name, "calling method");
    (method.call)(receiver, args)
}
