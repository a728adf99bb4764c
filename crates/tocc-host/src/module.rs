//! Host modules, capsules and the module registry
//!
//! A binding module is described by a [`ModuleDef`]. Loading it through
//! [`Host::load_module`] runs its init once and registers the resulting
//! [`Module`] under its name. A module publishes types (with constructors)
//! and attributes; a [`Capsule`] attribute carries an opaque payload other
//! modules resolve by its fully qualified name (`module.attribute`) at their
//! own load time.
//!
//! # Examples
//!
//! ```
//! use tocc_host::module::{Capsule, Host, Module, ModuleDef};
//! use tocc_host::HostResult;
//!
//! struct Answer;
//!
//! impl ModuleDef for Answer {
//!     fn name(&self) -> &'static str {
//!         "answer"
//!     }
//!
//!     fn init(&self, _host: &Host) -> HostResult<Module> {
//!         Ok(Module::new("answer", "The answer.")
//!             .with_capsule("_C_API", Capsule::new("answer._C_API", 42u32)))
//!     }
//! }
//!
//! let mut host = Host::new();
//! host.load_module(&Answer).unwrap();
//! let capsule = host.import_capsule("answer._C_API").unwrap();
//! assert_eq!(*capsule.pointer::<u32>("answer._C_API").unwrap(), 42);
//! ```

use crate::args::CallArgs;
use crate::error::{HostError, HostResult};
use crate::object::TypeObject;
use crate::value::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor of a host type: builds a new object from call arguments
pub type Constructor = Arc<dyn Fn(&CallArgs) -> HostResult<Value> + Send + Sync>;

/// Opaque named payload published by one module for others
#[derive(Clone)]
pub struct Capsule {
    name: String,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Capsule {
    pub fn new<T: Any + Send + Sync>(name: impl Into<String>, payload: T) -> Self {
        Self {
            name: name.into(),
            payload: Arc::new(payload),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload, checked against the expected capsule name and type
    pub fn pointer<T: Any + Send + Sync>(&self, expected_name: &str) -> HostResult<Arc<T>> {
        if self.name != expected_name {
            return Err(HostError::import_error(format!(
                "capsule name mismatch: expected '{}', found '{}'",
                expected_name, self.name
            )));
        }
        Arc::clone(&self.payload).downcast::<T>().map_err(|_| {
            HostError::import_error(format!(
                "capsule '{}' does not hold the expected table type",
                self.name
            ))
        })
    }
}

impl std::fmt::Debug for Capsule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capsule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A type registered in a module
#[derive(Clone)]
pub struct RegisteredType {
    pub object: &'static TypeObject,
    pub constructor: Option<Constructor>,
}

/// Module attribute
#[derive(Clone)]
pub enum Attribute {
    Type(RegisteredType),
    Capsule(Capsule),
    Value(Value),
}

/// A loaded (or loading) host module
#[derive(Clone)]
pub struct Module {
    name: &'static str,
    doc: &'static str,
    attributes: HashMap<String, Attribute>,
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Module {
    pub fn new(name: &'static str, doc: &'static str) -> Self {
        Self {
            name,
            doc,
            attributes: HashMap::new(),
        }
    }

    /// Register a type under its unqualified name
    pub fn with_type(mut self, object: &'static TypeObject, constructor: Option<Constructor>) -> Self {
        self.attributes.insert(
            object.short_name().to_string(),
            Attribute::Type(RegisteredType {
                object,
                constructor,
            }),
        );
        self
    }

    pub fn with_capsule(mut self, attribute: impl Into<String>, capsule: Capsule) -> Self {
        self.attributes
            .insert(attribute.into(), Attribute::Capsule(capsule));
        self
    }

    pub fn with_value(mut self, attribute: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(attribute.into(), Attribute::Value(value));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn get_type(&self, name: &str) -> HostResult<&RegisteredType> {
        match self.attributes.get(name) {
            Some(Attribute::Type(ty)) => Ok(ty),
            _ => Err(HostError::attribute_error(format!(
                "module '{}' has no type '{}'",
                self.name, name
            ))),
        }
    }
}

/// How a binding module initializes itself
pub trait ModuleDef {
    fn name(&self) -> &'static str;

    /// Build the module. May resolve capsules of already loaded modules
    /// through `host`; an error aborts the load.
    fn init(&self, host: &Host) -> HostResult<Module>;
}

/// Registry of loaded modules
#[derive(Default)]
pub struct Host {
    modules: HashMap<&'static str, Arc<Module>>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `def` unless a module of that name is already loaded
    ///
    /// A failed init leaves nothing registered.
    pub fn load_module(&mut self, def: &dyn ModuleDef) -> HostResult<Arc<Module>> {
        if let Some(module) = self.modules.get(def.name()) {
            return Ok(Arc::clone(module));
        }

        let module = match def.init(self) {
            Ok(module) => Arc::new(module),
            Err(err) => {
                tracing::warn!(
                    target: "tocc.host",
                    module = def.name(),
                    error = %err,
                    "module initialization failed"
                );
                return Err(err.with_context(format!("loading module '{}'", def.name())));
            }
        };
        tracing::info!(target: "tocc.host", module = def.name(), "module loaded");
        self.modules.insert(def.name(), Arc::clone(&module));
        Ok(module)
    }

    pub fn module(&self, name: &str) -> Option<Arc<Module>> {
        self.modules.get(name).cloned()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Resolve a capsule by its fully qualified name `module.attribute`
    ///
    /// The module must already be loaded; nothing is loaded on demand.
    pub fn import_capsule(&self, qualified_name: &str) -> HostResult<Capsule> {
        let (module_name, attribute) = qualified_name.rsplit_once('.').ok_or_else(|| {
            HostError::import_error(format!("invalid capsule name '{}'", qualified_name))
        })?;

        let module = self.modules.get(module_name).ok_or_else(|| {
            HostError::import_error(format!("No module named '{}'", module_name))
        })?;

        match module.attribute(attribute) {
            Some(Attribute::Capsule(capsule)) if capsule.name() == qualified_name => {
                tracing::debug!(target: "tocc.host", capsule = qualified_name, "capsule resolved");
                Ok(capsule.clone())
            }
            Some(Attribute::Capsule(capsule)) => Err(HostError::import_error(format!(
                "capsule name mismatch: expected '{}', found '{}'",
                qualified_name,
                capsule.name()
            ))),
            Some(_) => Err(HostError::import_error(format!(
                "'{}' is not a capsule",
                qualified_name
            ))),
            None => Err(HostError::import_error(format!(
                "module '{}' has no attribute '{}'",
                module_name, attribute
            ))),
        }
    }

    /// Instantiate `module.type_name` with `args`
    pub fn construct(&self, module: &str, type_name: &str, args: &CallArgs) -> HostResult<Value> {
        let loaded = self
            .modules
            .get(module)
            .ok_or_else(|| HostError::import_error(format!("No module named '{}'", module)))?;
        let ty = loaded.get_type(type_name)?;
        let constructor = ty.constructor.as_ref().ok_or_else(|| {
            HostError::type_error(format!("cannot create '{}' instances", ty.object.name))
        })?;
        constructor(args)
    }
}
