//! Tocc host runtime surface
//!
//! The dynamically-typed side of the tocc bindings:
//! - Host values (`Value`) with reference-counted text, lists, dicts and objects
//! - Opaque objects with static type descriptors and method tables
//! - Call arguments and signature parsing
//! - Scoped reference guard
//! - Modules, capsules and the module registry (`Host`)
//! - Host-visible errors

pub mod args;
pub mod error;
pub mod guard;
pub mod module;
pub mod object;
pub mod text;
pub mod value;

pub use args::{no_args, parse_args, CallArgs, Param, ParsedArgs};
pub use error::{ErrorKind, HostError, HostResult};
pub use guard::RefGuard;
pub use module::{Attribute, Capsule, Constructor, Host, Module, ModuleDef, RegisteredType};
pub use object::{call_method, is_instance, HostObject, MethodDef, MethodFn, ObjectRef, TypeObject};
pub use text::HostStr;
pub use value::{Value, ValueDict, ValueList};
