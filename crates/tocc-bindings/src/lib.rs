//! Tocc host bindings
//!
//! Two host modules expose the tocc engine to the host runtime:
//!
//! - `file_info`: the `FileInfo` handle type. Publishes the capability table
//!   `file_info._C_API` at load time.
//! - `manager`: the `Manager` front end. Resolves the capability table at load
//!   time and fails to load if `file_info` is not loaded.
//!
//! # Example
//!
//! ```
//! use tocc_bindings::install;
//! use tocc_config::BindingsConfig;
//! use tocc_host::{call_method, CallArgs, Host, Value};
//!
//! let mut host = Host::new();
//! install(&mut host, &BindingsConfig::default()).unwrap();
//!
//! let manager = host
//!     .construct("manager", "Manager", &CallArgs::new().arg("/srv/tocc"))
//!     .unwrap();
//! call_method(&manager, "initialize", &CallArgs::new()).unwrap();
//! let file = call_method(&manager, "import_file", &CallArgs::new().arg("/tmp/a.txt")).unwrap();
//! assert_eq!(
//!     call_method(&file, "get_id", &CallArgs::new()).unwrap(),
//!     Value::from("0000001")
//! );
//! ```

pub mod capi;
pub mod convert;
pub mod dispatch;
pub mod file_info;
pub mod logging;
pub mod manager;

pub use capi::{CapabilityTable, FileInfoApi};
pub use convert::FileIdArray;
pub use dispatch::{FilesArgument, ResolvedFiles};
pub use file_info::FileInfoModule;
pub use manager::ManagerModule;

use tocc_config::BindingsConfig;
use tocc_host::{Host, HostResult};

/// Set up logging and load `file_info` then `manager` into `host`
pub fn install(host: &mut Host, config: &BindingsConfig) -> HostResult<()> {
    logging::init(config);
    host.load_module(&FileInfoModule)?;
    host.load_module(&ManagerModule::from_config(config))?;
    Ok(())
}
