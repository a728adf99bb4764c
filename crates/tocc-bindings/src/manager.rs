//! `manager` module: the `Manager` front end
//!
//! A `Manager` owns one engine session over a base path. Each host method
//! parses and converts its arguments, makes one engine call and converts the
//! result back. Engine failures are translated into host errors carrying the
//! engine error's class name and the operation that failed.
//!
//! The module resolves the `file_info` capability table when it loads, so
//! `file_info` must be loaded first.

use crate::capi::FileInfoApi;
use crate::convert::{self, build_file_id_collection, build_tag_collection};
use crate::dispatch::ResolvedFiles;
use std::any::Any;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tocc_config::BindingsConfig;
use tocc_engine::{memory_engine_factory, Engine, EngineError, EngineFactory, EngineResult};
use tocc_host::{
    no_args, parse_args, CallArgs, Constructor, Host, HostError, HostObject, HostResult,
    MethodDef, Module, ModuleDef, Param, RefGuard, TypeObject, Value,
};

pub const MODULE_NAME: &str = "manager";

const MODULE_DOC: &str = "Defines Manager class.";

struct ManagerObject {
    api: FileInfoApi,
    engine: Mutex<Box<dyn Engine>>,
}

impl ManagerObject {
    fn open(
        api: FileInfoApi,
        factory: &EngineFactory,
        require_absolute: bool,
        args: &CallArgs,
    ) -> HostResult<Value> {
        let parsed = parse_args("Manager", args, &MANAGER_PARAMS)?;
        let base_path = convert::required_text(&parsed, "base_path")?;

        if require_absolute && !Path::new(&base_path).is_absolute() {
            return Err(HostError::value_error(format!(
                "base_path must be an absolute path: {}",
                base_path
            )));
        }

        let engine = factory(Path::new(&base_path)).map_err(|err| engine_error("Manager", err))?;
        tracing::debug!(target: "tocc.manager", base_path = %base_path, "manager opened");

        Ok(Value::object(ManagerObject {
            api,
            engine: Mutex::new(engine),
        }))
    }

    fn engine(&self) -> MutexGuard<'_, Box<dyn Engine>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one engine call, translating its failure
    fn call<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut dyn Engine) -> EngineResult<T>,
    ) -> HostResult<T> {
        let mut engine = self.engine();
        tracing::trace!(target: "tocc.manager", operation, "engine call");
        f(&mut **engine).map_err(|err| engine_error(operation, err))
    }
}

impl Drop for ManagerObject {
    fn drop(&mut self) {
        let engine = self.engine();
        tracing::debug!(
            target: "tocc.manager",
            base_path = %engine.base_path().display(),
            "manager released"
        );
    }
}

impl HostObject for ManagerObject {
    fn type_object(&self) -> &'static TypeObject {
        &MANAGER_TYPE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn engine_error(operation: &'static str, err: EngineError) -> HostError {
    tracing::debug!(
        target: "tocc.manager",
        operation,
        class = err.class_name(),
        error = %err,
        "engine call failed"
    );
    HostError::engine(err.class_name(), err.to_string()).with_context(operation)
}

fn this(receiver: &Value) -> HostResult<&ManagerObject> {
    receiver.downcast_ref::<ManagerObject>().ok_or_else(|| {
        HostError::type_error(format!(
            "descriptor requires a '{}' object but received '{}'",
            MANAGER_TYPE.name,
            receiver.type_name()
        ))
    })
}

static MANAGER_PARAMS: [Param; 1] = [Param::required("base_path")];
static FILE_ID_PARAMS: [Param; 1] = [Param::required("file_id")];
static TRADITIONAL_PATH_PARAMS: [Param; 1] = [Param::required("traditional_path")];
static IMPORT_FILE_PARAMS: [Param; 4] = [
    Param::required("source_path"),
    Param::optional("title"),
    Param::optional("traditional_path"),
    Param::optional("tags"),
];
static FILE_IDS_PARAMS: [Param; 1] = [Param::required("file_ids")];
static FILE_IDS_TAGS_PARAMS: [Param; 2] = [Param::required("file_ids"), Param::required("tags")];
static SET_TITLE_PARAMS: [Param; 2] = [Param::required("file_ids"), Param::required("title")];
static STATISTICS_PARAMS: [Param; 1] = [Param::optional("files")];

fn manager_initialize(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("initialize", args)?;
    this(receiver)?.call("initialize", |engine| engine.initialize())?;
    Ok(Value::None)
}

fn manager_get_file_info(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("get_file_info", args, &FILE_ID_PARAMS)?;
    let file_id = convert::required_text(&parsed, "file_id")?;

    let file_info = manager.call("get_file_info", |engine| engine.get_file_info(&file_id))?;
    Ok(manager.api.create(&file_info))
}

fn manager_get_file_by_traditional_path(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("get_file_by_traditional_path", args, &TRADITIONAL_PATH_PARAMS)?;
    let traditional_path = convert::required_text(&parsed, "traditional_path")?;

    let file_info = manager.call("get_file_by_traditional_path", |engine| {
        engine.get_file_by_traditional_path(&traditional_path)
    })?;
    Ok(manager.api.create(&file_info))
}

fn manager_import_file(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("import_file", args, &IMPORT_FILE_PARAMS)?;
    let source_path = convert::required_text(&parsed, "source_path")?;
    let title = convert::optional_text(&parsed, "title", "")?;
    let traditional_path = convert::optional_text(&parsed, "traditional_path", "")?;

    // Keeps the caller's tag list alive until the engine call returns
    let tags_list = RefGuard::adopt_option(parsed.get("tags").filter(|v| !v.is_none()).cloned());
    let tags = match tags_list.get() {
        Some(value) => Some(build_tag_collection(value)?).filter(|tags| !tags.is_empty()),
        None => None,
    };

    let file_info = manager.call("import_file", |engine| {
        engine.import_file(&source_path, &title, &traditional_path, tags)
    })?;
    Ok(manager.api.create(&file_info))
}

fn manager_remove_file(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("remove_file", args, &FILE_ID_PARAMS)?;
    let file_id = convert::required_text(&parsed, "file_id")?;

    manager.call("remove_file", |engine| engine.remove_file(&file_id))?;
    Ok(Value::None)
}

fn manager_remove_files(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("remove_files", args, &FILE_IDS_PARAMS)?;
    let files = build_file_id_collection(parsed.required("file_ids")?, &manager.api)?;

    manager.call("remove_files", |engine| engine.remove_files(&files))?;
    Ok(Value::None)
}

fn manager_assign_tags(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("assign_tags", args, &FILE_IDS_TAGS_PARAMS)?;
    let files = build_file_id_collection(parsed.required("file_ids")?, &manager.api)?;
    let tags = build_tag_collection(parsed.required("tags")?)?;

    manager.call("assign_tags", |engine| engine.assign_tags(&files, tags))?;
    Ok(Value::None)
}

fn manager_unassign_tags(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("unassign_tags", args, &FILE_IDS_TAGS_PARAMS)?;
    let files = build_file_id_collection(parsed.required("file_ids")?, &manager.api)?;
    let tags = build_tag_collection(parsed.required("tags")?)?;

    manager.call("unassign_tags", |engine| engine.unassign_tags(&files, tags))?;
    Ok(Value::None)
}

fn manager_set_title(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("set_title", args, &SET_TITLE_PARAMS)?;
    let files = ResolvedFiles::resolve(Some(parsed.required("file_ids")?), &manager.api)?;
    let title = convert::required_text(&parsed, "title")?;

    manager.call("set_title", |engine| engine.set_titles(files.selection(), &title))?;
    Ok(Value::None)
}

fn manager_get_tags_statistics(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    let manager = this(receiver)?;
    let parsed = parse_args("get_tags_statistics", args, &STATISTICS_PARAMS)?;
    let files = ResolvedFiles::resolve(parsed.get("files"), &manager.api)?;

    let statistics = manager.call("get_tags_statistics", |engine| {
        engine.get_tags_statistics(files.selection())
    })?;
    Ok(convert::statistics_to_dict(&statistics))
}

static MANAGER_METHODS: [MethodDef; 10] = [
    MethodDef {
        name: "initialize",
        doc: "Initializes the specified base path.\n\
              This method should be called once in a new base path. Or else, you\n\
              can't work with that path.\n\
              \n\
              @raise DatabaseInitializationError: If path was already initialized,\n  \
              or there was something wrong with the path.",
        call: manager_initialize,
    },
    MethodDef {
        name: "get_file_info",
        doc: "Gets information of a file.\n\
              \n\
              @param file_id: (str) ID of the file to get.\n\
              \n\
              @return: FileInfo\n\
              \n\
              @raise DatabaseScriptLogicalError: if file not found.",
        call: manager_get_file_info,
    },
    MethodDef {
        name: "get_file_by_traditional_path",
        doc: "Gets information of the file whose traditional path matches\n\
              the specified one.\n\
              \n\
              @param traditional_path: (str) Path of the file to get.\n\
              \n\
              @return: FileInfo\n\
              \n\
              @raise DatabaseScriptLogicalError: if file not found.",
        call: manager_get_file_by_traditional_path,
    },
    MethodDef {
        name: "import_file",
        doc: "Imports a file from the path to the Tocc managed file system.\n\
              \n\
              @param source_path: (str) Path to the source file.\n\
              @keyword title: (str) title of the file.\n\
              @keyword traditional_path: (str) traditional path of the file.\n\
              @keyword tags: (list of str) Tags to assign to the file.\n\
              \n\
              @note: If you don't want to set title or traditional path,\n  \
              pass an empty string, not None.\n\
              \n\
              @return: FileInfo of the newly created file.",
        call: manager_import_file,
    },
    MethodDef {
        name: "remove_file",
        doc: "Deletes the specified file, both from database and file system.\n\
              \n\
              @param file_id: (str) ID of the file to delete.",
        call: manager_remove_file,
    },
    MethodDef {
        name: "remove_files",
        doc: "Deletes a list of files, both from database and file system.\n\
              Nothing is deleted if any of the files is not found.\n\
              \n\
              @param file_ids: (list of str or FileInfo) Files to delete.",
        call: manager_remove_files,
    },
    MethodDef {
        name: "assign_tags",
        doc: "Assigns a list of tags to a list of files.\n\
              It assigns all tags to each file.\n\
              \n\
              @param file_ids: (list of str or FileInfo) Files to assign tags to.\n\
              @param tags: (list of str) Tags to assign.",
        call: manager_assign_tags,
    },
    MethodDef {
        name: "unassign_tags",
        doc: "Unassigns a list of tags from a list of files.\n\
              It unassigns each tag from all of the files.\n\
              Raises an exception if any of the files is not found.\n\
              \n\
              @param file_ids: (list of str or FileInfo) Files to unassign tags from.\n\
              @param tags: (list of str) Tags to unassign.",
        call: manager_unassign_tags,
    },
    MethodDef {
        name: "set_title",
        doc: "Sets title of files.\n\
              \n\
              @param file_ids: A file ID (str), a FileInfo, or a list of them.\n  \
              None or an empty list sets the title of every file.\n\
              @param title: (str) Title to set.",
        call: manager_set_title,
    },
    MethodDef {
        name: "get_tags_statistics",
        doc: "Collects statistics (how many files assigned to each tag)\n\
              and returns it as a dict of tag to number of files.\n\
              If no arguments passed, it returns statistics of all files.\n\
              \n\
              @keyword files: A file ID (str), a FileInfo instance,\n  \
              or a list of file IDs or FileInfos (or a mix of them).",
        call: manager_get_tags_statistics,
    },
];

static MANAGER_TYPE: TypeObject = TypeObject {
    name: "manager.Manager",
    doc: "The front end of the Tocc.\n\n\
          To create an instance, call: Manager(base_path)\n\
          @param base_path: Base path of where tocc files kept.",
    methods: &MANAGER_METHODS,
};

/// Definition of the `manager` module
#[derive(Clone)]
pub struct ManagerModule {
    engine_factory: EngineFactory,
    require_absolute_base_path: bool,
}

impl ManagerModule {
    /// Manager backed by the in-memory engine
    pub fn new() -> Self {
        Self {
            engine_factory: memory_engine_factory(),
            require_absolute_base_path: true,
        }
    }

    pub fn from_config(config: &BindingsConfig) -> Self {
        Self::new().require_absolute_base_path(config.require_absolute_base_path())
    }

    pub fn with_engine_factory(mut self, factory: EngineFactory) -> Self {
        self.engine_factory = factory;
        self
    }

    pub fn require_absolute_base_path(mut self, require: bool) -> Self {
        self.require_absolute_base_path = require;
        self
    }
}

impl Default for ManagerModule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManagerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerModule")
            .field("require_absolute_base_path", &self.require_absolute_base_path)
            .finish_non_exhaustive()
    }
}

impl ModuleDef for ManagerModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn init(&self, host: &Host) -> HostResult<Module> {
        let api = FileInfoApi::import(host)?;
        let factory = Arc::clone(&self.engine_factory);
        let require_absolute = self.require_absolute_base_path;

        let constructor: Constructor =
            Arc::new(move |args: &CallArgs| ManagerObject::open(api, &factory, require_absolute, args));
        Ok(Module::new(MODULE_NAME, MODULE_DOC).with_type(&MANAGER_TYPE, Some(constructor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_info;
    use pretty_assertions::assert_eq;
    use tocc_host::ErrorKind;

    fn api() -> FileInfoApi {
        FileInfoApi::from_table(&file_info::capability_table()).unwrap()
    }

    fn open(path: &str, require_absolute: bool) -> HostResult<Value> {
        ManagerObject::open(
            api(),
            &memory_engine_factory(),
            require_absolute,
            &CallArgs::new().arg(path),
        )
    }

    #[test]
    fn test_relative_base_path_rejected() {
        let err = open("relative/dir", true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValueError);
        assert!(open("relative/dir", false).is_ok());
    }

    #[test]
    fn test_engine_error_translation() {
        let err = engine_error("get_file_info", EngineError::file_not_found("0000009"));
        assert_eq!(err.kind, ErrorKind::Engine("DatabaseScriptLogicalError"));
        assert_eq!(err.message, "file not found: 0000009");
        assert_eq!(err.context.as_deref(), Some("get_file_info"));
    }

    #[test]
    fn test_factory_failure_surfaces() {
        let failing: EngineFactory = Arc::new(|path: &Path| -> EngineResult<Box<dyn Engine>> {
            Err(EngineError::DatabaseInitialization(format!(
                "cannot open {}",
                path.display()
            )))
        });
        let err = ManagerObject::open(api(), &failing, true, &CallArgs::new().arg("/srv/x"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Engine("DatabaseInitializationError"));
        assert_eq!(err.context.as_deref(), Some("Manager"));
    }

    #[test]
    fn test_every_method_has_doc() {
        assert_eq!(MANAGER_TYPE.methods.len(), 10);
        for method in MANAGER_TYPE.methods {
            assert!(!method.doc.is_empty(), "{} has no doc", method.name);
        }
    }
}
