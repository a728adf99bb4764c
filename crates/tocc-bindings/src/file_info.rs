//! `file_info` module: the `FileInfo` handle type
//!
//! A handle owns a private copy of one native `FileInfo` and exposes it
//! through read-only accessors. The module also publishes the capability
//! table other binding modules use to create and inspect handles; the handle
//! type itself is not visible outside this module.

use crate::capi::{
    ApiSlot, CapabilityTable, FILE_INFO_API_ATTRIBUTE, FILE_INFO_API_VERSION,
    FILE_INFO_CAPSULE_NAME,
};
use crate::convert::{self, FileIdArray};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tocc_engine::{FileInfo, FileInfoCollection};
use tocc_host::{
    no_args, parse_args, CallArgs, Constructor, Host, HostError, HostObject, HostResult,
    MethodDef, Module, ModuleDef, Param, TypeObject, Value, ValueList,
};

pub const MODULE_NAME: &str = "file_info";

const MODULE_DOC: &str = "Defines FileInfo class.";

struct FileInfoObject {
    /// `None` once released
    file_info: Mutex<Option<Box<FileInfo>>>,
}

impl FileInfoObject {
    fn new(file_info: FileInfo) -> Self {
        Self {
            file_info: Mutex::new(Some(Box::new(file_info))),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Box<FileInfo>>> {
        self.file_info.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_info<T>(&self, f: impl FnOnce(&FileInfo) -> T) -> HostResult<T> {
        match self.slot().as_deref() {
            Some(file_info) => Ok(f(file_info)),
            None => Err(HostError::reference_error(
                "FileInfo object was already released",
            )),
        }
    }

    /// Drop the owned value. Later calls do nothing.
    fn release(&self) {
        if let Some(file_info) = self.slot().take() {
            tracing::trace!(target: "tocc.file_info", file_id = file_info.id(), "file info released");
        }
    }

    fn is_released(&self) -> bool {
        self.slot().is_none()
    }
}

impl HostObject for FileInfoObject {
    fn type_object(&self) -> &'static TypeObject {
        &FILE_INFO_TYPE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn this(receiver: &Value) -> HostResult<&FileInfoObject> {
    receiver.downcast_ref::<FileInfoObject>().ok_or_else(|| {
        HostError::type_error(format!(
            "descriptor requires a '{}' object but received '{}'",
            FILE_INFO_TYPE.name,
            receiver.type_name()
        ))
    })
}

fn file_info_get_id(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("get_id", args)?;
    this(receiver)?.with_info(|f| Value::str(f.id()))
}

fn file_info_get_title(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("get_title", args)?;
    this(receiver)?.with_info(|f| Value::str(f.title()))
}

fn file_info_get_traditional_path(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("get_traditional_path", args)?;
    this(receiver)?.with_info(|f| Value::str(f.traditional_path()))
}

fn file_info_get_physical_path(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("get_physical_path", args)?;
    this(receiver)?.with_info(|f| Value::str(f.physical_path()))
}

fn file_info_get_tags(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("get_tags", args)?;
    this(receiver)?.with_info(|f| convert::tags_to_list(f.tags()))
}

fn file_info_release(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("release", args)?;
    this(receiver)?.release();
    Ok(Value::None)
}

fn file_info_is_released(receiver: &Value, args: &CallArgs) -> HostResult<Value> {
    no_args("is_released", args)?;
    Ok(Value::Bool(this(receiver)?.is_released()))
}

static FILE_INFO_METHODS: [MethodDef; 7] = [
    MethodDef {
        name: "get_id",
        doc: "Returns ID of the file.\n\n@return: str",
        call: file_info_get_id,
    },
    MethodDef {
        name: "get_title",
        doc: "Returns Title of the file.\n\n@return: str",
        call: file_info_get_title,
    },
    MethodDef {
        name: "get_traditional_path",
        doc: "Returns Traditional Path of the file.\n\n@return: str",
        call: file_info_get_traditional_path,
    },
    MethodDef {
        name: "get_physical_path",
        doc: "Returns Physical Path of the file.\n\n@return: str",
        call: file_info_get_physical_path,
    },
    MethodDef {
        name: "get_tags",
        doc: "Returns list of tags assigned to this file.\n\n@return: list of str",
        call: file_info_get_tags,
    },
    MethodDef {
        name: "release",
        doc: "Releases the file information this object holds.\n\
              Calling any getter afterwards raises ReferenceError.\n\
              Calling it again does nothing.",
        call: file_info_release,
    },
    MethodDef {
        name: "is_released",
        doc: "Returns True if release() was called on this object.\n\n@return: bool",
        call: file_info_is_released,
    },
];

static FILE_INFO_TYPE: TypeObject = TypeObject {
    name: "file_info.FileInfo",
    doc: "Keeps information of a file.\nYou shouldn't create an instance of this class directly.",
    methods: &FILE_INFO_METHODS,
};

static FILE_INFO_PARAMS: [Param; 1] = [Param::required("file_id")];

/// `FileInfo(file_id)`: a handle knowing only its identifier
fn construct(args: &CallArgs) -> HostResult<Value> {
    let parsed = parse_args("FileInfo", args, &FILE_INFO_PARAMS)?;
    let file_id = convert::required_text(&parsed, "file_id")?;
    Ok(Value::object(FileInfoObject::new(FileInfo::new(file_id))))
}

fn is_instance(value: &Value) -> bool {
    tocc_host::is_instance(value, &FILE_INFO_TYPE)
}

fn wrap(file_info: &FileInfo) -> Value {
    Value::object(FileInfoObject::new(file_info.clone()))
}

/// Handles for `files`, in order, in a list allocated at its final length
fn wrap_list(files: &FileInfoCollection) -> Value {
    let items = ValueList::with_capacity(files.len());
    for file_info in files {
        items.push(wrap(file_info));
    }
    Value::List(items)
}

fn unwrap(value: &Value) -> Option<FileInfo> {
    value
        .downcast_ref::<FileInfoObject>()?
        .with_info(FileInfo::clone)
        .ok()
}

/// Identifier stored in a handle element, `None` for non-handles
fn handle_id(value: &Value) -> Option<HostResult<String>> {
    value
        .downcast_ref::<FileInfoObject>()
        .map(|obj| obj.with_info(|f| f.id().to_string()))
}

fn build_id_array(sequence: &Value) -> HostResult<FileIdArray> {
    convert::collect_file_ids(sequence, handle_id)
}

/// The table published as `file_info._C_API`
pub fn capability_table() -> CapabilityTable {
    CapabilityTable::new(
        FILE_INFO_CAPSULE_NAME,
        FILE_INFO_API_VERSION,
        vec![
            ApiSlot::IsInstance(is_instance),
            ApiSlot::Create(wrap),
            ApiSlot::CreateList(wrap_list),
            ApiSlot::BuildIdArray(build_id_array),
            ApiSlot::Unwrap(unwrap),
        ],
    )
}

/// Definition of the `file_info` module
#[derive(Debug, Default, Clone, Copy)]
pub struct FileInfoModule;

impl ModuleDef for FileInfoModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn init(&self, _host: &Host) -> HostResult<Module> {
        let table = capability_table();
        tracing::debug!(
            target: "tocc.file_info",
            capsule = FILE_INFO_CAPSULE_NAME,
            version = table.version(),
            slots = table.slots().len(),
            "publishing capability table"
        );

        let constructor: Constructor = Arc::new(construct);
        Ok(Module::new(MODULE_NAME, MODULE_DOC)
            .with_type(&FILE_INFO_TYPE, Some(constructor))
            .with_capsule(FILE_INFO_API_ATTRIBUTE, table.into_capsule()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tocc_engine::TagsCollection;
    use tocc_host::{call_method, ErrorKind};

    fn sample() -> FileInfo {
        FileInfo::with_details(
            "0000001",
            "A",
            "/home/a.txt",
            "/srv/tocc/00/00001",
            ["x", "y"].into_iter().collect::<TagsCollection>(),
        )
    }

    fn call(receiver: &Value, method: &str) -> HostResult<Value> {
        call_method(receiver, method, &CallArgs::new())
    }

    #[test]
    fn test_wrap_copies_value() {
        let mut source = sample();
        let handle = wrap(&source);
        source.set_title("changed");
        source.tags_mut().add_tag("z");

        assert_eq!(call(&handle, "get_title").unwrap(), Value::from("A"));
        assert_eq!(call(&handle, "get_tags").unwrap(), Value::str_list(["x", "y"]));
        assert_eq!(
            call(&handle, "get_physical_path").unwrap(),
            Value::from("/srv/tocc/00/00001")
        );
    }

    #[test]
    fn test_constructor_sets_only_id() {
        let handle = construct(&CallArgs::new().arg("0000abc")).unwrap();
        assert_eq!(call(&handle, "get_id").unwrap(), Value::from("0000abc"));
        assert_eq!(call(&handle, "get_title").unwrap(), Value::from(""));
        assert_eq!(call(&handle, "get_tags").unwrap(), Value::list(vec![]));
    }

    #[test]
    fn test_constructor_requires_text() {
        let err = construct(&CallArgs::new().arg(5i64)).unwrap_err();
        assert_eq!(err.message, "FileInfo() argument 'file_id' must be str, not int");
        let err = construct(&CallArgs::new()).unwrap_err();
        assert_eq!(err.message, "FileInfo() missing required argument 'file_id'");
    }

    #[test]
    fn test_release_is_idempotent() {
        let handle = wrap(&sample());
        assert_eq!(call(&handle, "is_released").unwrap(), Value::Bool(false));
        call(&handle, "release").unwrap();
        call(&handle, "release").unwrap();
        assert_eq!(call(&handle, "is_released").unwrap(), Value::Bool(true));

        let err = call(&handle, "get_id").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceError);
        assert!(unwrap(&handle).is_none());
    }

    #[test]
    fn test_accessors_take_no_arguments() {
        let handle = wrap(&sample());
        let err = call_method(&handle, "get_id", &CallArgs::new().arg(1i64)).unwrap_err();
        assert_eq!(err.message, "get_id() takes no arguments (1 given)");
    }

    #[test]
    fn test_every_method_has_doc() {
        for method in FILE_INFO_TYPE.methods {
            assert!(!method.doc.is_empty(), "{} has no doc", method.name);
        }
    }

    #[test]
    fn test_wrap_list_keeps_order() {
        let files: FileInfoCollection = ["b", "a", "c"].into_iter().map(FileInfo::new).collect();
        let list = wrap_list(&files);
        let items = list.as_list().unwrap().snapshot();
        let ids: Vec<_> = items.iter().map(|h| call(h, "get_id").unwrap()).collect();
        assert_eq!(ids, vec![Value::from("b"), Value::from("a"), Value::from("c")]);
        assert!(items.iter().all(is_instance));
    }

    #[test]
    fn test_wrap_list_allocates_exact_length() {
        let files: FileInfoCollection = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(FileInfo::new)
            .collect();
        let list = wrap_list(&files);
        let items = list.as_list().unwrap();
        assert_eq!(items.len(), files.len());
        assert_eq!(items.capacity(), files.len());
    }

    #[test]
    fn test_build_id_array_mixed() {
        let list = Value::list(vec![Value::from("0000001"), wrap(&FileInfo::new("0000002"))]);
        let ids = build_id_array(&list).unwrap();
        assert_eq!(ids.as_slice(), ["0000001".to_string(), "0000002".to_string()]);
    }

    #[test]
    fn test_build_id_array_released_handle() {
        let handle = wrap(&FileInfo::new("0000002"));
        call(&handle, "release").unwrap();
        let err = build_id_array(&Value::list(vec![handle])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceError);
        assert_eq!(err.context.as_deref(), Some("file_ids[0]"));
    }
}
