//! Argument-shape dispatch for "files" parameters
//!
//! Methods such as `set_title` and `get_tags_statistics` accept one
//! identifier, one handle, a list of either, or nothing at all. The host
//! value is classified once into a [`FilesArgument`] and then lowered to the
//! engine's [`FileSelection`] before any engine call.

use crate::capi::FileInfoApi;
use crate::convert::{self, FileIdArray};
use tocc_engine::{FileInfo, FileSelection};
use tocc_host::{HostError, HostResult, Value};

/// A classified "files" argument
#[derive(Debug, Clone, PartialEq)]
pub enum FilesArgument {
    /// Omitted, `None` or an empty list: every managed file
    Absent,
    SingleIdentifier(String),
    SingleHandle(FileInfo),
    Sequence(FileIdArray),
}

impl FilesArgument {
    pub fn classify(value: Option<&Value>, api: &FileInfoApi) -> HostResult<Self> {
        let Some(value) = value else {
            return Ok(FilesArgument::Absent);
        };

        match value {
            Value::None => Ok(FilesArgument::Absent),
            Value::Str(_) => convert::text_to_utf8(value).map(FilesArgument::SingleIdentifier),
            Value::List(list) if list.is_empty() => Ok(FilesArgument::Absent),
            Value::List(_) => api.build_id_array(value).map(FilesArgument::Sequence),
            other if api.is_instance(other) => api
                .unwrap(other)
                .map(FilesArgument::SingleHandle)
                .ok_or_else(|| HostError::reference_error("FileInfo object was already released")),
            other => Err(HostError::type_error(format!(
                "Expected a str, FileInfo or list. Found: {}",
                other.type_name()
            ))),
        }
    }

    /// Identifiers the argument names; `None` selects every file
    pub fn into_identifiers(self) -> Option<Vec<String>> {
        match self {
            FilesArgument::Absent => None,
            FilesArgument::SingleIdentifier(id) => Some(vec![id]),
            FilesArgument::SingleHandle(file_info) => Some(vec![file_info.id().to_string()]),
            FilesArgument::Sequence(ids) => Some(ids.into_vec()),
        }
    }
}

/// Canonical form of a files argument, borrowed as a `FileSelection`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFiles(Option<Vec<String>>);

impl ResolvedFiles {
    pub fn resolve(value: Option<&Value>, api: &FileInfoApi) -> HostResult<Self> {
        FilesArgument::classify(value, api).map(|arg| ResolvedFiles(arg.into_identifiers()))
    }

    pub fn selection(&self) -> FileSelection<'_> {
        match &self.0 {
            None => FileSelection::All,
            Some(ids) => FileSelection::Only(ids),
        }
    }
}
