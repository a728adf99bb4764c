//! Conversions between host values and native collections
//!
//! - `text_to_utf8()`: host text to an owned UTF-8 string
//! - `build_tag_collection()`: host list of text to a `TagsCollection`
//! - `collect_file_ids()`: host list of identifiers or handles to a `FileIdArray`
//! - `tags_to_list()`, `statistics_to_dict()`: native results back to host values
//!
//! Every builder is atomic: on the first bad element the partially built
//! collection is dropped and the error names the element's index.

use crate::capi::FileInfoApi;
use tocc_engine::{FileInfoCollection, TagStatisticsCollection, TagsCollection};
use tocc_host::{HostError, HostResult, HostStr, ParsedArgs, Value, ValueDict, ValueList};

/// Owned, flat array of file identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIdArray(Vec<String>);

impl FileIdArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for FileIdArray {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

/// Convert host text to UTF-8
///
/// Host text may hold unpaired surrogates; those fail with a `UnicodeError`
/// carrying the lossy rendering of the text as context.
pub fn text_to_utf8(value: &Value) -> HostResult<String> {
    match value {
        Value::Str(text) => text.to_utf8().map_err(|err| {
            HostError::unicode_error(format!("text cannot be encoded as UTF-8: {}", err))
                .with_context(text.to_string_lossy())
        }),
        other => Err(HostError::type_error(format!(
            "expected a str, found {}",
            other.type_name()
        ))),
    }
}

/// The value as a host list, or a type error naming `what`
pub fn expect_list<'a>(value: &'a Value, what: &str) -> HostResult<&'a ValueList> {
    value.as_list().ok_or_else(|| {
        HostError::type_error(format!(
            "{} must be a list, not {}",
            what,
            value.type_name()
        ))
    })
}

pub fn build_tag_collection(sequence: &Value) -> HostResult<TagsCollection> {
    let items = expect_list(sequence, "tags")?.snapshot();
    let mut tags = TagsCollection::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let tag = match item {
            Value::Str(_) => text_to_utf8(item),
            other => Err(HostError::type_error(format!(
                "Expected a str at index {}. Found: {}",
                index,
                other.type_name()
            ))),
        }
        .map_err(|err| err.with_context(format!("tags[{}]", index)))?;
        tags.add_tag(tag);
    }

    Ok(tags)
}

/// Collect identifiers from a list of text and file handles
///
/// `handle_id` returns `Some` for elements that are file handles, with the
/// handle's stored identifier (or the error reading it).
pub fn collect_file_ids<F>(sequence: &Value, handle_id: F) -> HostResult<FileIdArray>
where
    F: Fn(&Value) -> Option<HostResult<String>>,
{
    let items = expect_list(sequence, "file_ids")?.snapshot();
    let mut ids = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let id = match item {
            Value::Str(_) => text_to_utf8(item),
            other => handle_id(other).unwrap_or_else(|| {
                Err(HostError::type_error(format!(
                    "Expected a str or FileInfo at index {}. Found: {}",
                    index,
                    other.type_name()
                )))
            }),
        }
        .map_err(|err| err.with_context(format!("file_ids[{}]", index)))?;
        ids.push(id);
    }

    Ok(FileIdArray(ids))
}

/// ID-only file infos for a list of identifiers and handles
pub fn build_file_id_collection(
    sequence: &Value,
    api: &FileInfoApi,
) -> HostResult<FileInfoCollection> {
    let ids = api.build_id_array(sequence)?;
    Ok(FileInfoCollection::from_ids(ids.as_slice()))
}

pub fn tags_to_list(tags: &TagsCollection) -> Value {
    Value::str_list(tags.iter())
}

/// Dict from tag to the number of files it is assigned to
pub fn statistics_to_dict(statistics: &TagStatisticsCollection) -> Value {
    let dict = ValueDict::new();
    for item in statistics.iter() {
        let count = i64::try_from(item.assigned_files()).unwrap_or(i64::MAX);
        dict.insert(HostStr::from(item.tag()), Value::Int(count));
    }
    Value::Dict(dict)
}

/// Text argument bound to a required parameter
pub fn required_text(parsed: &ParsedArgs<'_>, name: &str) -> HostResult<String> {
    let value = parsed.required(name)?;
    text_argument(parsed, name, value)
}

/// Text argument bound to an optional parameter, `default` when omitted
pub fn optional_text(parsed: &ParsedArgs<'_>, name: &str, default: &str) -> HostResult<String> {
    match parsed.get(name) {
        Some(value) => text_argument(parsed, name, value),
        None => Ok(default.to_string()),
    }
}

fn text_argument(parsed: &ParsedArgs<'_>, name: &str, value: &Value) -> HostResult<String> {
    match value {
        Value::Str(_) => text_to_utf8(value).map_err(|err| err.with_context(name.to_string())),
        other => Err(HostError::type_error(format!(
            "{}() argument '{}' must be str, not {}",
            parsed.function(),
            name,
            other.type_name()
        ))),
    }
}
