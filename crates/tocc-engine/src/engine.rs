//! The narrow call interface the bindings drive
//!
//! One `Engine` value is one session over a base path. Calls are blocking and
//! run to completion. Operations that consume a tag collection take it by
//! value.

use crate::error::EngineResult;
use crate::types::{FileInfo, FileInfoCollection, FileSelection, TagStatisticsCollection, TagsCollection};
use std::path::Path;

pub trait Engine: Send {
    /// Base path this session manages
    fn base_path(&self) -> &Path;

    /// Prepare the base path for use. Fails if it was already initialized.
    fn initialize(&mut self) -> EngineResult<()>;

    fn get_file_info(&self, file_id: &str) -> EngineResult<FileInfo>;

    fn get_file_by_traditional_path(&self, traditional_path: &str) -> EngineResult<FileInfo>;

    /// Import `source_path` into the managed store
    ///
    /// Empty `title` or `traditional_path` means "not set".
    fn import_file(
        &mut self,
        source_path: &str,
        title: &str,
        traditional_path: &str,
        tags: Option<TagsCollection>,
    ) -> EngineResult<FileInfo>;

    fn remove_file(&mut self, file_id: &str) -> EngineResult<()>;

    fn remove_files(&mut self, files: &FileInfoCollection) -> EngineResult<()>;

    fn assign_tags(&mut self, files: &FileInfoCollection, tags: TagsCollection) -> EngineResult<()>;

    fn unassign_tags(&mut self, files: &FileInfoCollection, tags: TagsCollection)
        -> EngineResult<()>;

    fn set_titles(&mut self, files: FileSelection<'_>, title: &str) -> EngineResult<()>;

    fn get_tags_statistics(&self, files: FileSelection<'_>) -> EngineResult<TagStatisticsCollection>;
}

/// Opens one engine session per base path
pub type EngineFactory =
    std::sync::Arc<dyn Fn(&Path) -> EngineResult<Box<dyn Engine>> + Send + Sync>;
