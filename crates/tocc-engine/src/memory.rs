//! In-memory engine
//!
//! Keeps file records in a map keyed by file ID. Nothing is read from or
//! written to disk: `import_file` only records where the file would live under
//! the base path. Used as the default engine of the bindings and by tests.

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::{
    FileInfo, FileInfoCollection, FileSelection, TagStatistics, TagStatisticsCollection,
    TagsCollection,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Width of a file ID in hex digits
const FILE_ID_WIDTH: usize = 7;

#[derive(Debug)]
pub struct MemoryEngine {
    base_path: PathBuf,
    initialized: bool,
    files: BTreeMap<String, FileInfo>,
    next_id: u32,
}

impl MemoryEngine {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            initialized: false,
            files: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// A session whose base path is already initialized
    pub fn initialized(base_path: impl Into<PathBuf>) -> Self {
        Self {
            initialized: true,
            ..Self::new(base_path)
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn ensure_initialized(&self) -> EngineResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(EngineError::DatabaseInitialization(format!(
                "base path {} is not initialized",
                self.base_path.display()
            )))
        }
    }

    fn allocate_id(&mut self) -> String {
        let id = format!("{:0width$x}", self.next_id, width = FILE_ID_WIDTH);
        self.next_id += 1;
        id
    }

    fn physical_path_of(&self, id: &str) -> String {
        let (dir, name) = id.split_at(2);
        self.base_path.join(dir).join(name).display().to_string()
    }

    /// Every ID must exist before a bulk operation touches any of them
    fn check_exist<'a, I>(&self, ids: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if !self.files.contains_key(id) {
                return Err(EngineError::file_not_found(id));
            }
        }
        Ok(())
    }

    /// Distinct IDs of the selection; a file named twice counts once
    fn selected_ids(&self, files: FileSelection<'_>) -> EngineResult<BTreeSet<String>> {
        match files {
            FileSelection::All => Ok(self.files.keys().cloned().collect()),
            FileSelection::Only(ids) => {
                self.check_exist(ids.iter().map(String::as_str))?;
                Ok(ids.iter().cloned().collect())
            }
        }
    }
}

impl Engine for MemoryEngine {
    fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn initialize(&mut self) -> EngineResult<()> {
        if self.initialized {
            return Err(EngineError::DatabaseInitialization(format!(
                "base path {} is already initialized",
                self.base_path.display()
            )));
        }
        self.initialized = true;
        tracing::debug!(
            target: "tocc.engine",
            base_path = %self.base_path.display(),
            "base path initialized"
        );
        Ok(())
    }

    fn get_file_info(&self, file_id: &str) -> EngineResult<FileInfo> {
        self.ensure_initialized()?;
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| EngineError::file_not_found(file_id))
    }

    fn get_file_by_traditional_path(&self, traditional_path: &str) -> EngineResult<FileInfo> {
        self.ensure_initialized()?;
        self.files
            .values()
            .find(|f| !traditional_path.is_empty() && f.traditional_path() == traditional_path)
            .cloned()
            .ok_or_else(|| {
                EngineError::DatabaseScriptLogical(format!(
                    "no file with traditional path: {}",
                    traditional_path
                ))
            })
    }

    fn import_file(
        &mut self,
        source_path: &str,
        title: &str,
        traditional_path: &str,
        tags: Option<TagsCollection>,
    ) -> EngineResult<FileInfo> {
        self.ensure_initialized()?;
        if source_path.is_empty() {
            return Err(EngineError::InvalidArgument(
                "source path must not be empty".to_string(),
            ));
        }
        if !traditional_path.is_empty()
            && self
                .files
                .values()
                .any(|f| f.traditional_path() == traditional_path)
        {
            return Err(EngineError::DatabaseScriptLogical(format!(
                "traditional path already exists: {}",
                traditional_path
            )));
        }

        let mut unique = TagsCollection::new();
        for tag in tags.iter().flatten() {
            if !unique.contains(tag) {
                unique.add_tag(tag);
            }
        }

        let id = self.allocate_id();
        let record = FileInfo::with_details(
            id.clone(),
            title,
            traditional_path,
            self.physical_path_of(&id),
            unique,
        );
        tracing::debug!(
            target: "tocc.engine",
            file_id = %id,
            source_path,
            tags = record.tags().len(),
            "file imported"
        );
        self.files.insert(id, record.clone());
        Ok(record)
    }

    fn remove_file(&mut self, file_id: &str) -> EngineResult<()> {
        self.ensure_initialized()?;
        self.files
            .remove(file_id)
            .map(|_| ())
            .ok_or_else(|| EngineError::file_not_found(file_id))
    }

    fn remove_files(&mut self, files: &FileInfoCollection) -> EngineResult<()> {
        self.ensure_initialized()?;
        self.check_exist(files.iter().map(FileInfo::id))?;
        for file in files {
            self.files.remove(file.id());
        }
        Ok(())
    }

    fn assign_tags(&mut self, files: &FileInfoCollection, tags: TagsCollection) -> EngineResult<()> {
        self.ensure_initialized()?;
        self.check_exist(files.iter().map(FileInfo::id))?;
        for file in files {
            if let Some(record) = self.files.get_mut(file.id()) {
                for tag in &tags {
                    if !record.tags().contains(tag) {
                        record.tags_mut().add_tag(tag);
                    }
                }
            }
        }
        Ok(())
    }

    fn unassign_tags(
        &mut self,
        files: &FileInfoCollection,
        tags: TagsCollection,
    ) -> EngineResult<()> {
        self.ensure_initialized()?;
        self.check_exist(files.iter().map(FileInfo::id))?;
        for file in files {
            if let Some(record) = self.files.get_mut(file.id()) {
                for tag in &tags {
                    record.tags_mut().remove_tag(tag);
                }
            }
        }
        Ok(())
    }

    fn set_titles(&mut self, files: FileSelection<'_>, title: &str) -> EngineResult<()> {
        self.ensure_initialized()?;
        for id in self.selected_ids(files)? {
            if let Some(record) = self.files.get_mut(&id) {
                record.set_title(title);
            }
        }
        Ok(())
    }

    fn get_tags_statistics(&self, files: FileSelection<'_>) -> EngineResult<TagStatisticsCollection> {
        self.ensure_initialized()?;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        let ids = self.selected_ids(files)?;
        for id in &ids {
            if let Some(record) = self.files.get(id) {
                for tag in record.tags() {
                    *counts.entry(tag).or_insert(0) += 1;
                }
            }
        }
        Ok(counts
            .into_iter()
            .map(|(tag, count)| TagStatistics::new(tag, count))
            .collect())
    }
}
