//! Native object model
//!
//! Value types the engine hands across the boundary. All of them are plain
//! owned data: cloning produces an independent copy.

use std::slice;

/// Ordered collection of tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsCollection {
    tags: Vec<String>,
}

impl TagsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tags: Vec::with_capacity(capacity),
        }
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> TagsIter<'_> {
        TagsIter {
            inner: self.tags.iter(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }
}

impl<S: Into<String>> FromIterator<S> for TagsCollection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Iterator over tags in stored order
pub struct TagsIter<'a> {
    inner: slice::Iter<'a, String>,
}

impl<'a> Iterator for TagsIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for TagsIter<'_> {}

impl<'a> IntoIterator for &'a TagsCollection {
    type Item = &'a str;
    type IntoIter = TagsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Information of one managed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    id: String,
    title: String,
    traditional_path: String,
    physical_path: String,
    tags: TagsCollection,
}

impl FileInfo {
    /// A file info that only knows its ID
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_details(
        id: impl Into<String>,
        title: impl Into<String>,
        traditional_path: impl Into<String>,
        physical_path: impl Into<String>,
        tags: TagsCollection,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            traditional_path: traditional_path.into(),
            physical_path: physical_path.into(),
            tags,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn traditional_path(&self) -> &str {
        &self.traditional_path
    }

    pub fn physical_path(&self) -> &str {
        &self.physical_path
    }

    pub fn tags(&self) -> &TagsCollection {
        &self.tags
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn tags_mut(&mut self) -> &mut TagsCollection {
        &mut self.tags
    }
}

/// Ordered collection of file infos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfoCollection {
    files: Vec<FileInfo>,
}

impl FileInfoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity),
        }
    }

    /// Collection of ID-only file infos, one per identifier
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        ids.iter().map(|id| FileInfo::new(id.as_ref())).collect()
    }

    pub fn add_file_info(&mut self, file_info: FileInfo) {
        self.files.push(file_info);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, FileInfo> {
        self.files.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.files.iter().map(FileInfo::id).collect()
    }
}

impl FromIterator<FileInfo> for FileInfoCollection {
    fn from_iter<I: IntoIterator<Item = FileInfo>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileInfoCollection {
    type Item = &'a FileInfo;
    type IntoIter = slice::Iter<'a, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How many files one tag is assigned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStatistics {
    tag: String,
    assigned_files: u64,
}

impl TagStatistics {
    pub fn new(tag: impl Into<String>, assigned_files: u64) -> Self {
        Self {
            tag: tag.into(),
            assigned_files,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn assigned_files(&self) -> u64 {
        self.assigned_files
    }
}

/// Ordered collection of tag statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStatisticsCollection {
    items: Vec<TagStatistics>,
}

impl TagStatisticsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: TagStatistics) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, TagStatistics> {
        self.items.iter()
    }
}

impl FromIterator<TagStatistics> for TagStatisticsCollection {
    fn from_iter<I: IntoIterator<Item = TagStatistics>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Which files an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSelection<'a> {
    /// Every file the engine manages
    All,
    /// Only the listed identifiers
    Only(&'a [String]),
}
