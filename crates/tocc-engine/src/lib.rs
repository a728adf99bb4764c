//! Tocc native engine
//!
//! Native object model (file infos, tags, tag statistics) and the `Engine`
//! interface the bindings call into. `MemoryEngine` is the bundled
//! implementation.

pub mod engine;
pub mod error;
pub mod memory;
pub mod types;

pub use engine::{Engine, EngineFactory};
pub use error::{EngineError, EngineResult};
pub use memory::MemoryEngine;
pub use types::{
    FileInfo, FileInfoCollection, FileSelection, TagStatistics, TagStatisticsCollection,
    TagsCollection, TagsIter,
};

use std::sync::Arc;

/// Factory opening an uninitialized `MemoryEngine` on each base path
pub fn memory_engine_factory() -> EngineFactory {
    Arc::new(|base_path| Ok(Box::new(MemoryEngine::new(base_path)) as Box<dyn Engine>))
}
