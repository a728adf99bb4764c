use thiserror::Error;

/// Errors raised by the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Base path already initialized, not initialized, or unusable
    #[error("{0}")]
    DatabaseInitialization(String),

    /// A query found nothing or violated a constraint (unknown file ID,
    /// duplicate traditional path)
    #[error("{0}")]
    DatabaseScriptLogical(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Class name of the error, as exposed to the host
    pub fn class_name(&self) -> &'static str {
        match self {
            EngineError::DatabaseInitialization(_) => "DatabaseInitializationError",
            EngineError::DatabaseScriptLogical(_) => "DatabaseScriptLogicalError",
            EngineError::InvalidArgument(_) => "InvalidArgumentError",
            EngineError::Io(_) => "IOError",
        }
    }

    pub fn file_not_found(id: &str) -> Self {
        EngineError::DatabaseScriptLogical(format!("file not found: {}", id))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
