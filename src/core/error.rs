//! Error types for the logger system

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A sink file or the logs directory could not be opened
    #[error("failed to open sink '{path}': {source}")]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sink write failed in a consumer
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// A consumer thread could not be spawned
    #[error("failed to spawn consumer for shard {shard}: {source}")]
    ConsumerSpawn {
        shard: usize,
        #[source]
        source: std::io::Error,
    },

    /// Lifecycle operation on a logger that was never initialized
    #[error("logger has not been initialized")]
    NotInitialized,

    /// A deferred template could not be rendered from its captured arguments
    #[error("formatting failed for template '{template}'")]
    Format { template: String },
}

impl LoggerError {
    /// Create a sink open error
    pub fn sink_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::SinkOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a consumer spawn error
    pub fn consumer_spawn(shard: usize, source: std::io::Error) -> Self {
        LoggerError::ConsumerSpawn { shard, source }
    }

    /// Create a formatting error
    pub fn format(template: impl Into<String>) -> Self {
        LoggerError::Format {
            template: template.into(),
        }
    }
}
