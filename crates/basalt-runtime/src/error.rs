use std::path::PathBuf;

/// Errors surfaced by the managed-runtime subsystem.
///
/// Unreadable release metadata is deliberately not represented here: a
/// runtime whose metadata cannot be parsed is still listed as a
/// placeholder descriptor so it stays visible and removable.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Runtime storage is unavailable: {}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Runtime {name:?} is broken and cannot be launched")]
    BrokenRuntime { name: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Install cancelled")]
    Cancelled,
}

impl RuntimeError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
