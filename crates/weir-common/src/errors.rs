use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Faults raised by a rendering-engine backend.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("surface creation failed: {0}")]
    Creation(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("engine does not support {0}")]
    Unsupported(&'static str),

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WeirError {
    /// The operation requires a live rendering surface and none exists.
    #[error("no active view")]
    NoActiveView,

    /// Neither the overlay window nor the main window is resolvable.
    #[error("no host window available")]
    NoHostWindow,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}
