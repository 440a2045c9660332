pub mod errors;
pub mod types;

pub use errors::{ConfigError, EngineError, WeirError};
pub use types::{Color, Rect};

pub type Result<T> = std::result::Result<T, WeirError>;
