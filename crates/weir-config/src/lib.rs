//! Weir configuration system.
//!
//! TOML-based settings with serde defaults, so partial configs work out
//! of the box. Settings are read once at controller construction; policy
//! changes at runtime go through the controller's setters, not this crate.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{NetworkConfig, SniffingConfig, ViewConfig, WeirConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, load_default, load_from_path};
