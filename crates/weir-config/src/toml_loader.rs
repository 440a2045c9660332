//! TOML config file loading and creation.

use crate::schema::WeirConfig;
use crate::validation;
use std::path::Path;
use tracing::{info, warn};
use weir_common::ConfigError;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// After loading, the config is validated; if validation fails, a warning
/// is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<WeirConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: WeirConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    // Validate and warn on errors, but still return something usable
    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(WeirConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<WeirConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(WeirConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("weir").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    Ok(())
}

/// The documented default config file contents.
pub fn default_config_toml() -> String {
    format!(
        r##"# Weir configuration
version = {}

[network]
# Route traffic of the shared session through a proxy.
use_proxy = false
# Proxy address, [scheme://]host[:port]. Defaults to http:// when no scheme.
proxy = ""
# Enforce ad/tracker blocking on the shared session.
block_ads = true

[view]
# Present a mobile user agent instead of the desktop one.
is_mobile = false
# Background color of newly created views.
background = "#ffffff"
# Mute page audio by default.
muted = true
# Named persistent session partition.
partition = "persist:webview"

[sniffing]
# Forward detected sources to the extension channel instead of saving them.
use_extension = false
"##,
        crate::schema::CONFIG_SCHEMA_VERSION
    )
}
