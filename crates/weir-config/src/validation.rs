//! Configuration validation.

use crate::schema::WeirConfig;
use weir_common::{Color, ConfigError};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WeirConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.network.use_proxy && config.network.proxy.trim().is_empty() {
        errors.push("network.proxy must be set when network.use_proxy is true".into());
    }

    if Color::from_hex(&config.view.background).is_none() {
        errors.push(format!(
            "view.background is not a valid hex color: {:?}",
            config.view.background
        ));
    }

    if config.view.partition.trim().is_empty() {
        errors.push("view.partition must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
