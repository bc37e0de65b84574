//! Builds the runtime configuration.
//!
//! The binary ships with a baked-in `default.toml`, so it starts with no
//! config files on disk at all; anything found under `config/` or in
//! `CAMPUS_*` environment variables layers on top.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// `config/default.toml` baked into the binary at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Assemble the configuration, later sources winning over earlier ones:
/// baked-in defaults, then optional `config/` files (`default`, the
/// `CAMPUS_ENV` profile, `local`), then `CAMPUS_*` environment variables.
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // Keys nest on "__", so CAMPUS_AUTH__TOKEN_SECRET maps to
        // auth.token_secret. The prefix separator stays a single "_";
        // config-rs 0.14 would otherwise demand CAMPUS__AUTH__....
        .add_source(
            Environment::with_prefix("CAMPUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.sweeper.enabled);
        assert!(config.auth.token_secret.is_none());
    }
}
