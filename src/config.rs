//! Service configuration module.
//!
//! Handles loading, validating, and merging the service's TOML config file.
//! Stock defaults are the base layer; a user config file, when present,
//! overrides only the keys it names.
//!
//! ## Config File Location
//!
//! `crop-review serve` reads `crop-review.toml` from the working directory
//! unless `--config <FILE>` points elsewhere. A missing default file is not
//! an error; a missing explicitly named file is.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! bind = "127.0.0.1:3000"       # Listen address
//! max_upload_bytes = 10485760   # Largest accepted upload (10 MiB)
//!
//! [storage]
//! uploads_dir = "uploads"       # Where source uploads are kept until approval
//! cropped_dir = "cropped"       # Where derived artifacts live; served at /cropped
//!
//! [output]
//! quality = 90                  # JPEG quality (1-100)
//! allow_upscale = false         # Let bounded crops enlarge small sources
//!
//! [processing]
//! max_concurrent_transforms = 4 # Omit for auto = CPU cores
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "crop-review.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Service configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Upload and derived artifact directories.
    pub storage: StorageConfig,
    /// Encoding of derived artifacts.
    pub output: OutputConfig,
    /// Transform concurrency.
    pub processing: ProcessingConfig,
}

impl ServiceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_addr()?;
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "server.max_upload_bytes must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        let storage = &self.storage;
        if storage.uploads_dir.as_os_str().is_empty() || storage.cropped_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "storage directories must not be empty".into(),
            ));
        }
        if storage.uploads_dir == storage.cropped_dir {
            return Err(ConfigError::Validation(
                "storage.uploads_dir and storage.cropped_dir must differ".into(),
            ));
        }
        if self.processing.max_concurrent_transforms == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_concurrent_transforms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. `"127.0.0.1:3000"`.
    pub bind: String,
    /// Uploads larger than this are refused.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|e| {
            ConfigError::Validation(format!("server.bind {:?} is not a socket address: {e}", self.bind))
        })
    }
}

/// Upload and derived artifact directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub uploads_dir: PathBuf,
    pub cropped_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from("uploads"),
            cropped_dir: PathBuf::from("cropped"),
        }
    }
}

/// Encoding of derived artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1-100).
    pub quality: u32,
    /// Let bounded crops enlarge sources smaller than the target box.
    pub allow_upscale: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            allow_upscale: false,
        }
    }
}

/// Transform concurrency settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of transforms running at once.
    /// When absent, defaults to the number of CPU cores.
    pub max_concurrent_transforms: Option<usize>,
}

/// Resolve the effective number of concurrent transforms.
///
/// - `None` → number of available cores
/// - `Some(n)` → `n`, as configured
pub fn effective_transform_slots(config: &ProcessingConfig) -> usize {
    config.max_concurrent_transforms.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ServiceConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. Returns `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServiceConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServiceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the service config.
///
/// With `Some(path)` the file must exist. With `None`, [`DEFAULT_CONFIG_FILE`]
/// is read if present and stock defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let overlay = match path {
        Some(explicit) => Some(toml::from_str(&fs::read_to_string(explicit)?)?),
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// A fully-commented stock `crop-review.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Crop Review Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Each key only needs to appear if you want to override it.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
# Socket address to listen on.
bind = "127.0.0.1:3000"

# Largest accepted upload in bytes (10 MiB).
max_upload_bytes = 10485760

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Source uploads are kept here until the job is approved or rejected.
uploads_dir = "uploads"

# Derived artifacts live here and are served under /cropped.
cropped_dir = "cropped"

# ---------------------------------------------------------------------------
# Derived artifact encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best).
quality = 90

# Let bounded crops (product, banner) enlarge sources smaller than the box.
allow_upscale = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum transforms running at once.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_concurrent_transforms = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.max_upload_bytes, 10_485_760);
        assert_eq!(config.storage.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.storage.cropped_dir, PathBuf::from("cropped"));
        assert_eq!(config.output.quality, 90);
        assert!(!config.output.allow_upscale);
        assert_eq!(config.processing.max_concurrent_transforms, None);
    }

    #[test]
    fn default_config_validates() {
        ServiceConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[output]
quality = 75
"#;
        let config: ServiceConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.output.quality, 75);
        // Default values preserved
        assert!(!config.output.allow_upscale);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[server]
bnd = "0.0.0.0:80"
"#;
        assert!(toml::from_str::<ServiceConfig>(toml).is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<ServiceConfig>("[colors]\nbackground = \"#fff\"\n").is_err());
    }

    // =========================================================================
    // validate
    // =========================================================================

    #[test]
    fn validate_rejects_bad_bind() {
        let mut config = ServiceConfig::default();
        config.server.bind = "localhost".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_quality_out_of_range() {
        for quality in [0, 101] {
            let mut config = ServiceConfig::default();
            config.output.quality = quality;
            assert!(config.validate().is_err(), "quality {quality} accepted");
        }
    }

    #[test]
    fn validate_rejects_zero_upload_limit() {
        let mut config = ServiceConfig::default();
        config.server.max_upload_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_shared_directory() {
        let mut config = ServiceConfig::default();
        config.storage.cropped_dir = config.storage.uploads_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_directory() {
        let mut config = ServiceConfig::default();
        config.storage.uploads_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_transform_slots() {
        let mut config = ServiceConfig::default();
        config.processing.max_concurrent_transforms = Some(0);
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // effective_transform_slots
    // =========================================================================

    #[test]
    fn effective_slots_auto_is_at_least_one() {
        let config = ProcessingConfig::default();
        assert!(effective_transform_slots(&config) >= 1);
    }

    #[test]
    fn effective_slots_uses_configured_value() {
        let config = ProcessingConfig {
            max_concurrent_transforms: Some(3),
        };
        assert_eq!(effective_transform_slots(&config), 3);
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_scalars_and_keeps_siblings() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn merge_adds_new_keys() {
        let base: toml::Value = toml::from_str("[processing]\n").unwrap();
        let overlay: toml::Value =
            toml::from_str("[processing]\nmax_concurrent_transforms = 2\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(
            merged["processing"]["max_concurrent_transforms"].as_integer(),
            Some(2)
        );
    }

    #[test]
    fn stock_defaults_value_round_trips() {
        let config: ServiceConfig = stock_defaults_value().try_into().unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    // =========================================================================
    // load_raw_config / load_config
    // =========================================================================

    #[test]
    fn load_raw_config_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(&tmp.path().join("absent.toml")).unwrap().is_none());
    }

    #[test]
    fn load_config_reads_file_and_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crop-review.toml");
        fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0:8080"

[storage]
cropped_dir = "/srv/crops"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.storage.cropped_dir, PathBuf::from("/srv/crops"));
        // Unspecified values should be defaults
        assert_eq!(config.storage.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.server.max_upload_bytes, 10_485_760);
    }

    #[test]
    fn load_config_explicit_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_config_invalid_toml_is_toml_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[server\nbind = ").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_runs_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("crop-review.toml");
        fs::write(&path, "[output]\nquality = 0\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ServiceConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }
}
