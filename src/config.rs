//! Gallery configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` file that
//! lives in the source root. User values are layered over stock defaults,
//! so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! max_width = 600           # Bounding box width
//! max_height = 800          # Bounding box height
//! quality = 75              # JPEG quality (1-100)
//!
//! [captions]
//! device_case = "capitalize"  # "capitalize" | "upper_first" | "preserve"
//!
//! [output]
//! photo_list = "scripts/photo_list.js"
//! thumbnail_list = "scripts/thumbnail_list.js"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! on_error = "abort"        # "abort" | "skip"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
///
/// All fields have defaults matching the classic gallery layout: 600×800
/// thumbnails and manifests under `scripts/`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Thumbnail bounding box and encoding quality.
    pub thumbnails: ThumbnailsConfig,
    /// Caption formatting.
    pub captions: CaptionsConfig,
    /// Manifest output locations.
    pub output: OutputConfig,
    /// Parallel processing and failure policy.
    pub processing: ProcessingConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.max_width == 0 || self.thumbnails.max_height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_width and thumbnails.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.output.photo_list.as_os_str().is_empty()
            || self.output.thumbnail_list.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "output.photo_list and output.thumbnail_list must not be empty".into(),
            ));
        }
        if self.output.photo_list == self.output.thumbnail_list {
            return Err(ConfigError::Validation(
                "output.photo_list and output.thumbnail_list must differ".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Maximum thumbnail width in pixels.
    pub max_width: u32,
    /// Maximum thumbnail height in pixels.
    pub max_height: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 800,
            quality: 75,
        }
    }
}

/// How the camera model is cased in captions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCase {
    /// First letter uppercase, the rest lowercase (`"Supercam x"`).
    #[default]
    Capitalize,
    /// First letter uppercase, the rest as stored (`"SuperCam X"`).
    UpperFirst,
    /// Model name exactly as stored.
    Preserve,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionsConfig {
    pub device_case: DeviceCase,
}

/// Manifest output paths, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Script assigning `photos = [...]`.
    pub photo_list: PathBuf,
    /// Script assigning `thumbnails = [...]`.
    pub thumbnail_list: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            photo_list: PathBuf::from("scripts/photo_list.js"),
            thumbnail_list: PathBuf::from("scripts/thumbnail_list.js"),
        }
    }
}

/// What happens when one photo fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// The whole run fails and no manifest is written.
    #[default]
    Abort,
    /// The photo is reported and left out of both manifests.
    Skip,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
    /// Failure policy for individual photos.
    pub on_error: ErrorPolicy,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# EXIF Gallery Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at <source>/config.toml. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding box in pixels. Thumbnails keep the source aspect ratio and are
# never larger than the source.
max_width = 600
max_height = 800

# JPEG encoding quality (1 = worst, 100 = best).
quality = 75

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[captions]
# Camera model casing:
#   "capitalize"  -> first letter upper, rest lower ("Supercam x")
#   "upper_first" -> first letter upper, rest as stored ("SuperCam X")
#   "preserve"    -> exactly as stored
device_case = "capitalize"

# ---------------------------------------------------------------------------
# Output manifests (relative to the working directory)
# ---------------------------------------------------------------------------
[output]
photo_list = "scripts/photo_list.js"
thumbnail_list = "scripts/thumbnail_list.js"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# What to do when a photo cannot be processed:
#   "abort" -> fail the run, write no manifest
#   "skip"  -> report the photo and leave it out of the manifests
on_error = "abort"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_thumbnail_settings() {
        let config = GalleryConfig::default();
        assert_eq!(config.thumbnails.max_width, 600);
        assert_eq!(config.thumbnails.max_height, 800);
        assert_eq!(config.thumbnails.quality, 75);
    }

    #[test]
    fn default_config_has_output_paths() {
        let config = GalleryConfig::default();
        assert_eq!(config.output.photo_list, Path::new("scripts/photo_list.js"));
        assert_eq!(
            config.output.thumbnail_list,
            Path::new("scripts/thumbnail_list.js")
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[thumbnails]
max_width = 300
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.thumbnails.max_width, 300);
        // Default values preserved
        assert_eq!(config.thumbnails.max_height, 800);
        assert_eq!(config.captions.device_case, DeviceCase::Capitalize);
    }

    #[test]
    fn parse_enums_snake_case() {
        let toml = r#"
[captions]
device_case = "upper_first"

[processing]
on_error = "skip"
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.captions.device_case, DeviceCase::UpperFirst);
        assert_eq!(config.processing.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn unknown_enum_value_rejected() {
        let toml = r#"
[captions]
device_case = "shout"
"#;
        assert!(toml::from_str::<GalleryConfig>(toml).is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[output]
photo_list = "site/photos.js"

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output.photo_list, Path::new("site/photos.js"));
        assert_eq!(
            config.output.thumbnail_list,
            Path::new("scripts/thumbnail_list.js")
        );
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn default_processing_config() {
        let config = ProcessingConfig::default();
        assert_eq!(config.max_processes, None);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig::default();
        let threads = effective_threads(&config);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
            ..ProcessingConfig::default()
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
            ..ProcessingConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[thumbnails]
max_width = 600
max_height = 800
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[thumbnails]
max_height = 400
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let thumbs = merged.get("thumbnails").unwrap();
        assert_eq!(thumbs.get("max_width").unwrap().as_integer(), Some(600));
        assert_eq!(thumbs.get("max_height").unwrap().as_integer(), Some(400));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[thumbnails]
max_widht = 600
"#;
        assert!(toml::from_str::<GalleryConfig>(toml).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let toml = r##"
[colors]
background = "#fff"
"##;
        assert!(toml::from_str::<GalleryConfig>(toml).is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[output]
photos = "x.js"
"#,
        )
        .unwrap();

        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = GalleryConfig::default();
        config.thumbnails.quality = 100;
        assert!(config.validate().is_ok());
        config.thumbnails.quality = 0;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_bound() {
        let mut config = GalleryConfig::default();
        config.thumbnails.max_height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_output_paths_must_differ() {
        let mut config = GalleryConfig::default();
        config.output.thumbnail_list = config.output.photo_list.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_output_path() {
        let mut config = GalleryConfig::default();
        config.output.photo_list = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = GalleryConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[thumbnails]
quality = 200
"#,
        )
        .unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // resolve_config / stock config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[processing]
on_error = "skip"
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.processing.on_error, ErrorPolicy::Skip);
        assert_eq!(config.thumbnails.max_width, 600);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        for section in ["thumbnails", "captions", "output", "processing"] {
            assert!(value.get(section).is_some(), "missing [{section}]");
        }
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }
}
