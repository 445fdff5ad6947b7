//! Processing configuration.
//!
//! A batch run is driven by one immutable [`ProcessingConfig`]. Values come
//! from stock defaults, optionally overridden by a TOML file, optionally
//! overridden again by CLI flags. The engine never re-validates; callers run
//! [`ProcessingConfig::validate`] and [`validate_directories`] first.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! move_files = false              # Move instead of copy
//! rename_to_creation_date = false # Rename images to YYYY_MM_DD_HH_MM_SS.ext
//! resize_images = false           # Shrink images to resize_bigger_length
//! resize_bigger_length = 4000     # Target length of the longer side (px)
//! resize_jpeg_quality = 95        # JPEG quality (1-95)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound for JPEG quality. Higher values bloat files for no visible gain.
pub const MAX_JPEG_QUALITY: u32 = 95;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Options for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Move files instead of copying them.
    pub move_files: bool,
    /// Rename images to their capture timestamp.
    pub rename_to_creation_date: bool,
    /// Downscale images so the longer side fits `resize_bigger_length`.
    pub resize_images: bool,
    /// Target length in pixels of the longer image side.
    pub resize_bigger_length: u32,
    /// JPEG encoding quality, 1-95.
    pub resize_jpeg_quality: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            move_files: false,
            rename_to_creation_date: false,
            resize_images: false,
            resize_bigger_length: 4000,
            resize_jpeg_quality: 95,
        }
    }
}

impl ProcessingConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize_bigger_length == 0 {
            return Err(ConfigError::Validation(
                "resize_bigger_length must be greater than 0".into(),
            ));
        }
        if !(1..=MAX_JPEG_QUALITY).contains(&self.resize_jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "resize_jpeg_quality must be 1-{MAX_JPEG_QUALITY}"
            )));
        }
        Ok(())
    }

    /// True when entries have to be decoded as images.
    pub fn inspects_images(&self) -> bool {
        self.rename_to_creation_date || self.resize_images
    }
}

/// Load a config file, filling unspecified keys with defaults.
///
/// Rejects unknown keys and validates the result.
pub fn load_config(path: &Path) -> Result<ProcessingConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProcessingConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Check the directories a front-end is about to hand to the engine.
///
/// - at least one source
/// - every source exists and is a directory
/// - the destination exists and is a directory
/// - unless `allow_same_dir`, the destination is not one of the sources
pub fn validate_directories(
    sources: &[PathBuf],
    dest: &Path,
    allow_same_dir: bool,
) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source directory is required".into(),
        ));
    }
    for source in sources {
        if !source.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source directory \"{}\" does not exist or is not a directory",
                source.display()
            )));
        }
    }
    if !dest.is_dir() {
        return Err(ConfigError::Validation(format!(
            "destination directory \"{}\" does not exist or is not a directory",
            dest.display()
        )));
    }
    if !allow_same_dir
        && sources
            .iter()
            .any(|source| crate::transfer::same_directory(source, dest))
    {
        return Err(ConfigError::Validation(
            "destination directory is the same as a source directory".into(),
        ));
    }
    Ok(())
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photos Sorter Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# Move files into the destination instead of copying them.
move_files = false

# Rename images to the capture time stored in their EXIF data,
# e.g. 2021_05_01_10_00_00.jpg. Collisions get a _2, _3, ... suffix.
rename_to_creation_date = false

# Shrink images so the longer side is at most resize_bigger_length pixels.
# Panoramas (long side at least 2.4x the short side) are left at full size.
resize_images = false

# Target length of the longer side, in pixels.
resize_bigger_length = 4000

# JPEG encoding quality for resized images (1-95).
resize_jpeg_quality = 95
"##
}
