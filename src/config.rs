//! Library configuration module.
//!
//! Handles loading, validating, and merging `toolshelf.toml`. The file lives
//! in the library root (the directory passed as `--root`) and is optional:
//! stock defaults are used for every key it does not set.
//!
//! ## Library Layout
//!
//! ```text
//! library/
//! ├── toolshelf.toml           # Optional config (this module)
//! ├── data/
//! │   └── tools.json           # Catalog document (data_file)
//! └── public/                  # Public root (public_dir)
//!     └── uploads/             # Uploaded images (uploads_dir)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_file = "data/tools.json"    # Catalog document, relative to the root
//! public_dir = "public"            # Public asset root, relative to the root
//! uploads_dir = "uploads"          # Upload folder inside public_dir
//! prompt_category = "image-prompt" # Category whose entries require a prompt
//!
//! [site]
//! title = "AI Tools Library"
//! description = "..."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside the library root.
pub const CONFIG_FILENAME: &str = "toolshelf.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Library configuration loaded from `toolshelf.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Catalog document path, relative to the library root.
    pub data_file: String,
    /// Public asset root, relative to the library root.
    pub public_dir: String,
    /// Upload folder inside `public_dir`; also the public URL prefix.
    pub uploads_dir: String,
    /// Id of the category whose entries must carry prompt text.
    pub prompt_category: String,
    /// Text used by the generated pages.
    pub site: SiteConfig,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_file: "data/tools.json".to_string(),
            public_dir: "public".to_string(),
            uploads_dir: "uploads".to_string(),
            prompt_category: "image-prompt".to_string(),
            site: SiteConfig::default(),
        }
    }
}

/// Site-wide text for rendered pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "AI Tools Library".to_string(),
            description: "Explore a curated collection of AI resources: tools for crafting \
                          captivating image prompts and platforms that supercharge your daily \
                          workflows."
                .to_string(),
        }
    }
}

impl LibraryConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_relative("data_file", &self.data_file)?;
        require_relative("public_dir", &self.public_dir)?;
        require_relative("uploads_dir", &self.uploads_dir)?;
        if Path::new(&self.uploads_dir).components().count() != 1 {
            return Err(ConfigError::Validation(
                "uploads_dir must be a single directory name".into(),
            ));
        }
        if self.prompt_category.trim().is_empty() {
            return Err(ConfigError::Validation(
                "prompt_category must not be empty".into(),
            ));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Absolute-or-root-relative paths resolved against a library root.
    pub fn paths(&self, root: &Path) -> LibraryPaths {
        let public_dir = root.join(&self.public_dir);
        LibraryPaths {
            data_file: root.join(&self.data_file),
            uploads_dir: public_dir.join(&self.uploads_dir),
            public_dir,
            uploads_prefix: format!("/{}", self.uploads_dir),
        }
    }
}

fn require_relative(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    let escapes = Path::new(value)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::Validation(format!(
            "{key} must be a relative path inside the library root"
        )));
    }
    Ok(())
}

/// Filesystem locations derived from a [`LibraryConfig`] and a root.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryPaths {
    pub data_file: PathBuf,
    pub public_dir: PathBuf,
    pub uploads_dir: PathBuf,
    /// Public URL prefix for uploads, e.g. `/uploads`.
    pub uploads_prefix: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LibraryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load `toolshelf.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from the library root: stock defaults, user overrides,
/// unknown-key rejection, validation.
pub fn load_config(root: &Path) -> Result<LibraryConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: LibraryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `toolshelf.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Toolshelf Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Catalog document, relative to the library root.
data_file = "data/tools.json"

# Public asset root, relative to the library root. Uploaded images and
# every local `image` path in the catalog resolve against this directory.
public_dir = "public"

# Upload folder inside public_dir. New images are stored here and
# referenced as "/<uploads_dir>/<file name>".
uploads_dir = "uploads"

# Entries submitted to this category must include prompt text.
prompt_category = "image-prompt"

# ---------------------------------------------------------------------------
# Generated pages
# ---------------------------------------------------------------------------
[site]
title = "AI Tools Library"
description = "Explore a curated collection of AI resources: tools for crafting captivating image prompts and platforms that supercharge your daily workflows."
"##
}
