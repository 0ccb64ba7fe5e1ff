//! Build configuration.
//!
//! Every path the build touches, and the placeholder values the normalize
//! stage substitutes, live in one [`BuildConfig`] that is passed explicitly to
//! each stage. Nothing is read from process-wide state, so tests can point a
//! whole build at a temporary directory.
//!
//! ## Config File
//!
//! An optional `homepage.toml` in the project root overrides the stock
//! defaults. It is sparse: override only what differs.
//!
//! ```toml
//! [paths]
//! data = "data/site.json"          # Site document
//! templates = "templates"          # Holds base.html
//! output = "docs"                  # Deleted and rebuilt on every run
//! static_root = "static"           # Searched when resolving asset paths
//! static_assets = "static/assets"  # Copied to <output>/assets
//! photos = "photos"                # Copied to <output>/assets/photos
//!
//! [placeholders]
//! image = "assets/images/placeholder.svg"
//! link = "#"
//! ```
//!
//! Relative paths are resolved against the project root (`--root`, default
//! the current directory). Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::assets::AssetRoots;

/// Name of the optional config file in the project root.
pub const CONFIG_FILE: &str = "homepage.toml";

/// The page template inside the templates directory.
pub const BASE_TEMPLATE: &str = "base.html";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a build needs to know about where things are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root every relative path resolves against. Not part of the file.
    #[serde(skip)]
    pub root: PathBuf,
    pub paths: PathsConfig,
    pub placeholders: PlaceholderConfig,
}

/// Input and output locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
    pub static_root: PathBuf,
    pub static_assets: PathBuf,
    pub photos: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/site.json"),
            templates: PathBuf::from("templates"),
            output: PathBuf::from("docs"),
            static_root: PathBuf::from("static"),
            static_assets: PathBuf::from("static/assets"),
            photos: PathBuf::from("photos"),
        }
    }
}

/// Values substituted for missing links and images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Image path, relative to the output root.
    pub image: String,
    pub link: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            image: "assets/images/placeholder.svg".to_string(),
            link: "#".to_string(),
        }
    }
}

impl BuildConfig {
    /// Stock defaults rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Replace the output directory (the CLI's `--output`).
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.paths.output = output.into();
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn data_path(&self) -> PathBuf {
        self.resolve(&self.paths.data)
    }

    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.paths.templates).join(BASE_TEMPLATE)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }

    pub fn static_assets_dir(&self) -> PathBuf {
        self.resolve(&self.paths.static_assets)
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.resolve(&self.paths.photos)
    }

    /// The directories probed when checking whether an image exists.
    pub fn asset_roots(&self) -> AssetRoots {
        AssetRoots {
            base: self.root.clone(),
            static_root: self.resolve(&self.paths.static_root),
            photos: self.photos_dir(),
        }
    }

    /// Reject values that would make a build misbehave.
    ///
    /// The output directory is deleted on every run, so it must name a real
    /// subdirectory that holds neither the project root nor any build input,
    /// and must not sit inside a tree that gets copied into it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholders.image.trim().is_empty() {
            return Err(ConfigError::Validation(
                "placeholders.image must not be empty".into(),
            ));
        }
        if self.placeholders.link.trim().is_empty() {
            return Err(ConfigError::Validation(
                "placeholders.link must not be empty".into(),
            ));
        }
        self.validate_output()
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        let output = &self.paths.output;
        if output.components().any(|c| c == Component::ParentDir) {
            return Err(ConfigError::Validation(format!(
                "paths.output must not contain '..': {}",
                output.display()
            )));
        }
        if output.components().all(|c| c == Component::CurDir) {
            return Err(ConfigError::Validation(
                "paths.output must name a directory below the project root".into(),
            ));
        }

        let out = lexical_normalize(&self.output_dir());
        let root = lexical_normalize(&self.root);
        // Catches symlinks and other spellings once both paths exist
        let same_place = match (
            fs::canonicalize(self.output_dir()),
            fs::canonicalize(&self.root),
        ) {
            (Ok(out), Ok(root)) => root.starts_with(out),
            _ => false,
        };
        if root.starts_with(&out) || same_place {
            return Err(ConfigError::Validation(format!(
                "paths.output must not be or contain the project root: {}",
                output.display()
            )));
        }

        let inputs = [
            ("paths.data", self.data_path()),
            ("paths.templates", self.template_path()),
            ("paths.static_assets", self.static_assets_dir()),
            ("paths.photos", self.photos_dir()),
        ];
        for (key, input) in inputs {
            if lexical_normalize(&input).starts_with(&out) {
                return Err(ConfigError::Validation(format!(
                    "paths.output must not contain {key}: {}",
                    output.display()
                )));
            }
        }

        for (key, tree) in [
            ("paths.static_assets", self.static_assets_dir()),
            ("paths.photos", self.photos_dir()),
        ] {
            if out.starts_with(lexical_normalize(&tree)) {
                return Err(ConfigError::Validation(format!(
                    "paths.output must not be inside {key}: {}",
                    output.display()
                )));
            }
        }
        Ok(())
    }
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// A `..` that would climb above the start of a relative path is kept.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
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

/// Load `homepage.toml` from the project root as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize.
///
/// Validation is left to the caller so CLI overrides can be applied first.
pub fn resolve_config(
    root: &Path,
    overlay: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: BuildConfig = merged.try_into()?;
    config.root = root.to_path_buf();
    Ok(config)
}

/// Load and validate the config for a project root.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let config = resolve_config(root, load_raw_config(root)?)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `homepage.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Homepage Build Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Relative paths resolve against the
# project root (the directory passed with --root).
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# The site document: profile, timeline, publications, projects, ...
data = "data/site.json"

# Directory holding base.html, the page template.
templates = "templates"

# Build output. Deleted and recreated on every build.
output = "docs"

# Extra root searched when checking that referenced images exist.
static_root = "static"

# Theme assets, copied to <output>/assets.
static_assets = "static/assets"

# Photos, copied to <output>/assets/photos (skipped if missing).
photos = "photos"

# ---------------------------------------------------------------------------
# Placeholders
# ---------------------------------------------------------------------------
[placeholders]
# Image used for projects and the avatar when theirs is missing.
# The site document can override this with assets.placeholder_image.
image = "assets/images/placeholder.svg"

# Link used for timeline entries and publications without one.
link = "#"
"##
}
