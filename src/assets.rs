//! Asset lookup and output directory preparation.
//!
//! Image paths in the site document are written as they will appear in the
//! built site (`assets/photos/me.jpg`, `assets/images/logo.svg`). Before the
//! build copies anything, those files live in separate source trees:
//!
//! ```text
//! project/
//! ├── static/assets/      → docs/assets/
//! │   └── images/
//! └── photos/             → docs/assets/photos/
//!     └── me.jpg
//! ```
//!
//! [`AssetRoots`] answers "will this path exist after the copy?" by probing
//! each source root in turn. [`prepare_output`] then performs the copy.

use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Static assets directory not found: {0}")]
    MissingAssets(PathBuf),
}

/// Answers whether a site-relative asset path resolves to a real file.
///
/// Implemented by [`AssetRoots`] for real builds; tests substitute a fixed set.
pub trait AssetLookup {
    fn exists(&self, relative_path: &str) -> bool;
}

/// The source directories an asset path may resolve under.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRoots {
    /// Project root.
    pub base: PathBuf,
    /// Parent of the static assets tree (so `assets/...` resolves in it).
    pub static_root: PathBuf,
    /// Photos tree, copied to `assets/photos`.
    pub photos: PathBuf,
}

impl AssetRoots {
    /// Candidate source files for `relative_path`, in probe order.
    ///
    /// Paths under `assets/photos/` map onto the photos tree by file name;
    /// anything else is also tried as a path inside the photos tree.
    pub fn candidates(&self, relative_path: &str) -> Vec<PathBuf> {
        let rel = Path::new(relative_path);
        let photo = if is_photo_path(rel) {
            match rel.file_name() {
                Some(name) => self.photos.join(name),
                None => self.photos.clone(),
            }
        } else {
            self.photos.join(rel)
        };
        vec![self.base.join(rel), self.static_root.join(rel), photo]
    }
}

impl AssetLookup for AssetRoots {
    fn exists(&self, relative_path: &str) -> bool {
        self.candidates(relative_path).iter().any(|p| p.exists())
    }
}

/// `assets/photos/...`: the first two components name the photos mount point.
fn is_photo_path(rel: &Path) -> bool {
    let mut parts = rel.components().filter_map(|c| match c {
        Component::Normal(s) => s.to_str(),
        _ => None,
    });
    parts.next() == Some("assets") && parts.next() == Some("photos")
}

/// What [`prepare_output`] copied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedOutput {
    pub output_dir: PathBuf,
    pub assets_copied: usize,
    /// `None` when there was no photos directory to copy.
    pub photos_copied: Option<usize>,
}

/// Rebuild the output directory from scratch.
///
/// Deletes `output_dir` entirely, recreates it, copies `static_assets` to
/// `output_dir/assets` and `photos` (if present) to `output_dir/assets/photos`.
/// Nothing from a previous build survives. A failure part-way leaves whatever
/// was copied so far.
pub fn prepare_output(
    output_dir: &Path,
    static_assets: &Path,
    photos: &Path,
) -> Result<PreparedOutput, OutputError> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    if !static_assets.is_dir() {
        return Err(OutputError::MissingAssets(static_assets.to_path_buf()));
    }
    let assets_out = output_dir.join("assets");
    let assets_copied = copy_tree(static_assets, &assets_out)?;

    let photos_out = assets_out.join("photos");
    let photos_copied = if photos.is_dir() {
        Some(copy_tree(photos, &photos_out)?)
    } else {
        fs::create_dir_all(&photos_out)?;
        None
    };

    Ok(PreparedOutput {
        output_dir: output_dir.to_path_buf(),
        assets_copied,
        photos_copied,
    })
}

/// Copy a directory tree into `dst`, returning the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, OutputError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|source| OutputError::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
