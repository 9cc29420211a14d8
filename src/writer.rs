//! Output writing and production-directory lifecycle.
//!
//! Two jobs live here:
//!
//! - [`write`]: persist one transformed file, creating intermediate
//!   directories on demand and overwriting unconditionally — every build is
//!   idempotent from source, so there is nothing to protect.
//! - The production directory: a disposable staging tree named after the
//!   theme slug, sitting next to the source tree. It is destroyed and
//!   recreated on every production build ([`ensure_production_dir`]), which
//!   is also the recovery path after an interrupted build — no incremental
//!   merging, ever.
//!
//! Precondition checks run before any filesystem mutation and their
//! failures are fatal: a production build must never target the source
//! directory itself, and must never run under the starter's default
//! identity.

use crate::identity::ThemeIdentity;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("precondition failed: {0}")]
    Precondition(String),
}

/// Write `content` to `dest`, creating parent directories as needed.
///
/// Existing files are overwritten. Safe to call concurrently for sibling
/// paths: `create_dir_all` tolerates directories racing into existence.
pub fn write(dest: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, content)
}

/// The production staging directory for a theme: `<source parent>/<slug>`.
pub fn production_dir(source_root: &Path, slug: &str) -> PathBuf {
    match source_root.parent() {
        Some(parent) => parent.join(slug),
        None => PathBuf::from(slug),
    }
}

/// Where the finished archive lands: next to the production directory.
pub fn archive_path(source_root: &Path, slug: &str) -> PathBuf {
    production_dir(source_root, slug).with_extension("zip")
}

/// Fatal checks before a production build touches the filesystem.
///
/// - The theme must not still carry the starter's default name or slug.
/// - The production directory must not collide with the source directory.
pub fn check_production_preconditions(
    source_root: &Path,
    theme: &ThemeIdentity,
) -> Result<(), WriterError> {
    if theme.is_default() {
        return Err(WriterError::Precondition(
            "theme name/slug still match the starter defaults — set theme.name \
             (and optionally theme.slug) in config.json before bundling"
                .to_string(),
        ));
    }
    let source_name = source_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if source_name == theme.slug {
        return Err(WriterError::Precondition(format!(
            "production directory '{}' would collide with the source directory — \
             rename the source checkout or pick a different slug",
            theme.slug
        )));
    }
    Ok(())
}

/// Destroy-then-create the production directory.
///
/// A leftover tree from any earlier run — different config, interrupted
/// build, anything — is removed wholesale so stale files can never leak
/// into a fresh bundle.
pub fn ensure_production_dir(path: &Path) -> Result<(), WriterError> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}
