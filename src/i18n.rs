//! Translation template generation for production bundles.
//!
//! The bundle ships a `languages/<slug>.pot` file so translators can start
//! from the finished theme. Extraction itself is delegated to an external
//! tool through the [`PotGenerator`] trait; the default implementation
//! shells out to WP-CLI's `wp i18n make-pot`, which understands the full
//! range of WordPress translation functions. Tests inject a fake generator
//! instead of requiring WP-CLI on the machine running them.

use crate::assets::TransformError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produces the raw bytes of a `.pot` template for a theme source tree.
pub trait PotGenerator: Sync {
    fn generate(&self, source_dir: &Path) -> Result<Vec<u8>, TransformError>;
}

/// Extraction via `wp i18n make-pot <source> <tmp>`.
///
/// The command name is configurable so a wrapper script (or a test double)
/// can stand in for the real binary.
pub struct WpCliPot {
    pub command: String,
}

impl Default for WpCliPot {
    fn default() -> Self {
        Self {
            command: "wp".to_string(),
        }
    }
}

impl WpCliPot {
    fn scratch_path(&self) -> PathBuf {
        std::env::temp_dir().join(format!("rigbuild-{}.pot", std::process::id()))
    }
}

impl PotGenerator for WpCliPot {
    fn generate(&self, source_dir: &Path) -> Result<Vec<u8>, TransformError> {
        let scratch = self.scratch_path();
        let output = Command::new(&self.command)
            .arg("i18n")
            .arg("make-pot")
            .arg(source_dir)
            .arg(&scratch)
            .output()
            .map_err(|err| {
                TransformError::ProcessingFailed(format!(
                    "failed to invoke '{}': {} (is WP-CLI installed?)",
                    self.command, err
                ))
            })?;

        if !output.status.success() {
            let _ = fs::remove_file(&scratch);
            return Err(TransformError::ProcessingFailed(format!(
                "'{} i18n make-pot' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let pot = fs::read(&scratch)?;
        let _ = fs::remove_file(&scratch);
        Ok(pot)
    }
}
