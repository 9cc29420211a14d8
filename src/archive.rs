//! Final packaging: the production directory, zipped.
//!
//! The archive is a plain `.zip` with entries rooted at the theme files
//! themselves (`style.css`, `functions.php`, ...), not wrapped in an extra
//! top-level directory. WordPress derives the install directory from the
//! archive name, so a wrapper directory would nest the theme one level too
//! deep on upload.

use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to read {path}: {source}")]
    Walk {
        path: String,
        source: walkdir::Error,
    },
    #[error("path {0} is not inside the archive root")]
    OutsideRoot(String),
}

/// Zip the contents of `source_dir` into `dest_zip`, deflate-compressed.
///
/// Entries are stored relative to `source_dir` with forward-slash
/// separators. Empty directories are preserved as directory entries. An
/// existing archive at `dest_zip` is overwritten.
pub fn compress(source_dir: &Path, dest_zip: &Path) -> Result<(), ArchiveError> {
    let file = File::create(dest_zip)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .unix_permissions(0o644);

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| ArchiveError::Walk {
            path: source_dir.display().to_string(),
            source: err,
        })?;
        let rel = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|_| ArchiveError::OutsideRoot(entry.path().display().to_string()))?;
        let name = entry_name(rel);

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else {
            writer.start_file(name, options)?;
            writer.write_all(&fs::read(entry.path())?)?;
        }
    }

    writer.finish()?;
    Ok(())
}

/// Zip entry names always use `/`, whatever the host separator is.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn build_theme_dir(tmp: &TempDir) -> std::path::PathBuf {
        let theme = tmp.path().join("acme");
        fs::create_dir_all(theme.join("assets/css")).unwrap();
        fs::create_dir_all(theme.join("inc")).unwrap();
        fs::write(theme.join("style.css"), "/* Theme Name: Acme */\n").unwrap();
        fs::write(theme.join("functions.php"), "<?php\n").unwrap();
        fs::write(theme.join("assets/css/global.css"), "body{}").unwrap();
        theme
    }

    #[test]
    fn entries_are_rooted_at_theme_files() {
        let tmp = TempDir::new().unwrap();
        let theme = build_theme_dir(&tmp);
        let dest = tmp.path().join("acme.zip");

        compress(&theme, &dest).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"style.css".to_string()));
        assert!(names.contains(&"assets/css/global.css".to_string()));
        assert!(
            names.iter().all(|n| !n.starts_with("acme/")),
            "no wrapper directory expected, got {names:?}"
        );
    }

    #[test]
    fn file_contents_round_trip() {
        let tmp = TempDir::new().unwrap();
        let theme = build_theme_dir(&tmp);
        let dest = tmp.path().join("acme.zip");

        compress(&theme, &dest).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut entry = archive.by_name("style.css").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "/* Theme Name: Acme */\n");
    }

    #[test]
    fn empty_directories_are_preserved() {
        let tmp = TempDir::new().unwrap();
        let theme = build_theme_dir(&tmp);
        fs::create_dir(theme.join("languages")).unwrap();
        let dest = tmp.path().join("acme.zip");

        compress(&theme, &dest).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"languages/".to_string()));
    }

    #[test]
    fn existing_archive_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        let theme = build_theme_dir(&tmp);
        let dest = tmp.path().join("acme.zip");
        fs::write(&dest, "not a zip").unwrap();

        compress(&theme, &dest).unwrap();

        assert!(zip::ZipArchive::new(File::open(&dest).unwrap()).is_ok());
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("acme.zip");
        let err = compress(&tmp.path().join("nope"), &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::Walk { .. }));
    }
}
