//! File-set resolution: glob include/exclude algebra per asset category.
//!
//! Every pipeline phase operates on a [`FileSetSpec`]: an ordered list of
//! include patterns, an ordered list of exclude patterns, and a destination
//! subtree. [`resolve_files`] expands the spec against a source root into a
//! concrete, deduplicated, lexicographically sorted file list.
//!
//! Rules:
//!
//! - Excludes always win: a file matched by any include *and* any exclude is
//!   never in the resolved set, regardless of pattern order.
//! - Include patterns may be negated with a leading `!`; a negated include
//!   is treated as an exclude (the conventional glob-list shorthand).
//! - Matching is case-insensitive (so `photo.JPG` matches `*.jpg` on every
//!   platform) but resolved paths keep their literal on-disk case.
//! - An empty result set is not an error — "no files matched" is a
//!   successful no-op for every downstream phase.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FilesetError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// One asset category's include/exclude patterns and destination mapping.
#[derive(Debug, Clone)]
pub struct FileSetSpec {
    /// Category label used in phase reporting ("php", "styles", ...).
    pub name: &'static str,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    /// Source-relative prefix stripped before joining onto `dest`
    /// (e.g. `assets/css/src` so `assets/css/src/editor/theme.css`
    /// lands at `<dest>/editor/theme.css`).
    pub strip_prefix: Option<String>,
    /// Destination subtree relative to the output root. Empty = root.
    pub dest: String,
}

impl FileSetSpec {
    /// Destination path (relative to the output root) for a source-relative
    /// file path, preserving structure below `strip_prefix`.
    pub fn dest_for(&self, rel: &Path) -> PathBuf {
        let below = match &self.strip_prefix {
            Some(prefix) => rel.strip_prefix(prefix).unwrap_or(rel),
            None => rel,
        };
        if self.dest.is_empty() {
            below.to_path_buf()
        } else {
            Path::new(&self.dest).join(below)
        }
    }
}

/// The full set of category specs for one theme source tree.
#[derive(Debug, Clone)]
pub struct FileSets {
    pub php: FileSetSpec,
    pub styles: FileSetSpec,
    pub scripts: FileSetSpec,
    pub images: FileSetSpec,
    pub fonts: FileSetSpec,
    pub languages: FileSetSpec,
    pub export: FileSetSpec,
}

/// Default category patterns for the starter's source layout.
///
/// `export_files` comes from `export.filesToCopy`; `production_slug` is
/// excluded from the PHP walk in case a stale production tree was ever
/// created inside the source root by an older tool.
pub fn default_filesets(export_files: &[String], production_slug: &str) -> FileSets {
    FileSets {
        php: FileSetSpec {
            name: "php",
            includes: vec!["**/*.php".to_string()],
            excludes: vec![
                "vendor/**".to_string(),
                "node_modules/**".to_string(),
                "optional/**".to_string(),
                format!("{production_slug}/**"),
            ],
            strip_prefix: None,
            dest: String::new(),
        },
        styles: FileSetSpec {
            name: "styles",
            includes: vec!["assets/css/src/**/*.css".to_string()],
            // Underscore-prefixed partials are imported, never shipped.
            excludes: vec!["assets/css/src/**/_*.css".to_string()],
            strip_prefix: Some("assets/css/src".to_string()),
            dest: "assets/css".to_string(),
        },
        scripts: FileSetSpec {
            name: "scripts",
            includes: vec!["assets/js/src/**/*.js".to_string()],
            excludes: vec![],
            strip_prefix: Some("assets/js/src".to_string()),
            dest: "assets/js".to_string(),
        },
        images: FileSetSpec {
            name: "images",
            includes: vec!["assets/images/src/**/*.{jpg,jpeg,png,gif,svg,webp}".to_string()],
            excludes: vec![],
            strip_prefix: Some("assets/images/src".to_string()),
            dest: "assets/images".to_string(),
        },
        fonts: FileSetSpec {
            name: "fonts",
            includes: vec!["assets/fonts/**/*.{woff,woff2,ttf,otf,eot}".to_string()],
            excludes: vec![],
            strip_prefix: None,
            dest: String::new(),
        },
        languages: FileSetSpec {
            name: "languages",
            includes: vec!["languages/**/*.{po,mo,pot}".to_string()],
            excludes: vec![],
            strip_prefix: None,
            dest: String::new(),
        },
        export: FileSetSpec {
            name: "export",
            includes: export_files.to_vec(),
            excludes: vec![],
            strip_prefix: None,
            dest: String::new(),
        },
    }
}

/// Expand a spec against a source root into absolute file paths.
///
/// Sorted lexicographically by path for deterministic output; never relies
/// on filesystem enumeration order.
pub fn resolve_files(root: &Path, spec: &FileSetSpec) -> Result<Vec<PathBuf>, FilesetError> {
    let (includes, negated) = split_negations(&spec.includes);
    if includes.is_empty() {
        return Ok(Vec::new());
    }
    let include_set = build_globset(&includes)?;
    let mut excludes = spec.excludes.clone();
    excludes.extend(negated);
    let exclude_set = build_globset(&excludes)?;

    let mut matched = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| FilesetError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if include_set.is_match(rel) && !exclude_set.is_match(rel) {
            matched.insert(entry.path().to_path_buf());
        }
    }
    Ok(matched.into_iter().collect())
}

/// Split a pattern list into positive patterns and `!`-negated ones
/// (returned with the `!` stripped, to be folded into the excludes).
fn split_negations(patterns: &[String]) -> (Vec<String>, Vec<String>) {
    let mut positive = Vec::new();
    let mut negated = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(rest) => negated.push(rest.to_string()),
            None => positive.push(pattern.clone()),
        }
    }
    (positive, negated)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, FilesetError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| FilesetError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| FilesetError::Pattern {
        pattern: "<set>".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn spec(includes: &[&str], excludes: &[&str]) -> FileSetSpec {
        FileSetSpec {
            name: "test",
            includes: includes.iter().map(|s| s.to_string()).collect(),
            excludes: excludes.iter().map(|s| s.to_string()).collect(),
            strip_prefix: None,
            dest: String::new(),
        }
    }

    fn rel_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn includes_match_recursively() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "functions.php", "<?php");
        write_file(tmp.path(), "inc/Setup/Component.php", "<?php");
        write_file(tmp.path(), "style.css", "body{}");

        let files = resolve_files(tmp.path(), &spec(&["**/*.php"], &[])).unwrap();
        assert_eq!(
            rel_names(tmp.path(), &files),
            vec!["functions.php", "inc/Setup/Component.php"]
        );
    }

    #[test]
    fn exclude_wins_over_include() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "functions.php", "<?php");
        write_file(tmp.path(), "vendor/autoload.php", "<?php");

        let files = resolve_files(tmp.path(), &spec(&["**/*.php"], &["vendor/**"])).unwrap();
        assert_eq!(rel_names(tmp.path(), &files), vec!["functions.php"]);
    }

    #[test]
    fn exclude_wins_regardless_of_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "optional/extra.php", "<?php");

        // include listed after the exclude would "re-add" in a naive
        // last-wins implementation; here the exclusion is absolute
        let files = resolve_files(
            tmp.path(),
            &spec(&["optional/extra.php", "**/*.php"], &["optional/**"]),
        )
        .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn negated_include_acts_as_exclude() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.css", "");
        write_file(tmp.path(), "_partial.css", "");

        let files = resolve_files(tmp.path(), &spec(&["**/*.css", "!**/_*.css"], &[])).unwrap();
        assert_eq!(rel_names(tmp.path(), &files), vec!["a.css"]);
    }

    #[test]
    fn empty_result_is_ok() {
        let tmp = TempDir::new().unwrap();
        let files = resolve_files(tmp.path(), &spec(&["assets/fonts/**/*.woff"], &[])).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn no_include_patterns_resolves_empty() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.php", "<?php");
        let files = resolve_files(tmp.path(), &spec(&[], &[])).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn result_is_sorted_and_deduplicated() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.css", "");
        write_file(tmp.path(), "a.css", "");

        // both patterns match both files; each appears once, sorted
        let files = resolve_files(tmp.path(), &spec(&["*.css", "**/*.css"], &[])).unwrap();
        assert_eq!(rel_names(tmp.path(), &files), vec!["a.css", "b.css"]);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "photo.JPG", "");

        let files = resolve_files(tmp.path(), &spec(&["**/*.jpg"], &[])).unwrap();
        // matched, and the literal case of the path is preserved
        assert_eq!(rel_names(tmp.path(), &files), vec!["photo.JPG"]);
    }

    #[test]
    fn brace_sets_expand() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "img/a.png", "");
        write_file(tmp.path(), "img/b.webp", "");
        write_file(tmp.path(), "img/c.txt", "");

        let files = resolve_files(tmp.path(), &spec(&["img/*.{png,webp}"], &[])).unwrap();
        assert_eq!(rel_names(tmp.path(), &files), vec!["img/a.png", "img/b.webp"]);
    }

    #[test]
    fn invalid_pattern_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_files(tmp.path(), &spec(&["a[unclosed"], &[])).unwrap_err();
        assert!(matches!(err, FilesetError::Pattern { .. }));
        assert!(err.to_string().contains("a[unclosed"));
    }

    // =========================================================================
    // Destination mapping
    // =========================================================================

    #[test]
    fn dest_for_strips_src_prefix() {
        let sets = default_filesets(&[], "acme");
        let dest = sets
            .styles
            .dest_for(Path::new("assets/css/src/editor/blocks.css"));
        assert_eq!(dest, Path::new("assets/css/editor/blocks.css"));
    }

    #[test]
    fn dest_for_preserves_structure_without_prefix() {
        let sets = default_filesets(&[], "acme");
        let dest = sets.php.dest_for(Path::new("inc/Setup/Component.php"));
        assert_eq!(dest, Path::new("inc/Setup/Component.php"));
    }

    #[test]
    fn default_php_spec_excludes_production_dir() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "functions.php", "<?php");
        write_file(tmp.path(), "acme/functions.php", "<?php");

        let sets = default_filesets(&[], "acme");
        let files = resolve_files(tmp.path(), &sets.php).unwrap();
        assert_eq!(rel_names(tmp.path(), &files), vec!["functions.php"]);
    }

    #[test]
    fn styles_spec_skips_partials() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "assets/css/src/global.css", "");
        write_file(tmp.path(), "assets/css/src/_custom-properties.css", "");

        let sets = default_filesets(&[], "acme");
        let files = resolve_files(tmp.path(), &sets.styles).unwrap();
        assert_eq!(
            rel_names(tmp.path(), &files),
            vec!["assets/css/src/global.css"]
        );
    }
}
