//! Build orchestration: the development and production flows.
//!
//! Both flows share one per-file pipeline (read, optional text transforms,
//! category processor, write) and differ in which transforms run and where
//! output lands:
//!
//! - **Development** rebuilds compiled assets in place under the source
//!   tree: styles, scripts and images from their `src/` directories into
//!   the sibling output directories. No identity substitution, no dev-block
//!   stripping. Re-entrant by construction, so it can back a watch loop.
//! - **Production** stages a complete renamed theme into a sibling
//!   directory named after the slug, then optionally zips it. Identity
//!   substitution and dev-block stripping apply to every text category.
//!
//! Categories with disjoint destinations fan out in parallel; phase
//! boundaries are hard barriers (the post-copy substitution pass reads
//! files the fan-out copied, packaging reads the finished tree).
//!
//! Failure policy: anything that invalidates the whole build (bad pattern,
//! precondition, directory lifecycle, packaging) is fatal and typed in
//! [`BuildError`]. A single file failing to read or transform is recorded
//! in its [`PhaseOutcome`] and the phase moves on; callers turn a non-zero
//! failure count into a non-zero exit.

use crate::archive::{self, ArchiveError};
use crate::assets::{AssetProcessor, Passthrough, ProcessorSet, TransformError};
use crate::config::BuildConfig;
use crate::fileset::{FileSetSpec, FilesetError, default_filesets, resolve_files};
use crate::i18n::PotGenerator;
use crate::replace::{self, ReplacementTable};
use crate::writer;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Fileset(#[from] FilesetError),
    #[error(transparent)]
    Writer(#[from] writer::WriterError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One file that failed inside an otherwise-continuing phase.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Per-phase result: how many files were handled, and which ones failed.
#[derive(Debug)]
pub struct PhaseOutcome {
    pub name: &'static str,
    pub files: usize,
    pub failures: Vec<FileFailure>,
}

impl PhaseOutcome {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            files: 0,
            failures: Vec::new(),
        }
    }
}

/// Everything a caller needs to report on a finished build.
#[derive(Debug)]
pub struct BuildSummary {
    pub phases: Vec<PhaseOutcome>,
    /// Where output landed: the source root (dev) or the production dir.
    pub dest_root: PathBuf,
    pub archive: Option<PathBuf>,
}

impl BuildSummary {
    pub fn failure_count(&self) -> usize {
        self.phases.iter().map(|p| p.failures.len()).sum()
    }

    pub fn files_handled(&self) -> usize {
        self.phases.iter().map(|p| p.files).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Which text transforms run for a category.
#[derive(Clone, Copy, Default)]
struct TextPolicy<'a> {
    strip_dev_blocks: bool,
    table: Option<&'a ReplacementTable>,
    /// Drop the WP-CLI registration block from the root `functions.php`.
    strip_wp_cli: bool,
}

impl TextPolicy<'_> {
    const BINARY: TextPolicy<'static> = TextPolicy {
        strip_dev_blocks: false,
        table: None,
        strip_wp_cli: false,
    };
}

type PhaseJob<'a> = Box<dyn FnOnce() -> Result<PhaseOutcome, BuildError> + Send + 'a>;

/// Development build: compile assets in place under the source tree.
pub fn build_development(
    source_root: &Path,
    config: &BuildConfig,
    processors: &ProcessorSet,
) -> Result<BuildSummary, BuildError> {
    let source_root = &fs::canonicalize(source_root)?;
    let sets = default_filesets(&config.export.files_to_copy, &config.theme.slug);
    let mut phases = vec![clean_generated(source_root)?];

    let no_text = TextPolicy::BINARY;
    let jobs: Vec<PhaseJob> = vec![
        Box::new(|| run_category(source_root, source_root, &sets.styles, &*processors.styles, no_text)),
        Box::new(|| run_category(source_root, source_root, &sets.scripts, &*processors.scripts, no_text)),
        Box::new(|| run_category(source_root, source_root, &sets.images, &*processors.images, no_text)),
    ];
    phases.extend(run_parallel(jobs)?);

    // PHP is served straight from source in development; the phase only
    // verifies the set resolves.
    let mut php = PhaseOutcome::new(sets.php.name);
    php.files = resolve_files(source_root, &sets.php)?.len();
    phases.push(php);

    Ok(BuildSummary {
        phases,
        dest_root: source_root.to_path_buf(),
        archive: None,
    })
}

/// Production build: stage, transform, translate, substitute, package.
///
/// The source root is canonicalized first: the production directory must be
/// a sibling of the real checkout even when the caller passes a relative
/// path such as the CLI default `.`, and the collision check needs a real
/// basename to compare against the slug.
pub fn build_production(
    source_root: &Path,
    config: &BuildConfig,
    processors: &ProcessorSet,
    pot: &dyn PotGenerator,
) -> Result<BuildSummary, BuildError> {
    let source_root = &fs::canonicalize(source_root)?;
    writer::check_production_preconditions(source_root, &config.theme)?;
    let prod = writer::production_dir(source_root, &config.theme.slug);
    writer::ensure_production_dir(&prod)?;

    let mut phases = vec![clean_generated(source_root)?];

    let table = ReplacementTable::for_theme(&config.theme);
    let sets = default_filesets(&config.export.files_to_copy, &config.theme.slug);
    let php_policy = TextPolicy {
        strip_dev_blocks: true,
        table: Some(&table),
        strip_wp_cli: true,
    };
    let asset_policy = TextPolicy {
        strip_dev_blocks: true,
        table: Some(&table),
        strip_wp_cli: false,
    };
    let binary = TextPolicy::BINARY;
    let copy = Passthrough;

    let jobs: Vec<PhaseJob> = vec![
        Box::new(|| run_category(source_root, &prod, &sets.php, &copy, php_policy)),
        Box::new(|| run_category(source_root, &prod, &sets.styles, &*processors.styles, asset_policy)),
        Box::new(|| run_category(source_root, &prod, &sets.scripts, &*processors.scripts, asset_policy)),
        Box::new(|| run_category(source_root, &prod, &sets.images, &*processors.images, binary)),
        Box::new(|| run_category(source_root, &prod, &sets.fonts, &copy, binary)),
        Box::new(|| run_category(source_root, &prod, &sets.export, &copy, binary)),
    ];
    phases.extend(run_parallel(jobs)?);

    phases.push(translate(source_root, &prod, &sets.languages, config, &table, pot)?);
    phases.push(substitute_exported(&prod, &config.export.files_to_copy, &table));

    let archive = if config.export.compress {
        let dest = writer::archive_path(source_root, &config.theme.slug);
        archive::compress(&prod, &dest)?;
        Some(dest)
    } else {
        None
    };

    Ok(BuildSummary {
        phases,
        dest_root: prod,
        archive,
    })
}

/// Run independent category jobs across the rayon pool, preserving order.
fn run_parallel(jobs: Vec<PhaseJob>) -> Result<Vec<PhaseOutcome>, BuildError> {
    jobs.into_par_iter().map(|job| job()).collect()
}

/// Remove previously generated assets so nothing stale survives a rename
/// or a deleted source file. Only output directories are touched; the
/// `src/` subtree inside each is the input and always survives.
fn clean_generated(source_root: &Path) -> Result<PhaseOutcome, BuildError> {
    let mut outcome = PhaseOutcome::new("clean");
    for generated in ["assets/css", "assets/js", "assets/images"] {
        let dir = source_root.join(generated);
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_name() == "src" {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            outcome.files += 1;
        }
    }
    Ok(outcome)
}

/// Resolve one category and push every file through the pipeline.
///
/// Pattern and walk errors abort the build; per-file read/transform/write
/// errors are recorded and the rest of the set still completes.
fn run_category(
    source_root: &Path,
    dest_root: &Path,
    spec: &FileSetSpec,
    processor: &dyn AssetProcessor,
    policy: TextPolicy,
) -> Result<PhaseOutcome, BuildError> {
    let files = resolve_files(source_root, spec)?;
    let mut outcome = PhaseOutcome::new(spec.name);

    let results: Vec<Result<(), FileFailure>> = files
        .par_iter()
        .map(|abs| {
            transform_one(source_root, dest_root, spec, abs, processor, policy).map_err(|err| {
                FileFailure {
                    path: abs.strip_prefix(source_root).unwrap_or(abs).to_path_buf(),
                    error: err.to_string(),
                }
            })
        })
        .collect();

    for result in results {
        match result {
            Ok(()) => outcome.files += 1,
            Err(failure) => outcome.failures.push(failure),
        }
    }
    Ok(outcome)
}

/// The per-file pipeline: read, pre-transform, process, post-transform,
/// write. Text transforms only apply to valid UTF-8 content; anything else
/// flows through byte-for-byte.
fn transform_one(
    source_root: &Path,
    dest_root: &Path,
    spec: &FileSetSpec,
    abs: &Path,
    processor: &dyn AssetProcessor,
    policy: TextPolicy,
) -> Result<(), TransformError> {
    let rel = abs.strip_prefix(source_root).unwrap_or(abs);
    let raw = fs::read(abs)?;

    // Dev blocks go before the processor: a minifier would strip comment
    // markers but keep the code between them.
    let pre = match String::from_utf8(raw) {
        Ok(text) if policy.strip_dev_blocks => replace::strip_dev_blocks(&text).into_bytes(),
        Ok(text) => text.into_bytes(),
        Err(err) => err.into_bytes(),
    };

    let processed = processor.process(abs, pre)?;

    let out = match (policy.table, String::from_utf8(processed)) {
        (Some(table), Ok(text)) => {
            let text = if policy.strip_wp_cli && rel == Path::new("functions.php") {
                replace::remove_wp_cli_block(&text)
            } else {
                text
            };
            table.apply(&text).into_bytes()
        }
        (_, Ok(text)) => text.into_bytes(),
        (_, Err(err)) => err.into_bytes(),
    };

    writer::write(&dest_root.join(spec.dest_for(rel)), &out)?;
    Ok(())
}

/// Copy shipped translation files and extract a fresh `.pot` template.
///
/// Extraction reads the original sources, not the transformed output; the
/// template text then goes through the substitution table so it carries
/// the renamed text domain. A failing extractor is a warning, not a fatal
/// error: the theme is complete without the template.
fn translate(
    source_root: &Path,
    prod: &Path,
    languages: &FileSetSpec,
    config: &BuildConfig,
    table: &ReplacementTable,
    pot: &dyn PotGenerator,
) -> Result<PhaseOutcome, BuildError> {
    let mut outcome = run_category(source_root, prod, languages, &Passthrough, TextPolicy::BINARY)?;
    if !config.export.generate_translation_files {
        return Ok(outcome);
    }

    let template = Path::new("languages").join(format!("{}.pot", config.theme.slug));
    match pot.generate(source_root) {
        Ok(bytes) => {
            let bytes = match String::from_utf8(bytes) {
                Ok(text) => table.apply(&text).into_bytes(),
                Err(err) => err.into_bytes(),
            };
            writer::write(&prod.join(&template), &bytes)?;
            outcome.files += 1;
        }
        Err(err) => outcome.failures.push(FileFailure {
            path: template,
            error: err.to_string(),
        }),
    }
    Ok(outcome)
}

/// Post-copy substitution over files that were exported byte-for-byte.
///
/// `style.css` and friends carry identity tokens in their headers but are
/// copied untransformed in the fan-out; this pass rewrites them in place
/// inside the production tree. Binary entries (screenshots) are skipped.
fn substitute_exported(prod: &Path, files: &[String], table: &ReplacementTable) -> PhaseOutcome {
    let mut outcome = PhaseOutcome::new("substitute");
    for rel in files {
        let path = prod.join(rel);
        if !path.is_file() {
            continue;
        }
        match substitute_in_place(&path, table) {
            Ok(changed) => outcome.files += usize::from(changed),
            Err(err) => outcome.failures.push(FileFailure {
                path: PathBuf::from(rel),
                error: err.to_string(),
            }),
        }
    }
    outcome
}

fn substitute_in_place(path: &Path, table: &ReplacementTable) -> std::io::Result<bool> {
    let raw = fs::read(path)?;
    let Ok(text) = String::from_utf8(raw) else {
        return Ok(false);
    };
    let rewritten = table.apply(&text);
    if rewritten == text {
        return Ok(false);
    }
    fs::write(path, rewritten)?;
    Ok(true)
}
