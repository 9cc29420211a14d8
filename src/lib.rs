//! # rigbuild
//!
//! Build and bundle pipeline for a WordPress theme starter. The source
//! checkout is the data source: asset `src/` directories are compiled into
//! their sibling output directories for development, and a production
//! bundle is a renamed, transformed copy of the whole theme staged next to
//! the checkout and zipped for upload.
//!
//! # Architecture: Two Flows, One Pipeline
//!
//! ```text
//! Development   src tree  →  src tree        (compile assets in place)
//! Production    src tree  →  ../<slug>/      (rename + transform + stage)
//!                         →  ../<slug>.zip   (package)
//! ```
//!
//! Both flows run the same per-file pipeline — resolve a category's file
//! set, read, transform, write — and differ only in which transforms are
//! switched on. The production flow additionally rewrites every
//! default-identity token (starter name, slug, constant prefix, namespace)
//! to the configured theme's, strips dev-only blocks, extracts a
//! translation template, and packages the result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered JSON config loading, merging, and validation |
//! | [`identity`] | Theme identity: casing variants derived from a name |
//! | [`fileset`] | Glob include/exclude resolution per asset category |
//! | [`replace`] | Identity substitution, dev-block and WP-CLI stripping |
//! | [`assets`] | Per-category content processors behind a strategy trait |
//! | [`writer`] | Output writing and production-directory lifecycle |
//! | [`bundle`] | Orchestration: the development and production flows |
//! | [`i18n`] | Translation template extraction via WP-CLI |
//! | [`archive`] | Zip packaging of the finished production tree |
//! | [`report`] | CLI output formatting for build results |
//!
//! # Design Decisions
//!
//! ## Identity Substitution Is Plain Text Rewriting
//!
//! Renaming works on raw text, not on parsed PHP or CSS. The starter's
//! tokens (`wprig`, `WP Rig`, `WPRIG`, `Wprig`) are chosen to be unique
//! enough that a global, case-sensitive rewrite is safe, and applying it
//! twice is a no-op. This keeps the pipeline format-agnostic: the same
//! transform serves PHP namespaces, CSS custom properties, and readme
//! headers.
//!
//! ## Destroy-Then-Create Production Staging
//!
//! The production directory is disposable. Every bundle removes it
//! wholesale and rebuilds from source, so an interrupted or reconfigured
//! run can never leave stale files behind; recovery is simply running the
//! build again. Preconditions (theme renamed, no collision with the source
//! directory) are checked before anything is touched.
//!
//! ## Parallel Fan-Out With Hard Phase Barriers
//!
//! Asset categories write to disjoint destination subtrees, so they run
//! concurrently across the rayon pool. Phases that read earlier output
//! (translation extraction reads the substituted tree, packaging reads the
//! finished tree) wait for a full barrier first.
//!
//! ## Per-File Failure Tolerance
//!
//! One broken stylesheet should not abort a 300-file bundle. Read and
//! transform errors are recorded per file and reported as warnings; the
//! build completes and exits non-zero so CI still notices.

pub mod archive;
pub mod assets;
pub mod bundle;
pub mod config;
pub mod fileset;
pub mod i18n;
pub mod identity;
pub mod replace;
pub mod report;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
