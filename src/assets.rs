//! Per-category asset processors behind a uniform strategy trait.
//!
//! The pipeline itself is format-agnostic: each file category (styles,
//! scripts, images) gets an injected [`AssetProcessor`] with one shape,
//! `(source path, content) -> content`. The implementations shipped here
//! are deliberately modest — comment stripping and whitespace collapsing,
//! not a full CSS/JS toolchain — because their output quality is not part
//! of the pipeline's correctness contract. Anything smarter (esbuild-class
//! bundling, real image optimization) plugs in through the same trait.
//!
//! Tests exercise the pipeline through recording and failing doubles, the
//! same way the orchestrator sees a processor.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// One per-category content transform, applied per file.
///
/// `Sync` so the orchestrator can share processors across rayon workers.
pub trait AssetProcessor: Sync {
    fn process(&self, source: &Path, content: Vec<u8>) -> Result<Vec<u8>, TransformError>;
}

/// The processor set for one build flavor (dev or production).
pub struct ProcessorSet {
    pub styles: Box<dyn AssetProcessor>,
    pub scripts: Box<dyn AssetProcessor>,
    pub images: Box<dyn AssetProcessor>,
}

impl ProcessorSet {
    /// Development set: structure-preserving, nothing minified.
    pub fn development() -> Self {
        Self {
            styles: Box::new(CssPipeline { minify: false }),
            scripts: Box::new(JsPipeline { minify: false }),
            images: Box::new(Passthrough),
        }
    }

    /// Production set: minified styles and scripts.
    pub fn production() -> Self {
        Self {
            styles: Box::new(CssPipeline { minify: true }),
            scripts: Box::new(JsPipeline { minify: true }),
            images: Box::new(Passthrough),
        }
    }
}

/// Copies content through unchanged. Used for images and as a stand-in
/// wherever a category needs no per-file processing.
pub struct Passthrough;

impl AssetProcessor for Passthrough {
    fn process(&self, _source: &Path, content: Vec<u8>) -> Result<Vec<u8>, TransformError> {
        Ok(content)
    }
}

/// Stylesheet processing: comment stripping and whitespace minification.
pub struct CssPipeline {
    pub minify: bool,
}

impl AssetProcessor for CssPipeline {
    fn process(&self, source: &Path, content: Vec<u8>) -> Result<Vec<u8>, TransformError> {
        if !self.minify {
            return Ok(content);
        }
        let text = utf8(source, content)?;
        let stripped = strip_block_comments(&text);
        let minified: String = stripped
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Ok(minified.into_bytes())
    }
}

/// Script processing: block-comment stripping and blank-line removal.
pub struct JsPipeline {
    pub minify: bool,
}

impl AssetProcessor for JsPipeline {
    fn process(&self, source: &Path, content: Vec<u8>) -> Result<Vec<u8>, TransformError> {
        if !self.minify {
            return Ok(content);
        }
        let text = utf8(source, content)?;
        let stripped = strip_block_comments(&text);
        let minified: String = stripped
            .lines()
            .map(str::trim_end)
            .filter(|line| {
                let trimmed = line.trim_start();
                !trimmed.is_empty() && !trimmed.starts_with("//")
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(minified.into_bytes())
    }
}

fn utf8(source: &Path, content: Vec<u8>) -> Result<String, TransformError> {
    String::from_utf8(content).map_err(|_| {
        TransformError::ProcessingFailed(format!("{} is not valid UTF-8", source.display()))
    })
}

/// Remove `/* ... */` comments. Quote-blind by design: a comment opener
/// inside a string literal is treated as a comment, which the starter's
/// stylesheets and scripts never rely on.
fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out, // unterminated comment swallows the tail
        }
    }
    out.push_str(rest);
    out
}
