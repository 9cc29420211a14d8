//! Text transforms: identity substitution and pragma-driven block removal.
//!
//! ## Identity substitution
//!
//! Production builds rewrite every default-identity token (the starter's
//! name, slug, constant prefix, and so on) to the configured theme's
//! equivalents. The search side is always [`default_identity`]; the
//! replacement side is the resolved [`ThemeIdentity`].
//!
//! Replacement is global, case-sensitive, and **not** word-boundary
//! anchored: a default token occurring as a substring of a longer
//! identifier is replaced too. This mirrors how the starter's templates are
//! written (tokens are chosen to be unique enough) and is pinned by tests
//! so the boundary is explicit.
//!
//! ## Dev-only blocks
//!
//! Code delimited by a pair of line-comment pragmas is stripped from
//! production output, markers included:
//!
//! ```text
//! // dev-only:start
//! add_action( 'wp_footer', __NAMESPACE__ . '\\debug_panel' );
//! // dev-only:end
//! ```
//!
//! Multiple independent pairs per file are supported. Parsing is
//! permissive: unmatched markers are left exactly where they were, never an
//! error.

use crate::identity::{ThemeIdentity, default_identity};
use regex::Regex;
use std::sync::LazyLock;

/// Start pragma for a dev-only block (matched anywhere in a line).
pub const DEV_BLOCK_START: &str = "dev-only:start";
/// End pragma for a dev-only block.
pub const DEV_BLOCK_END: &str = "dev-only:end";

/// Ordered (search, replacement) pairs derived from two identities.
#[derive(Debug, Clone)]
pub struct ReplacementTable {
    pairs: Vec<(Regex, String)>,
}

impl ReplacementTable {
    /// Build the table mapping `from`'s tokens to `to`'s.
    ///
    /// One pair per identity field with a non-empty search token, ordered
    /// longest-token-first so `"WP Rig"` is rewritten before `"wprig"`
    /// could touch it, and deduplicated by search token (the default slug,
    /// underscore and camelCase-var tokens all read `wprig`). The sort is
    /// stable and `slug` is listed before the variants that coincide with
    /// it, so the shared token substitutes to the slug.
    pub fn new(from: &ThemeIdentity, to: &ThemeIdentity) -> Self {
        let mut fields: Vec<(&str, &str)> = vec![
            (from.author.as_str(), to.author.as_str()),
            (from.name.as_str(), to.name.as_str()),
            (from.slug.as_str(), to.slug.as_str()),
            (from.underscore_case.as_str(), to.underscore_case.as_str()),
            (from.constant.as_str(), to.constant.as_str()),
            (from.camel_case.as_str(), to.camel_case.as_str()),
            (from.camel_case_var.as_str(), to.camel_case_var.as_str()),
        ];
        fields.sort_by_key(|(search, _)| std::cmp::Reverse(search.len()));

        let mut pairs = Vec::new();
        let mut seen = Vec::new();
        for (search, replacement) in fields {
            if search.is_empty() || seen.contains(&search) {
                continue;
            }
            seen.push(search);
            // Escaped literal tokens always compile.
            let pattern = Regex::new(&regex::escape(search)).expect("escaped token must compile");
            pairs.push((pattern, replacement.to_string()));
        }
        Self { pairs }
    }

    /// Table mapping the starter's baseline identity to `theme`.
    pub fn for_theme(theme: &ThemeIdentity) -> Self {
        Self::new(&default_identity(), theme)
    }

    /// Apply every pair, in order, globally.
    pub fn apply(&self, content: &str) -> String {
        let mut out = content.to_string();
        for (pattern, replacement) in &self.pairs {
            out = pattern
                .replace_all(&out, replacement.as_str())
                .into_owned();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Strip every matched dev-only block, markers included.
///
/// Non-nested: a second start pragma inside an open block is ordinary
/// content and goes away with the block. An unmatched start (no end before
/// EOF) and a stray end with no preceding start are both left untouched.
///
/// Lines are carried with their own terminators, so CRLF files stay CRLF
/// and the trailing-newline state survives. A line holding both pragmas is
/// a complete one-line block and is dropped on its own.
pub fn strip_dev_blocks(content: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut span: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in content.split_inclusive('\n') {
        if in_block {
            span.push(line);
            if line.contains(DEV_BLOCK_END) {
                in_block = false;
                span.clear();
            }
        } else if line.contains(DEV_BLOCK_START) {
            if line.contains(DEV_BLOCK_END) {
                continue;
            }
            in_block = true;
            span.push(line);
        } else {
            kept.push(line);
        }
    }
    // Unmatched start: the span runs to EOF, restore it as-is.
    kept.extend(span);
    kept.concat()
}

static WP_CLI_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    // Anchored head and a lazy body up to the first column-zero brace, so
    // similarly shaped conditionals are never touched.
    Regex::new(r"(?ms)^if \( defined\( 'WP_CLI' \) && WP_CLI \) \{$.*?^\}\n?")
        .expect("WP-CLI block pattern must compile")
});

/// Remove the WP-CLI command-registration conditional.
///
/// Applied to `functions.php` only. The starter registers its scaffolding
/// commands behind `if ( defined( 'WP_CLI' ) && WP_CLI )`; a distributed
/// theme has no use for them. Content without the block passes through
/// unchanged.
pub fn remove_wp_cli_block(content: &str) -> String {
    WP_CLI_BLOCK.replace(content, "").into_owned()
}
