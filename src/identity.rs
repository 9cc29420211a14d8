//! Theme identity: the set of name variants derived from one name/slug pair.
//!
//! A theme is identified by a single human-readable name (e.g. "Acme Press").
//! Every other token the build pipeline substitutes — text domain, PHP
//! namespace, constant prefix, function prefix — is a pure function of the
//! slug:
//!
//! | Field | Example | Used for |
//! |-------|---------|----------|
//! | `name` | `Acme Press` | Theme header, readme |
//! | `slug` | `acme-press` | Text domain, directory name, archive name |
//! | `underscore_case` | `acme_press` | Function prefix, hook names |
//! | `constant` | `ACME_PRESS` | PHP constant prefix |
//! | `camel_case` | `AcmePress` | PHP namespace / class prefix |
//! | `camel_case_var` | `acmePress` | JS variable prefix |
//!
//! Config may pin any field explicitly (a slug containing a PHP reserved
//! word, say, that would not round-trip from the name); explicit values are
//! trusted as-is and never overwritten. Absent fields are derived.
//!
//! The starter ships with a fixed baseline identity ([`default_identity`]).
//! It is only ever the *search* side of substitution — never mutated.

use serde::{Deserialize, Serialize};

/// All name variants for one theme, computed once per build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeIdentity {
    pub name: String,
    pub slug: String,
    pub underscore_case: String,
    pub constant: String,
    pub camel_case: String,
    pub camel_case_var: String,
    pub author: String,
}

impl ThemeIdentity {
    /// Derive a full identity from a name, filling every field.
    pub fn derive(name: &str, author: &str) -> Self {
        let slug = slugify(name);
        Self::from_slug(name, &slug, author)
    }

    /// Derive all slug-dependent fields from an explicit slug.
    pub fn from_slug(name: &str, slug: &str, author: &str) -> Self {
        let camel = camel_case(slug);
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            underscore_case: underscore_case(slug),
            constant: constant_case(slug),
            camel_case_var: lower_first(&camel),
            camel_case: camel,
            author: author.to_string(),
        }
    }

    /// True if this identity still carries the starter's default name or slug.
    ///
    /// Production builds refuse to run in this state — bundling a theme that
    /// still calls itself by the starter's identity is never intended.
    pub fn is_default(&self) -> bool {
        let default = default_identity();
        self.name == default.name || self.slug == default.slug
    }
}

/// The baseline identity the starter ships with.
///
/// The slug is pinned rather than derived ("WP Rig" would slugify to
/// `wp-rig`); all other variants follow from it.
pub fn default_identity() -> ThemeIdentity {
    ThemeIdentity::from_slug("WP Rig", "wprig", "The WP Rig Contributors")
}

/// Kebab-case slug from a human-readable name.
///
/// Lowercase, whitespace and underscores become hyphens, everything outside
/// `[a-z0-9-]` is stripped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        match c {
            c if c.is_whitespace() || c == '_' => slug.push('-'),
            c if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' => slug.push(c),
            _ => {}
        }
    }
    slug
}

/// `acme-press` → `acme_press`.
pub fn underscore_case(slug: &str) -> String {
    slug.replace('-', "_")
}

/// `acme-press` → `ACME_PRESS`.
pub fn constant_case(slug: &str) -> String {
    underscore_case(slug).to_uppercase()
}

/// `acme-press` → `AcmePress`.
pub fn camel_case(slug: &str) -> String {
    slug.split('-')
        .filter(|seg| !seg.is_empty())
        .map(upper_first)
        .collect()
}

fn upper_first(seg: &str) -> String {
    let mut chars = seg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
