//! Build configuration: layered loading, merging, and identity resolution.
//!
//! Configuration is read from up to three JSON documents in the config
//! directory, merged in order on top of built-in defaults:
//!
//! ```text
//! built-in defaults
//!   ← config.default.json   # shipped with the starter
//!   ← config.json           # the theme author's config
//!   ← config.local.json     # per-machine overrides (gitignored)
//! ```
//!
//! Later layers win per key. The default layer must exist; the custom and
//! local files may be absent. The merge
//! is shallow — a layer that sets `theme` replaces the whole `theme` object —
//! with one exception: the `dev` section merges one level deep, and
//! `dev.browserSync` one level deeper, so that setting only an HTTPS flag in
//! `config.local.json` does not discard a proxy URL set in `config.json`.
//!
//! ## Schema
//!
//! ```json
//! {
//!   "theme": { "name": "Acme", "slug": "acme", "author": "Acme Inc" },
//!   "dev": {
//!     "browserSync": {
//!       "live": true, "proxyURL": "localhost:8080",
//!       "https": false, "certPath": "", "keyPath": ""
//!     },
//!     "debug": { "styles": false, "scripts": false },
//!     "lint": { "styles": "", "php": "" }
//!   },
//!   "export": {
//!     "compress": true,
//!     "generateTranslationFiles": true,
//!     "filesToCopy": ["style.css", "readme.txt", "LICENSE", "screenshot.png"]
//!   }
//! }
//! ```
//!
//! `theme.name` is the only required field; every other identity token is
//! derived from it (see [`crate::identity`]) unless pinned explicitly.
//!
//! There is no cached process-wide config: the orchestrator calls
//! [`resolve`] fresh at the top of every build, so watch-style callers never
//! see stale values.

use crate::identity::{self, ThemeIdentity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File names of the three config layers, in merge order.
pub const LAYER_FILES: [&str; 3] = ["config.default.json", "config.json", "config.local.json"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Config deserialization error: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Fully resolved configuration for one build invocation.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub theme: ThemeIdentity,
    pub dev: DevConfig,
    pub export: ExportConfig,
}

/// Raw document shape shared by all three layers.
///
/// Identity fields are all optional here — resolution fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    theme: ThemeSection,
    dev: DevConfig,
    export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct ThemeSection {
    name: Option<String>,
    slug: Option<String>,
    author: Option<String>,
    underscore_case: Option<String>,
    constant: Option<String>,
    camel_case: Option<String>,
    camel_case_var: Option<String>,
}

/// Development-time settings (live reload, debug output, lint hooks).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DevConfig {
    pub browser_sync: BrowserSyncConfig,
    pub debug: DebugConfig,
    pub lint: LintConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BrowserSyncConfig {
    pub live: bool,
    #[serde(rename = "proxyURL")]
    pub proxy_url: String,
    pub https: bool,
    pub cert_path: String,
    pub key_path: String,
}

impl Default for BrowserSyncConfig {
    fn default() -> Self {
        Self {
            live: true,
            proxy_url: "localhost:8080".to_string(),
            https: false,
            cert_path: String::new(),
            key_path: String::new(),
        }
    }
}

/// Keep sourcemap-style debug output in dev builds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub styles: bool,
    pub scripts: bool,
}

/// Optional lint commands run by `--lint` / `--phpcs`.
///
/// Empty string means "nothing configured" — the flag becomes a logged no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    pub styles: String,
    pub php: String,
}

/// Production export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ExportConfig {
    pub compress: bool,
    pub generate_translation_files: bool,
    /// Files copied byte-for-byte into the bundle, then given a post-copy
    /// substitution pass (they may carry default-identity tokens).
    pub files_to_copy: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compress: true,
            generate_translation_files: true,
            files_to_copy: vec![
                "style.css".to_string(),
                "readme.txt".to_string(),
                "LICENSE".to_string(),
                "screenshot.png".to_string(),
            ],
        }
    }
}

/// Load one config layer as a raw JSON value.
///
/// Returns `Ok(None)` if the file does not exist; invalid JSON is an error.
pub fn load_layer(path: &Path) -> Result<Option<serde_json::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Merge `overlay` on top of `base` with the layering rules:
///
/// - top-level keys replace wholesale,
/// - `dev` merges one level deep,
/// - `dev.browserSync` merges one further level.
///
/// Merging the same overlay twice is a no-op after the first application.
pub fn merge_layer(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    let (Value::Object(mut base_map), Value::Object(overlay_map)) = (base, overlay) else {
        // Non-object layers cannot merge; typed deserialization rejects the
        // document afterwards with a real error message.
        return Value::Object(Default::default());
    };

    for (key, overlay_val) in overlay_map {
        let merged = if key == "dev" {
            match (base_map.remove(&key), overlay_val) {
                (Some(Value::Object(base_dev)), Value::Object(overlay_dev)) => {
                    Value::Object(merge_dev(base_dev, overlay_dev))
                }
                (_, other) => other,
            }
        } else {
            overlay_val
        };
        base_map.insert(key, merged);
    }
    Value::Object(base_map)
}

fn merge_dev(
    mut base: serde_json::Map<String, serde_json::Value>,
    overlay: serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    use serde_json::Value;

    for (key, overlay_val) in overlay {
        let merged = if key == "browserSync" {
            match (base.remove(&key), overlay_val) {
                (Some(Value::Object(mut base_bs)), Value::Object(overlay_bs)) => {
                    base_bs.extend(overlay_bs);
                    Value::Object(base_bs)
                }
                (_, other) => other,
            }
        } else {
            overlay_val
        };
        base.insert(key, merged);
    }
    base
}

/// Built-in defaults as a JSON value — the base every layer merges onto.
///
/// Note the theme section is deliberately empty: `theme.name` must come from
/// a config file, it has no built-in fallback.
fn builtin_defaults() -> serde_json::Value {
    serde_json::to_value(ConfigDocument::default()).unwrap_or_default()
}

/// Resolve the merged configuration from a config directory.
///
/// `config.default.json` must exist (the starter ships it); the custom and
/// local layers are optional. `theme.name` must be present in some layer.
pub fn resolve(config_dir: &Path) -> Result<BuildConfig, ConfigError> {
    let mut layers = Vec::new();
    for file in LAYER_FILES {
        layers.push(load_layer(&config_dir.join(file))?);
    }
    if layers[0].is_none() {
        return Err(ConfigError::Validation(format!(
            "{} not found in {}",
            LAYER_FILES[0],
            config_dir.display()
        )));
    }
    resolve_layers(layers)
}

/// Resolve from already-loaded layer values (merge order = vec order).
pub fn resolve_layers(layers: Vec<Option<serde_json::Value>>) -> Result<BuildConfig, ConfigError> {
    let mut merged = builtin_defaults();
    for layer in layers.into_iter().flatten() {
        merged = merge_layer(merged, layer);
    }
    let document: ConfigDocument = serde_json::from_value(merged)?;
    let theme = resolve_identity(&document.theme)?;
    Ok(BuildConfig {
        theme,
        dev: document.dev,
        export: document.export,
    })
}

/// Fill identity fields: explicit values are trusted, absent ones derived.
fn resolve_identity(section: &ThemeSection) -> Result<ThemeIdentity, ConfigError> {
    let name = section.name.clone().ok_or_else(|| {
        ConfigError::Validation(
            "theme.name is required — set it in config.json (or config.default.json)".to_string(),
        )
    })?;
    let slug = section
        .slug
        .clone()
        .unwrap_or_else(|| identity::slugify(&name));
    let author = section.author.clone().unwrap_or_default();
    let derived = ThemeIdentity::from_slug(&name, &slug, &author);
    Ok(ThemeIdentity {
        underscore_case: section
            .underscore_case
            .clone()
            .unwrap_or(derived.underscore_case),
        constant: section.constant.clone().unwrap_or(derived.constant),
        camel_case: section.camel_case.clone().unwrap_or(derived.camel_case),
        camel_case_var: section
            .camel_case_var
            .clone()
            .unwrap_or(derived.camel_case_var),
        name: derived.name,
        slug: derived.slug,
        author: derived.author,
    })
}

/// The stock `config.default.json` the starter ships with, pretty-printed.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_json() -> String {
    let document = ConfigDocument {
        theme: ThemeSection {
            name: Some("WP Rig".to_string()),
            slug: Some("wprig".to_string()),
            author: Some("The WP Rig Contributors".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    // Serializing a ConfigDocument cannot fail.
    serde_json::to_string_pretty(&document).unwrap_or_default()
}
