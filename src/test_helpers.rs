//! Shared test fixtures: on-disk theme trees and resolved configs.
//!
//! Tests build real directory structures in `TempDir`s rather than mocking
//! the filesystem, so the same code paths run in tests and in production.

use crate::config::{self, BuildConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a file under `root`, creating parent directories as needed.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A resolved config for a theme renamed to "Acme".
pub fn acme_config() -> BuildConfig {
    config::resolve_layers(vec![Some(serde_json::json!({
        "theme": { "name": "Acme", "author": "Acme Inc" }
    }))])
    .unwrap()
}

/// Create a miniature starter checkout under `parent` and return its root.
///
/// The tree carries every token and marker the transforms care about:
/// identity tokens in the stylesheet header and PHP, a WP-CLI registration
/// block, a dev-only block, an underscore-prefixed CSS partial, and a
/// shipped translation file.
pub fn write_theme_fixture(parent: &Path) -> PathBuf {
    let root = parent.join("wprig-src");

    write_file(
        &root,
        "style.css",
        "/*\n\
         Theme Name: WP Rig\n\
         Author: The WP Rig Contributors\n\
         Text Domain: wprig\n\
         */\n",
    );
    write_file(
        &root,
        "functions.php",
        "<?php\n\
         if ( defined( 'WP_CLI' ) && WP_CLI ) {\n\
         \trequire get_template_directory() . '/optional/cli/commands.php';\n\
         }\n\
         // dev-only:start\n\
         require get_template_directory() . '/inc/debug-panel.php';\n\
         // dev-only:end\n\
         function wprig_setup() {\n\
         \tload_theme_textdomain( 'wprig' );\n\
         }\n",
    );
    write_file(
        &root,
        "inc/Setup/Component.php",
        "<?php\nnamespace Wprig\\Setup;\n\nclass Component {\n\tconst SLUG = 'wprig';\n}\n",
    );
    write_file(
        &root,
        "assets/css/src/global.css",
        ":root {\n\t--wprig-gap: 1rem;\n}\n\nbody {\n\tmargin: 0;\n}\n",
    );
    write_file(&root, "assets/css/src/_custom-properties.css", ":root {}\n");
    write_file(
        &root,
        "assets/js/src/navigation.js",
        "const menu = document.querySelector( '.menu' );\n",
    );
    write_file(&root, "readme.txt", "=== WP Rig ===\nStable tag: 2.0\n");
    write_file(&root, "LICENSE", "GNU GENERAL PUBLIC LICENSE\n");
    write_file(&root, "languages/de_DE.po", "msgid \"\"\nmsgstr \"\"\n");

    root
}
