use clap::{Parser, Subcommand};
use rigbuild::assets::{CssPipeline, JsPipeline, Passthrough, ProcessorSet};
use rigbuild::config::BuildConfig;
use rigbuild::i18n::WpCliPot;
use rigbuild::{bundle, config, report};
use std::path::PathBuf;

/// Release builds report the crate version; anything built off-tag reports
/// the commit it came from.
fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

/// Shared flags for commands that can run the configured lint hooks.
#[derive(clap::Args, Clone)]
struct LintArgs {
    /// Run the configured stylesheet lint command first (dev.lint.styles)
    #[arg(long)]
    lint: bool,

    /// Run the configured PHP lint command first (dev.lint.php)
    #[arg(long)]
    phpcs: bool,
}

#[derive(Parser)]
#[command(name = "rigbuild")]
#[command(about = "Build and bundle pipeline for a WordPress theme starter")]
#[command(long_about = "\
Build and bundle pipeline for a WordPress theme starter

The source checkout is the data source. Asset src/ directories compile into
their sibling output directories; a production bundle stages a renamed copy
of the theme next to the checkout and zips it.

Source structure:

  my-theme/
  ├── config/
  │   ├── config.default.json      # Shipped defaults (don't edit)
  │   ├── config.json              # Your theme config (theme.name required)
  │   └── config.local.json        # Per-machine overrides (gitignored)
  ├── style.css                    # Theme header — copied & renamed on bundle
  ├── functions.php
  ├── inc/                         # PHP components
  ├── assets/
  │   ├── css/src/                 # Stylesheet sources (_*.css = partials)
  │   ├── js/src/                  # Script sources
  │   └── images/src/              # Image sources
  ├── languages/                   # Shipped .po/.mo files
  └── optional/                    # Dev-only extras, never bundled

Config resolution: config.default.json ← config.json ← config.local.json,
later files win per key. Bundling refuses to run until theme.name is set
to something other than the starter default.

Run 'rigbuild gen-config' to print a stock config.default.json.")]
#[command(version = version_string())]
struct Cli {
    /// Theme source directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Config directory (defaults to <source>/config)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile assets into the source tree for development
    Build {
        /// Keep debug output: skip stylesheet and script minification
        #[arg(long)]
        dev: bool,

        #[command(flatten)]
        lint: LintArgs,
    },
    /// Produce a production bundle: ../<slug>/ and ../<slug>.zip
    Bundle {
        #[command(flatten)]
        lint: LintArgs,
    },
    /// Print a stock config.default.json with all options
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let summary = match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
            return Ok(());
        }
        Command::Build { dev, lint } => {
            let config = load_config(&cli)?;
            run_lint_hooks(lint, &config);
            let processors = dev_processors(*dev, &config);
            bundle::build_development(&cli.source, &config, &processors)?
        }
        Command::Bundle { lint } => {
            let config = load_config(&cli)?;
            run_lint_hooks(lint, &config);
            bundle::build_production(
                &cli.source,
                &config,
                &ProcessorSet::production(),
                &WpCliPot::default(),
            )?
        }
    };

    report::print_summary(&summary);
    if !summary.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BuildConfig, config::ConfigError> {
    let dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| cli.source.join("config"));
    config::resolve(&dir)
}

/// Development processor set. `--dev` (or the config's debug switches)
/// keeps styles and scripts readable.
fn dev_processors(dev_flag: bool, config: &BuildConfig) -> ProcessorSet {
    ProcessorSet {
        styles: Box::new(CssPipeline {
            minify: !(dev_flag || config.dev.debug.styles),
        }),
        scripts: Box::new(JsPipeline {
            minify: !(dev_flag || config.dev.debug.scripts),
        }),
        images: Box::new(Passthrough),
    }
}

/// Run the configured lint commands for whichever flags were passed.
///
/// Lint results are advisory: a failing or missing command is reported and
/// the build continues.
fn run_lint_hooks(args: &LintArgs, config: &BuildConfig) {
    if args.lint {
        run_lint_command("styles", &config.dev.lint.styles);
    }
    if args.phpcs {
        run_lint_command("php", &config.dev.lint.php);
    }
}

fn run_lint_command(label: &str, command: &str) {
    if command.is_empty() {
        println!("warning: no {label} lint command configured (dev.lint.{label})");
        return;
    }
    println!("==> lint {label}: {command}");
    let status = std::process::Command::new("sh").arg("-c").arg(command).status();
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => println!("warning: {label} lint exited with {status}"),
        Err(err) => println!("warning: failed to run {label} lint: {err}"),
    }
}
