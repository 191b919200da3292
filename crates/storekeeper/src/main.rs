//! Storekeeper command-line tool: inspect and edit configuration documents.
//!
//! # Usage
//!
//! ```text
//! storekeeper [OPTIONS] <NAME> <COMMAND>
//!
//! Commands:
//!   get [PATH] [--json]        Print a value (the whole mapping without PATH)
//!   set PATH VALUE [--json]    Store a value and save
//!   unset PATH                 Remove a value and save
//!   contains PATH              Print true/false
//!   truncate                   Empty the configuration and save
//!   dump                       Print the rendered document
//!   exists                     Print whether the backing file exists
//!   delete                     Remove the backing file
//!
//! Options:
//!   --folder    <DIR>   Directory holding <NAME>.php
//!   --separator <CHAR>  Path separator [default: .]
//!   --settings  <FILE>  TOML settings file (folder, separator)
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                 | Description                         |
//! |--------------------------|-------------------------------------|
//! | `STOREKEEPER_FOLDER`     | Directory holding the documents     |
//! | `STOREKEEPER_SEPARATOR`  | Path separator character            |
//! | `STOREKEEPER_SETTINGS`   | TOML settings file                  |
//! | `RUST_LOG`               | Log filter (default `info`)         |
//!
//! Settings are resolved in order: defaults, then the settings file, then the
//! `--folder` / `--separator` options.
//!
//! # Values
//!
//! `set` parses VALUE as a literal (`42`, `1.5`, `true`, `null`, `'text'`,
//! `['k' => 'v']`).  Anything that does not parse is stored as a plain string,
//! so `set db.host localhost` works without quoting.  With `--json`, VALUE is
//! parsed as JSON instead.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use storekeeper::infrastructure::storage::load_settings;
use storekeeper::{settings, Map, Store, StoreSettings, Value};
use storekeeper_core::{parse_value, render};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Hierarchical key-value configuration store.
///
/// The `#[derive(Parser)]` macro from `clap` generates the argument parser
/// automatically from the struct fields and their `#[arg(...)]` attributes.
#[derive(Debug, Parser)]
#[command(
    name = "storekeeper",
    about = "Read and edit dot-path addressed configuration documents",
    version
)]
struct Cli {
    /// TOML settings file providing `folder` and `separator`.
    #[arg(long, env = "STOREKEEPER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Directory holding the `<NAME>.php` documents.
    #[arg(long, env = "STOREKEEPER_FOLDER")]
    folder: Option<String>,

    /// Character separating path segments.
    #[arg(long, env = "STOREKEEPER_SEPARATOR")]
    separator: Option<char>,

    /// Configuration name (the document is `<folder><NAME>.php`).
    name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    /// Print the value at PATH, or the whole mapping.
    Get {
        path: Option<String>,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Store VALUE at PATH and save.
    Set {
        path: String,
        value: String,
        /// Parse VALUE as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove the value at PATH and save.
    Unset { path: String },
    /// Print whether a value exists at PATH.
    Contains { path: String },
    /// Remove every value and save.
    Truncate,
    /// Print the rendered document.
    Dump,
    /// Print whether the backing file exists.
    Exists,
    /// Remove the backing file.
    Delete,
}

impl Cli {
    /// Resolves the effective settings: defaults, then the settings file, then
    /// the command-line options.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed.
    fn resolve_settings(&self) -> anyhow::Result<StoreSettings> {
        let mut resolved = match &self.settings {
            Some(path) => load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => StoreSettings::default(),
        };
        if let Some(folder) = &self.folder {
            resolved.folder = folder.clone();
        }
        if let Some(separator) = self.separator {
            resolved.separator = separator;
        }
        Ok(resolved.normalized())
    }
}

// ── Command execution ─────────────────────────────────────────────────────────

/// Runs `command` against `store` and returns the text to print.
///
/// Mutating commands save the store before returning.
fn run(command: Command, store: &Store) -> anyhow::Result<String> {
    let output = match command {
        Command::Get { path, json } => {
            let value = store.get(path.as_deref().unwrap_or_default())?;
            if json {
                serde_json::to_string_pretty(&value).context("failed to encode value as JSON")?
            } else {
                format_value(&value)
            }
        }
        Command::Set { path, value, json } => {
            let value = parse_input(&value, json)?;
            store.set(&path, value)?;
            store.save()?;
            String::new()
        }
        Command::Unset { path } => {
            store.unset(&path)?;
            store.save()?;
            String::new()
        }
        Command::Contains { path } => store.contains(&path)?.to_string(),
        Command::Truncate => {
            store.truncate();
            store.save()?;
            String::new()
        }
        Command::Dump => render(&store.snapshot()),
        Command::Exists => (!store.is_missing_from_storage()).to_string(),
        Command::Delete => {
            store.delete()?;
            String::new()
        }
    };
    Ok(output)
}

/// Parses a command-line VALUE.
fn parse_input(raw: &str, json: bool) -> anyhow::Result<Value> {
    if json {
        return serde_json::from_str(raw).with_context(|| format!("invalid JSON value: {raw}"));
    }
    Ok(parse_value(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Mappings print as a literal document; scalars print plainly.
fn format_value(value: &Value) -> String {
    match value {
        Value::Map(map) => render(map),
        scalar => scalar.to_string(),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised to write log lines to stderr, so
///    command output on stdout stays clean.  The level is controlled by
///    `RUST_LOG`.
/// 2. CLI arguments are parsed with `clap` into a [`Cli`] struct.
/// 3. Settings are resolved and installed process-wide.
/// 4. The named store is opened and the command runs against it.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolved = cli.resolve_settings()?;
    info!(folder = %resolved.folder, separator = %resolved.separator, name = %cli.name, "storekeeper starting");
    settings::install(resolved);

    let store = storekeeper::open(&cli.name, Map::new())
        .with_context(|| format!("failed to open configuration '{}'", cli.name))?;

    let output = run(cli.command, &store)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
