//! refsig - Reference Signal Panel CLI
//!
//! Drives a panel session from the command line: print the settings tree,
//! apply edits to the stored panel state, and print the service calls a
//! start/stop would send.

use anyhow::{Context, Result};
use clap::Parser;
use refsig::{
    config::{load_topics, JsonFileStore, VariantKind},
    panel::{service_channel, Multi, PanelSession, Single, Variant},
    FieldValue,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Panel state file (defaults to the app data directory)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Configuration schema of the panel: multi or single
    #[arg(long, global = true, default_value = "multi")]
    variant: VariantKind,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the settings tree as JSON
    Tree {
        /// JSON or TOML file listing the advertised topics
        #[arg(long)]
        topics: Option<PathBuf>,
    },
    /// Set a field, e.g. `set paths.0.slope 2` or `set general.totalTime inf`
    Set {
        path: String,
        /// New value; an empty string clears a time bound
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Append a default signal
    Add,
    /// Delete the signal at INDEX
    Delete { index: usize },
    /// Print the start service call
    Start,
    /// Print the stop service call
    Stop,
    /// Print the hydrated config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,refsig=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let store = match &args.state {
        Some(path) => JsonFileStore::new(path, args.variant),
        None => JsonFileStore::at_default_location(args.variant)
            .context("No state file given and no app data directory")?,
    };
    tracing::debug!("Using panel state at {:?}", store.path());

    match args.variant {
        VariantKind::Multi => run::<Multi>(args.cmd, store),
        VariantKind::Single => run::<Single>(args.cmd, store),
    }
}

fn run<V: Variant>(cmd: Command, store: JsonFileStore) -> Result<()> {
    let (calls, transport) = service_channel(1);
    let mut session = PanelSession::<V, _>::from_store(store, calls)?;

    match cmd {
        Command::Tree { topics } => {
            if let Some(path) = topics {
                session.set_topics(load_topics(&path)?);
            }
            print_json(&session.tree())?;
        }
        Command::Set { path, value } => {
            let segments: Vec<&str> = path.split('.').collect();
            let raw = parse_value(&value, V::takes_text(&segments)?);
            let changed = session
                .apply_edit(&segments, raw)
                .with_context(|| format!("Cannot set {} to {:?}", path, value))?;
            if !changed {
                tracing::info!("{} unchanged", path);
            }
            print_json(session.config())?;
        }
        Command::Add => {
            session.invoke_action("add-signal", None)?;
            print_json(session.config())?;
        }
        Command::Delete { index } => {
            if !session.invoke_action("delete-signal", Some(index))? {
                tracing::warn!("No signal at index {}", index);
            }
            print_json(session.config())?;
        }
        Command::Start => {
            session.start()?;
            print_json(&transport.drain())?;
        }
        Command::Stop => {
            session.stop()?;
            print_json(&transport.drain())?;
        }
        Command::Show => print_json(session.config())?,
    }

    Ok(())
}

/// Editor value from a command line argument
///
/// Text fields take the argument verbatim. Otherwise numbers (including
/// `inf`) become numbers, an empty string clears the field, and anything
/// else is text.
fn parse_value(raw: &str, text_field: bool) -> FieldValue {
    if text_field {
        return FieldValue::Text(raw.to_string());
    }
    if raw.is_empty() {
        return FieldValue::Unset;
    }
    match raw.parse::<f64>() {
        Ok(v) => FieldValue::Number(v),
        Err(_) => FieldValue::Text(raw.to_string()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
