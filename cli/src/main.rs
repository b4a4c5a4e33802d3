//! Page changelog command-line tool.
//!
//! Records lifecycle events read from JSON, runs the retention sweep, and
//! prints stored history.
//!
//! Usage:
//!   changelog migrate
//!   changelog record events.json --actor-id 41 --actor-name editor
//!   changelog sweep
//!   changelog history 1015
//!   changelog recent --limit 20

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use changelog_contracts::{
    config::ChangelogConfig,
    context::{Caller, RequestContext},
    error::{ChangelogError, ChangelogResult},
    event::LifecycleEvent,
    record::{Actor, AuditRecord},
};
use changelog_core::{traits::ChangelogStore, Recorder, RetentionSweeper, TextSanitizer};
use changelog_store::SqliteStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Page changelog: record page lifecycle events and query their history.
#[derive(Parser)]
#[command(name = "changelog", version)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database holding the `process_changelog` table.
    #[arg(long, global = true, default_value = "changelog.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bring the database schema up to date.
    Migrate {
        /// Stop at this schema version instead of the latest.
        #[arg(long)]
        to: Option<u32>,
    },
    /// Record lifecycle events from a JSON file (one event or an array).
    Record {
        file: PathBuf,
        #[arg(long, default_value_t = 0)]
        actor_id: u64,
        #[arg(long, default_value = "")]
        actor_name: String,
        /// Script the request came in through.
        #[arg(long)]
        script: Option<String>,
        /// Full request URL, logged in `all` caller mode.
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete records older than the configured maximum age.
    Sweep,
    /// Show every stored record for one page.
    History { page_id: u64 },
    /// Show the newest records.
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventBatch {
    One(LifecycleEvent),
    Many(Vec<LifecycleEvent>),
}

impl EventBatch {
    fn into_events(self) -> Vec<LifecycleEvent> {
        match self {
            EventBatch::One(event) => vec![event],
            EventBatch::Many(events) => events,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see classification decisions.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("changelog error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ChangelogResult<()> {
    let config = changelog_config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Migrate { to } => migrate(&cli.database, to),
        Command::Record {
            file,
            actor_id,
            actor_name,
            script,
            url,
        } => {
            let mut ctx = RequestContext::new(Actor::new(actor_id, actor_name));
            if let Some(script) = script {
                let mut caller = Caller::script(script);
                if let Some(url) = url {
                    caller = caller.with_request_url(url);
                }
                ctx = ctx.with_caller(caller);
            }
            record(&config, &cli.database, &file, &ctx)
        }
        Command::Sweep => sweep(&config, &cli.database),
        Command::History { page_id } => history(&cli.database, page_id),
        Command::Recent { limit } => {
            let store = SqliteStore::open(&cli.database)?;
            print_records(&store.recent(limit)?);
            Ok(())
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn migrate(database: &Path, to: Option<u32>) -> ChangelogResult<()> {
    let store = SqliteStore::open_unmigrated(database)?;
    let before = store.schema_version()?;
    let after = match to {
        Some(target) => store.migrate_to(target)?,
        None => store.migrate()?,
    };
    println!("schema version {} -> {}", before, after);
    Ok(())
}

fn record(
    config: &ChangelogConfig,
    database: &Path,
    file: &Path,
    ctx: &RequestContext,
) -> ChangelogResult<()> {
    let text = std::fs::read_to_string(file).map_err(|e| ChangelogError::InvalidEvent {
        reason: format!("cannot read '{}': {}", file.display(), e),
    })?;
    let batch: EventBatch =
        serde_json::from_str(&text).map_err(|e| ChangelogError::InvalidEvent {
            reason: format!("'{}': {}", file.display(), e),
        })?;

    let store = Arc::new(SqliteStore::open(database)?);
    let recorder = Recorder::new(config, store, Arc::new(TextSanitizer::default()));

    info!(request_id = %ctx.request_id, "recording lifecycle events");
    for event in batch.into_events() {
        let outcome = recorder.record(&event, ctx);
        for (op, id) in &outcome.written {
            println!("page {:>6}  {:<11} logged as #{}", event.page.id, op, id.0);
        }
        for reason in &outcome.suppressed {
            println!("page {:>6}  {} skipped: {:?}", event.page.id, event.method, reason);
        }
        for warning in &outcome.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    Ok(())
}

fn sweep(config: &ChangelogConfig, database: &Path) -> ChangelogResult<()> {
    let store = Arc::new(SqliteStore::open(database)?);
    let sweeper = RetentionSweeper::from_config(store, config)?;

    match sweeper.max_age() {
        Some(age) => {
            let deleted = sweeper.sweep(Utc::now())?;
            println!("deleted {} record(s) older than {}", deleted, age);
        }
        None => println!("no retention configured; nothing deleted"),
    }
    Ok(())
}

fn history(database: &Path, page_id: u64) -> ChangelogResult<()> {
    let store = SqliteStore::open(database)?;
    let summary = store.history(page_id)?;

    match summary.first_seen {
        Some(first) => println!(
            "page {}: {} record(s) since {}",
            page_id, summary.count, first
        ),
        None => println!("page {}: no records", page_id),
    }
    print_records(&store.records_for_subject(page_id)?);
    Ok(())
}

fn print_records(records: &[AuditRecord]) {
    for record in records {
        println!(
            "#{:<6} {}  page {:<6} {:<11} by {} ({})",
            record.id.0,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.subject_id,
            record.operation,
            record.actor_name,
            record.actor_id,
        );
        match record.details() {
            Ok(details) => {
                for (label, value) in details.iter() {
                    println!("         {}: {}", label, value);
                }
            }
            Err(e) => println!("         (unreadable details: {})", e),
        }
    }
}
