//! s3sync - Main entry point
//!
//! Backs up and restores a working directory against a remote object store.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use s3sync::actions::{self, Session};
use s3sync::config::Config;
use s3sync::naming::{BackupNames, DEFAULT_BACKUP_NAME};
use s3sync::prompt::{TerminalPrompt, UserPrompt};
use s3sync::remote::{DirStore, RemoteStore};
use s3sync::utils;
use s3sync::SyncError;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Action {
    /// Archive the working directory and copy/overwrite it to the store
    Backup,
    /// Update/overwrite local files from the remote backup
    Update,
    /// Delete local content and update from the remote backup
    Restore,
    /// Create a timestamped copy of the remote backup
    Snapshot,
    /// Test the full pipeline against disposable artifacts
    DryRun,
    /// Create a local backup archive without uploading
    Archive,
    /// Extract the local backup archive
    Extract,
    /// List files in the local backup archive
    List,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to run; prompts with a menu when omitted
    #[arg(value_enum)]
    action: Option<Action>,

    /// Path to configuration file (defaults to s3sync.conf in the root)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Working directory to sync (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

const ACTION_MENU: &[&str] = &[
    "backup: Copy/overwrite to the remote store",
    "snapshot: Create a copy of the remote backup",
    "update: Update/overwrite local from the remote store",
    "restore: Delete local and update from the remote store",
    "",
    "dry-run: Test setup",
    "",
    "archive: Create a local backup",
    "extract: Extract the local backup",
    "list: List files in the local backup",
];

fn main() -> Result<()> {
    let args = Args::parse();
    utils::logger::init(&args.log_level)?;
    tracing::info!("s3sync v{}", env!("CARGO_PKG_VERSION"));

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    // an explicitly given config file must load; the default location may
    // be absent
    let config = match args.config {
        Some(path) => Config::from_file(&path)?,
        None => Config::load(&root),
    };
    let prompt = TerminalPrompt;

    let action = match args.action {
        Some(action) => action,
        None => select_action(&prompt)?,
    };
    run(action, &config, &root, &prompt)?;
    Ok(())
}

/// Ask for an action by name when none was given on the command line.
fn select_action(prompt: &dyn UserPrompt) -> Result<Action> {
    let menu = ACTION_MENU.join("\n");
    let answer = prompt.input(&format!("\nPlease type an action:\n\n{menu}\n: "))?;
    let name = answer.split(':').next().unwrap_or("").trim().to_string();
    Action::from_str(&name, true)
        .map_err(|_| anyhow::anyhow!("no matching action found: {answer}"))
}

fn run(action: Action, config: &Config, root: &Path, prompt: &dyn UserPrompt) -> Result<()> {
    tracing::info!("Executing action: {action:?}");
    let base = config
        .backup_name()
        .unwrap_or_else(|| DEFAULT_BACKUP_NAME.to_string());
    let names = BackupNames::new(&base, root);

    match action {
        Action::Archive => actions::archive_local(root, &names)?,
        Action::Extract => actions::extract_local(root, &names)?,
        Action::List => actions::list_local(&names)?,
        Action::Backup => remote_session(config, root, prompt)?.backup()?,
        Action::Update => remote_session(config, root, prompt)?.update()?,
        Action::Restore => remote_session(config, root, prompt)?.restore()?,
        Action::Snapshot => remote_session(config, root, prompt)?.snapshot()?,
        Action::DryRun => remote_session(config, root, prompt)?.dry_run()?,
    }
    Ok(())
}

/// Open the configured store and run the shared precondition phase. The
/// core assumes a working store; a missing store configuration is fatal.
fn remote_session(
    config: &Config,
    root: &Path,
    prompt: &dyn UserPrompt,
) -> s3sync::Result<Session> {
    let store_dir = config.store_dir().ok_or_else(|| {
        SyncError::Setup("no remote store configured: set S3SYNC_STORE_DIR".to_string())
    })?;
    let store: Box<dyn RemoteStore> = Box::new(DirStore::new(store_dir));
    Session::new(config, root, store, prompt)
}
