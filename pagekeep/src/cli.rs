// src/cli.rs
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::info;

use crate::config::Settings;
use crate::core::extract::ZipExtractor;
use crate::core::favorites::sync_favorites;
use crate::core::ingest::{prune_download_map, register_downloads, stage_archives, unpack_archives};
use crate::core::library::Library;
use crate::core::normalize::{normalize_pages, plan_entry_names, rename_registry_entries};
use crate::core::reconciler::reconcile;
use crate::models::{DownloadMap, FavoritesMap, MultiEntryAllowList, Registry, Report};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (defaults to the nearest pagekeep.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Library base directory (defaults to current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ingest downloads, clean entry names, normalize pages and reconcile the index
    Process,
    /// Stage, unpack and register downloaded archives
    Ingest,
    /// Strip artist tokens, tag blocks and watermarks from entry directory names
    CleanEntries,
    /// Rename page files to their canonical zero-padded names
    Normalize {
        /// Only log the planned renames
        #[arg(long)]
        dry_run: bool,
    },
    /// Sync the index with the directories on disk and report anomalies
    Reconcile,
    /// Point favorites at their current index entries
    Favorites,
    /// Drop download records whose archive is gone from the staging directory
    PruneDownloads,
}

/// Runs one command against the library selected by `args`.
///
/// # Errors
///
/// Returns the first fatal error. Warnings never fail the run and are logged
/// once at the end, also when a fatal error cut it short.
pub fn run(args: Args) -> Result<()> {
    let start_dir = match args.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let settings = Settings::load(args.config.as_deref(), &start_dir)?;
    let mut report = Report::new();
    let result = execute(&args.command, &settings, &mut report);
    report.log();
    result
}

fn execute(command: &Command, settings: &Settings, report: &mut Report) -> Result<()> {
    let library = Library::new(settings);
    match command {
        Command::Process => {
            let mut registry = Registry::load(&settings.registry)?;
            ingest(settings, &library, &mut registry, report)?;
            clean_entries(settings, &library, &mut registry, report)?;
            normalize_pages(&library, false, report)?;
            refresh_index(settings, &library, &mut registry, report)?;
        }
        Command::Ingest => {
            let mut registry = Registry::load(&settings.registry)?;
            ingest(settings, &library, &mut registry, report)?;
        }
        Command::CleanEntries => {
            let mut registry = Registry::load(&settings.registry)?;
            clean_entries(settings, &library, &mut registry, report)?;
        }
        Command::Normalize { dry_run } => {
            normalize_pages(&library, *dry_run, report)?;
        }
        Command::Reconcile => {
            let mut registry = Registry::load(&settings.registry)?;
            refresh_index(settings, &library, &mut registry, report)?;
        }
        Command::Favorites => {
            let registry = Registry::load(&settings.registry)?;
            let mut favorites = FavoritesMap::load(&settings.favorites)?;
            let updated = sync_favorites(&mut favorites, &registry, report);
            favorites.save(&settings.favorites)?;
            info!("{updated} favorites updated");
        }
        Command::PruneDownloads => {
            let mut downloads = DownloadMap::load(&settings.downloads)?;
            let dropped = prune_download_map(&mut downloads, settings, report)?;
            downloads.save(&settings.downloads)?;
            info!("{dropped} download records dropped");
        }
    }
    Ok(())
}

fn ingest(settings: &Settings, library: &Library, registry: &mut Registry, report: &mut Report) -> Result<()> {
    let downloads = DownloadMap::load(&settings.downloads)?;
    stage_archives(registry, &downloads, settings, report)?;
    unpack_archives(library, &ZipExtractor)?;
    let plan = register_downloads(registry, &downloads, library, report)?;
    plan.commit("entries")?;
    registry.save(&settings.registry)
}

fn clean_entries(settings: &Settings, library: &Library, registry: &mut Registry, report: &mut Report) -> Result<()> {
    let plan = plan_entry_names(library, report)?;
    plan.commit("entries")?;
    rename_registry_entries(registry, &plan);
    registry.save(&settings.registry)
}

fn refresh_index(settings: &Settings, library: &Library, registry: &mut Registry, report: &mut Report) -> Result<()> {
    let allow_list = MultiEntryAllowList::load(&settings.multi_entries)?;
    reconcile(registry, library, &allow_list, report)?;
    registry.save(&settings.registry)
}
