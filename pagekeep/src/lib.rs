// src/lib.rs
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod utils;

pub use cli::{Args, Command, run};
pub use config::Settings;
pub use crate::core::canonical::{canonical_name, padding_width, plan_entry};
pub use crate::core::classifier::{ClassifiedEntry, classify_entry};
pub use crate::core::cleaner::clean_directory_name;
pub use crate::core::extract::{ArchiveExtractor, ZipExtractor};
pub use crate::core::favorites::sync_favorites;
pub use crate::core::ingest::{prune_download_map, register_downloads, stage_archives, unpack_archives};
pub use crate::core::library::{EntryDir, Library};
pub use crate::core::normalize::{
    PageNormalization, normalize_pages, plan_entry_names, plan_page_names, rename_registry_entries,
};
pub use crate::core::patterns::{NamingPattern, Strategy};
pub use crate::core::planner::RenamePlan;
pub use crate::core::reconciler::reconcile;
pub use error::Error;
pub use models::{DownloadMap, FavoritesMap, MultiEntryAllowList, Registry, Report};
