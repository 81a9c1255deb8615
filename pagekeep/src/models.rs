// src/models.rs
pub mod download_map;
pub mod favorites;
pub mod multi_entries;
pub mod page;
pub mod registry;
pub mod report;

pub use download_map::DownloadMap;
pub use favorites::FavoritesMap;
pub use multi_entries::MultiEntryAllowList;
pub use page::{Capture, PageFile};
pub use registry::{Entries, Registry};
pub use report::{EntryRef, Report};
