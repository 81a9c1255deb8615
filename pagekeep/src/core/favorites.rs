// src/core/favorites.rs
use tracing::info;

use crate::models::{FavoritesMap, Registry, Report};

/// Points every favorite at the entry currently holding its URL in the registry.
///
/// Favorites whose URL is not registered keep their location and are noted in `report`.
///
/// # Returns
///
/// The number of favorites whose location changed.
pub fn sync_favorites(favorites: &mut FavoritesMap, registry: &Registry, report: &mut Report) -> usize {
    info!("========== syncing favorites ==========");
    let mut updated = 0_usize;
    for (url, location) in favorites.iter_mut() {
        let Some((artist, entry)) = registry.find_by_url(url) else {
            report.note(format!("favorite not in index: {url} ({location})"));
            continue;
        };
        let current = format!("{artist}/{entry}");
        if *location != current {
            info!("renaming '{location}' =============> '{current}'");
            *location = current;
            updated = updated.saturating_add(1);
        }
    }
    updated
}
