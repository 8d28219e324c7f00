//! Collections

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Wallpaper used for collections without an entry in [`WALLPAPERS`].
pub const DEFAULT_WALLPAPER: &str = "/wallpapers/collection-1.jpg";

/// Built-in wallpapers by collection slug.
pub const WALLPAPERS: [(&str, &str); 3] = [
    ("season-1", "/wallpapers/collection-1.jpg"),
    ("season-2", "/wallpapers/collection-2.jpg"),
    ("season-3", "/wallpapers/collection-3.jpg"),
];

/// Look up the built-in wallpaper for a slug, ignoring case.
pub fn wallpaper_for(slug: &str) -> &'static str {
    let slug = slug.to_lowercase();

    WALLPAPERS
        .iter()
        .find(|(key, _)| *key == slug)
        .map_or(DEFAULT_WALLPAPER, |&(_, wallpaper)| wallpaper)
}

/// Collection metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    /// Document id, usually the slug
    pub id: String,

    /// URL slug (e.g. `season-1`)
    pub slug: String,

    /// Display name
    pub name: String,

    /// Header wallpaper
    pub wallpaper: String,

    /// Locked collections are hidden until they unlock
    pub locked: bool,

    /// Unlock time in milliseconds since the epoch, `0` when unset
    #[serde(default)]
    pub unlock_at: i64,
}

impl CollectionMeta {
    /// Whether the collection can be browsed at `now`.
    ///
    /// A locked collection opens once its unlock time has passed.
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        !self.locked || (self.unlock_at > 0 && now.as_millisecond() >= self.unlock_at)
    }
}
