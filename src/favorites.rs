//! Durable favorites: a set of item ids stored as one JSON array.

use std::path::{Path, PathBuf};

use crate::state::FavoriteSet;

/// What: File-backed favorites slot.
///
/// Inputs:
/// - `path`: JSON file holding an array of ids (see [`FavoritesStore::default_path`]).
///
/// Details:
/// - The whole set is read and written as a unit. Concurrent toggles are not merged; the
///   last `save` wins.
#[derive(Clone, Debug)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config>/lists/favorites.json`
    pub fn default_path() -> PathBuf {
        crate::config::lists_dir().join("favorites.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What: Read the stored favorites.
    ///
    /// Output:
    /// - The stored set; empty when nothing is stored yet or the slot cannot be read or parsed.
    pub fn load(&self) -> FavoriteSet {
        let body = match std::fs::read_to_string(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FavoriteSet::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read favorites");
                return FavoriteSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&body) {
            Ok(ids) => ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "favorites file is not a JSON id array");
                FavoriteSet::new()
            }
        }
    }

    /// What: Replace the stored favorites with `set`.
    ///
    /// Output:
    /// - `true` on success; `false` when the write failed (logged, never fatal).
    ///
    /// Details:
    /// - Writes a sorted JSON array to a temporary sibling and renames it into place.
    pub fn save(&self, set: &FavoriteSet) -> bool {
        match self.write(set) {
            Ok(()) => {
                tracing::debug!(count = set.len(), "favorites saved");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to save favorites");
                false
            }
        }
    }

    fn write(&self, set: &FavoriteSet) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let ids: Vec<&String> = set.iter().collect();
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&ids)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Toggle `id` in `current`, persist the result, and return it.
    ///
    /// The returned set is the new in-memory value even if the save failed.
    pub fn toggle(&self, current: &FavoriteSet, id: &str) -> FavoriteSet {
        let next = toggled(current, id);
        self.save(&next);
        next
    }
}

/// What: Pure toggle combinator over a favorites set.
///
/// Output:
/// - A copy of `set` with `id` added if absent or removed if present. Blank ids leave the set
///   unchanged.
pub fn toggled(set: &FavoriteSet, id: &str) -> FavoriteSet {
    let id = id.trim();
    let mut next = set.clone();
    if id.is_empty() {
        return next;
    }
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}
