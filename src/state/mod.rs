//! Application state split into value types and the browsing screen store.
//!
//! Public re-exports keep `crate::state::*` paths short for the rest of the crate.

pub mod browser;
pub mod types;

pub use browser::BrowserState;
pub use types::{
    CatalogItem, CatalogSnapshot, FavoriteSet, FilterCriteria, FilteredView, Ingredient,
    LoadEvent, ScrubState,
};
