//! Core non-UI logic split into modular submodules.

pub mod detail;
pub mod facets;
pub mod filter;
pub mod scrub;

// Re-export public APIs to keep call sites short (crate::logic::...)
pub use detail::{ingredient_line, resolve_detail, resolve_favorites};
pub use facets::{Facets, resolve_facets};
pub use filter::{item_cmp, recompute};
pub use scrub::{Alphabet, HideToken, RailLayout, ScrollTarget, Scrubber};
