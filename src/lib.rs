//! Library entry for cocktail-hub: catalog loading, filtering, scrubbing, details, favorites.

#[cfg(test)]
mod test_utils;

pub mod config;
pub mod events;
pub mod favorites;
pub mod index;
pub mod logic;
pub mod sources;
pub mod state;
pub mod util;
