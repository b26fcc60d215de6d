//! Configuration for cocktail-hub.
//!
//! Resolves the config directory tree and reads `settings.conf`.

mod paths;
mod settings;

pub use paths::{config_dir, images_dir, lists_dir, logs_dir};
pub use settings::{Settings, SettingsReadError, parse_settings, read_settings, settings};
