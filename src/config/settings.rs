use std::fs;
use std::path::PathBuf;

use super::paths::resolve_settings_config_path;
use crate::logic::scrub::Alphabet;
use crate::sources::DEFAULT_API_BASE;

/// User-tunable settings read from `settings.conf`.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Base URL of the cocktail API, without a trailing slash.
    pub api_base_url: String,
    /// Letters/digits fetched concurrently per loader chunk.
    pub group_size: usize,
    /// Pause between loader chunks.
    pub chunk_delay_ms: u64,
    /// How long the scrub overlay stays up after the last interaction.
    pub scrub_hide_ms: u64,
    pub scrub_alphabet: Alphabet,
    /// Columns in the results grid; `1` for a plain list.
    pub grid_columns: usize,
    /// Height of one results row in layout units.
    pub row_height: f32,
    /// Thumbnail cache directory; `None` means `<config>/images`.
    pub image_cache_dir: Option<PathBuf>,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            group_size: 5,
            chunk_delay_ms: 50,
            scrub_hide_ms: 800,
            scrub_alphabet: Alphabet::Full,
            grid_columns: 1,
            row_height: 1.0,
            image_cache_dir: None,
            log_level: "info".to_string(),
            http_timeout_secs: 15,
        }
    }
}

/// `settings.conf` exists but could not be read.
#[derive(Debug)]
pub struct SettingsReadError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for SettingsReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot read {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for SettingsReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// What: Read `settings.conf` under HOME/XDG without logging.
///
/// Output:
/// - `Ok(Settings)`, which is `Settings::default()` when no settings file exists.
/// - `Err` when a settings file exists but cannot be read.
///
/// Details:
/// - For callers that set up logging from the result and report the error afterwards.
pub fn read_settings() -> Result<Settings, SettingsReadError> {
    let Some(path) = resolve_settings_config_path() else {
        return Ok(Settings::default());
    };
    match fs::read_to_string(&path) {
        Ok(content) => Ok(parse_settings(&content)),
        Err(source) => Err(SettingsReadError { path, source }),
    }
}

/// What: Load user settings from `settings.conf` under HOME/XDG.
///
/// Output:
/// - A `Settings` value; `Settings::default()` when the file is missing or unreadable.
pub fn settings() -> Settings {
    read_settings().unwrap_or_else(|e| {
        tracing::warn!(path = %e.path.display(), error = %e.source, "failed to read settings");
        Settings::default()
    })
}

/// What: Parse `key = value` lines on top of the defaults.
///
/// Inputs:
/// - `content`: Full text of a settings file.
///
/// Output:
/// - Parsed `Settings`.
///
/// Details:
/// - Keys are case-insensitive; `.`, `-` and spaces normalize to `_`.
/// - Blank lines, `#` and `//` comments, lines without `=`, unknown keys, and unparsable values
///   are ignored, leaving the default for that field.
/// - Numeric values are clamped to usable ranges (`group_size >= 1`, `grid_columns >= 1`,
///   `row_height > 0`, `http_timeout_secs >= 1`).
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, val_raw)) = trimmed.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(val_raw.trim());
        match key.as_str() {
            "api_base_url" | "api_url" => {
                let v = val.trim_end_matches('/');
                if !v.is_empty() {
                    out.api_base_url = v.to_string();
                }
            }
            "group_size" | "load_group_size" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.group_size = v.max(1);
                }
            }
            "chunk_delay_ms" | "load_delay_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.chunk_delay_ms = v;
                }
            }
            "scrub_hide_ms" | "scrubber_hide_ms" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.scrub_hide_ms = v;
                }
            }
            "scrub_alphabet" | "scrubber_alphabet" => {
                if let Some(a) = Alphabet::from_config_key(val) {
                    out.scrub_alphabet = a;
                }
            }
            "grid_columns" | "columns" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.grid_columns = v.max(1);
                }
            }
            "row_height" => {
                if let Ok(v) = val.parse::<f32>()
                    && v.is_finite()
                    && v > 0.0
                {
                    out.row_height = v;
                }
            }
            "image_cache_dir" | "thumbnail_cache_dir" => {
                if !val.is_empty() {
                    out.image_cache_dir = Some(PathBuf::from(val));
                }
            }
            "log_level" => {
                if !val.is_empty() {
                    out.log_level = val.to_ascii_lowercase();
                }
            }
            "http_timeout_secs" | "http_timeout" => {
                if let Ok(v) = val.parse::<u64>() {
                    out.http_timeout_secs = v.max(1);
                }
            }
            _ => {}
        }
    }
    out
}

/// Cut a trailing ` # comment` or ` // comment` from a value.
fn strip_inline_comment(val: &str) -> &str {
    let mut end = val.len();
    for marker in [" #", " //", "\t#", "\t//"] {
        if let Some(i) = val.find(marker) {
            end = end.min(i);
        }
    }
    val[..end].trim()
}
