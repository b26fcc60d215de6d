use std::env;
use std::path::{Path, PathBuf};

/// Directory name used under `$HOME/.config` and `XDG_CONFIG_HOME`.
const APP_DIR: &str = "cocktail-hub";

/// Candidate config roots in priority order: `$HOME/.config/cocktail-hub`, then
/// `$XDG_CONFIG_HOME/cocktail-hub`. Blank variables are skipped.
fn config_roots() -> Vec<PathBuf> {
    let mut roots = Vec::with_capacity(2);
    if let Some(home) = env::var_os("HOME").filter(|h| !h.is_empty()) {
        roots.push(PathBuf::from(home).join(".config").join(APP_DIR));
    }
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|x| !x.is_empty()) {
        roots.push(PathBuf::from(xdg).join(APP_DIR));
    }
    roots
}

/// What: Locate `settings.conf` in the config roots.
///
/// Output:
/// - The first existing file; `None` when no root has one.
pub(crate) fn resolve_settings_config_path() -> Option<PathBuf> {
    config_roots()
        .into_iter()
        .map(|root| root.join("settings.conf"))
        .find(|p| p.is_file())
}

/// What: Resolve the application configuration directory, creating it on disk.
///
/// Output:
/// - First config root that can be created; `./cocktail-hub` when none can.
pub fn config_dir() -> PathBuf {
    for root in config_roots() {
        match std::fs::create_dir_all(&root) {
            Ok(()) => return root,
            Err(e) => tracing::debug!(path = %root.display(), error = %e, "config root unusable"),
        }
    }
    let fallback = Path::new(".").join(APP_DIR);
    let _ = std::fs::create_dir_all(&fallback);
    fallback
}

/// Named subdirectory of [`config_dir`], created if missing.
fn config_subdir(name: &str) -> PathBuf {
    let dir = config_dir().join(name);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// `logs` directory inside the config folder.
pub fn logs_dir() -> PathBuf {
    config_subdir("logs")
}

/// `lists` directory inside the config folder (favorites live here).
pub fn lists_dir() -> PathBuf {
    config_subdir("lists")
}

/// `images` directory inside the config folder, the default thumbnail cache.
pub fn images_dir() -> PathBuf {
    config_subdir("images")
}
