//! Process-wide helpers for tests that touch environment variables or spawn `curl`.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Serializes tests that rewrite `PATH`.
static PATH_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes tests that rewrite `HOME` or `XDG_CONFIG_HOME`.
static HOME_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// What: Acquire the global PATH mutex.
///
/// Output:
/// - Guard that must be held for as long as `PATH` differs from its original value.
///
/// Details:
/// - Recovers from poisoning so one panicking test does not cascade.
pub fn lock_path_mutex() -> MutexGuard<'static, ()> {
    PATH_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Acquire the global HOME mutex; same contract as [`lock_path_mutex`].
pub fn lock_home_mutex() -> MutexGuard<'static, ()> {
    HOME_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Fresh directory under the system temp dir, unique per process and call.
pub fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cocktail_hub_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(not(target_os = "windows"))]
/// What: Put a fake `curl` script first on `PATH`.
///
/// Inputs:
/// - `tag`: Short label used in the temp directory name.
/// - `script`: Bash body for the fake `curl`.
///
/// Output:
/// - `(root, old_path)`: temp root to delete and the previous `PATH` to restore.
///
/// Details:
/// - Callers must hold [`lock_path_mutex`] until `PATH` is restored.
pub fn install_fake_curl(tag: &str, script: &str) -> (PathBuf, String) {
    use std::os::unix::fs::PermissionsExt;
    let old_path = std::env::var("PATH").unwrap_or_default();
    let root = unique_temp_dir(&format!("fake_curl_{tag}"));
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let curl = bin.join("curl");
    std::fs::write(&curl, script.as_bytes()).unwrap();
    let mut perm = std::fs::metadata(&curl).unwrap().permissions();
    perm.set_mode(0o755);
    std::fs::set_permissions(&curl, perm).unwrap();
    let new_path = format!("{}:{}", bin.to_string_lossy(), old_path);
    unsafe { std::env::set_var("PATH", &new_path) };
    (root, old_path)
}
