use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{ImageCache, Result, curl_args};

/// What: Disk-backed image cache that downloads with `curl`.
///
/// Inputs:
/// - `dir`: Cache directory (created on first write).
/// - `timeout_secs`: Per-download `--max-time` budget.
///
/// Details:
/// - A non-empty file at the derived path counts as cached, so repeated loads do not
///   re-download thumbnails.
/// - Downloads land in a `.part` file first and are renamed into place, so a reader never
///   sees a truncated image.
#[derive(Clone, Debug)]
pub struct CurlImageCache {
    dir: PathBuf,
    timeout_secs: u64,
}

impl CurlImageCache {
    pub fn new(dir: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            timeout_secs: timeout_secs.max(1),
        }
    }

    /// Build from user settings.
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        let dir = settings
            .image_cache_dir
            .clone()
            .unwrap_or_else(crate::config::images_dir);
        Self::new(dir, settings.http_timeout_secs)
    }

    /// Path the image for `locator` is (or would be) stored at.
    pub fn path_for(&self, locator: &str) -> PathBuf {
        self.dir.join(crate::util::cache_file_name(locator))
    }

    /// Whether `locator` is already cache-resident.
    pub fn contains(&self, locator: &str) -> bool {
        is_non_empty_file(&self.path_for(locator))
    }
}

fn is_non_empty_file(p: &Path) -> bool {
    std::fs::metadata(p)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Temporary sibling of `dest` with `.part` appended to the full file name.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// What: Download `url` to `dest` via a temporary `.part` file.
///
/// Output:
/// - `Ok(())` once `dest` holds the complete body; `Err` on curl failure or empty body.
fn download(url: &str, dest: &Path, timeout_secs: u64) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let part = part_path(dest);
    let part_str = part.to_string_lossy().to_string();
    let args = curl_args(url, timeout_secs, &["-o", &part_str]);
    let out = std::process::Command::new("curl").args(&args).output()?;
    if !out.status.success() || !is_non_empty_file(&part) {
        let _ = std::fs::remove_file(&part);
        return Err(format!("image download failed: {:?}", out.status).into());
    }
    std::fs::rename(&part, dest)?;
    Ok(())
}

#[async_trait]
impl ImageCache for CurlImageCache {
    async fn prefetch(&self, locator: &str) -> Result<()> {
        if locator.trim().is_empty() {
            return Err("empty image locator".into());
        }
        let dest = self.path_for(locator);
        if is_non_empty_file(&dest) {
            return Ok(());
        }
        let url = locator.trim().to_string();
        let timeout = self.timeout_secs;
        tokio::task::spawn_blocking(move || download(&url, &dest, timeout)).await?
    }
}

#[cfg(not(target_os = "windows"))]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[allow(clippy::await_holding_lock)]
    /// What: Download once, then serve from disk without invoking curl again.
    ///
    /// Inputs:
    /// - Fake `curl` writing a body to its `-o` target and counting invocations.
    ///
    /// Output:
    /// - First prefetch downloads; second is a cache hit; a failing URL reports `Err`
    ///   and leaves no partial file behind.
    async fn prefetch_downloads_once_and_cleans_up_failures() {
        let _path_guard = crate::test_utils::lock_path_mutex();
        let script = r##"#!/usr/bin/env bash
out=""
prev=""
for a in "$@"; do
  if [[ "$prev" == "-o" ]]; then out="$a"; fi
  prev="$a"
done
url="${@: -1}"
echo x >> "$(dirname "$out")/calls.log"
if [[ "$url" == *fail* ]]; then exit 22; fi
printf 'JPEGDATA' > "$out"
"##;
        let (root, old_path) = crate::test_utils::install_fake_curl("images", script);
        let cache = CurlImageCache::new(root.join("cache"), 5);

        cache.prefetch("https://img/1.jpg/preview").await.unwrap();
        assert!(cache.contains("https://img/1.jpg/preview"));
        cache.prefetch("https://img/1.jpg/preview").await.unwrap();
        let calls = std::fs::read_to_string(root.join("cache").join("calls.log")).unwrap();
        assert_eq!(calls.lines().count(), 1);

        assert!(cache.prefetch("https://img/fail.jpg").await.is_err());
        assert!(!cache.contains("https://img/fail.jpg"));
        assert!(!part_path(&cache.path_for("https://img/fail.jpg")).exists());
        assert!(cache.prefetch("  ").await.is_err());

        unsafe { std::env::set_var("PATH", &old_path) };
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    /// What: Locators differing only in extension get distinct temporary files.
    fn part_paths_keep_the_extension() {
        let cache = CurlImageCache::new("/tmp/cocktail_hub_cache", 5);
        let jpg = part_path(&cache.path_for("https://img/drink.jpg"));
        let png = part_path(&cache.path_for("https://img/drink.png"));
        assert_ne!(jpg, png);
        assert!(jpg.to_string_lossy().ends_with("drink.jpg.part"));
    }
}
