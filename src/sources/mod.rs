//! Remote catalog retrieval split into submodules.
//!
//! HTTP requests go through the system `curl` binary on a blocking worker
//! thread and JSON bodies are parsed with `serde_json`. The [`CatalogSource`]
//! and [`ImageCache`] traits are the seams the loader and resolvers are
//! written against, so tests can substitute in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;

use crate::state::CatalogItem;

mod details;
mod images;
mod lists;
mod search;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Public TheCocktailDB endpoint using the shared test key.
pub const DEFAULT_API_BASE: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// What: Read-only catalog API consumed by the loader and the detail resolver.
///
/// Output:
/// - Each call returns either decoded records or an error; callers decide how to degrade.
///
/// Details:
/// - Implementations must be cheap to share across tasks (`Send + Sync`).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Items whose name starts with `letter` (the API's `f=` search).
    async fn search_by_letter(&self, letter: &str) -> Result<Vec<CatalogItem>>;
    /// Full record for one id; `Ok(None)` when the id is unknown.
    async fn lookup_by_id(&self, id: &str) -> Result<Option<CatalogItem>>;
    /// Every category name known to the service.
    async fn list_categories(&self) -> Result<Vec<String>>;
    /// Every ingredient name known to the service.
    async fn list_ingredients(&self) -> Result<Vec<String>>;
}

/// Best-effort image cache warmed before items become visible.
#[async_trait]
pub trait ImageCache: Send + Sync {
    /// Make `locator` cache-resident. Errors are advisory only.
    async fn prefetch(&self, locator: &str) -> Result<()>;
}

/// What: `CatalogSource` backed by TheCocktailDB JSON API over `curl`.
///
/// Inputs:
/// - `base_url`: API root without trailing slash, e.g. [`DEFAULT_API_BASE`].
/// - `timeout_secs`: Per-request `curl --max-time` budget.
///
/// Details:
/// - `null` payloads (the API's way of saying "no results") decode to empty lists.
#[derive(Clone, Debug)]
pub struct CocktailDb {
    base_url: String,
    timeout_secs: u64,
}

impl CocktailDb {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: timeout_secs.max(1),
        }
    }

    /// Build from user settings.
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self::new(settings.api_base_url.clone(), settings.http_timeout_secs)
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}/{path_and_query}", self.base_url)
    }

    /// Run `curl_json` for `url` on the blocking pool.
    async fn get_json(&self, url: String) -> Result<Value> {
        let timeout = self.timeout_secs;
        tracing::debug!(%url, "catalog request");
        tokio::task::spawn_blocking(move || curl_json(&url, timeout)).await?
    }
}

impl Default for CocktailDb {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, 15)
    }
}

#[async_trait]
impl CatalogSource for CocktailDb {
    async fn search_by_letter(&self, letter: &str) -> Result<Vec<CatalogItem>> {
        let url = self.url(&format!(
            "search.php?f={}",
            crate::util::percent_encode(letter.trim())
        ));
        let v = self.get_json(url).await?;
        Ok(search::parse_drinks(&v))
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<CatalogItem>> {
        let url = self.url(&format!(
            "lookup.php?i={}",
            crate::util::percent_encode(id.trim())
        ));
        let v = self.get_json(url).await?;
        Ok(search::parse_drinks(&v).into_iter().next())
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let v = self.get_json(self.url("list.php?c=list")).await?;
        Ok(lists::parse_names(&v, "strCategory"))
    }

    async fn list_ingredients(&self) -> Result<Vec<String>> {
        let v = self.get_json(self.url("list.php?i=list")).await?;
        Ok(lists::parse_names(&v, "strIngredient1"))
    }
}

/// What: Build the `curl` argument list shared by JSON and file downloads.
///
/// Inputs:
/// - `url`: Target URL.
/// - `timeout_secs`: Overall `--max-time` budget.
/// - `extra`: Additional arguments inserted before the URL (e.g. `-o path`).
///
/// Output:
/// - Owned argument vector for `std::process::Command::args`.
///
/// Details:
/// - `-f` turns HTTP errors into a non-zero exit so they surface as `Err`.
/// - On Windows, adds `-k` because the bundled curl often lacks a CA store.
pub(crate) fn curl_args(url: &str, timeout_secs: u64, extra: &[&str]) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-sSLf".into(),
        "--connect-timeout".into(),
        "10".into(),
        "--max-time".into(),
        timeout_secs.to_string(),
    ];
    if cfg!(target_os = "windows") {
        args.push("-k".into());
    }
    args.extend(extra.iter().map(|s| (*s).to_string()));
    args.push(url.to_string());
    args
}

/// What: Fetch JSON from a URL using curl and parse into `serde_json::Value`
///
/// Input: `url` HTTP(S) to request; `timeout_secs` request budget
/// Output: `Ok(Value)` on success; `Err` if curl fails or the response is not valid JSON
///
/// Details: An empty body (the API answers unknown ids that way) decodes to `Value::Null`.
fn curl_json(url: &str, timeout_secs: u64) -> Result<Value> {
    let args = curl_args(url, timeout_secs, &[]);
    let out = std::process::Command::new("curl").args(&args).output()?;
    if !out.status.success() {
        return Err(format!("curl failed: {:?}", out.status).into());
    }
    let body = String::from_utf8(out.stdout)?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let v: Value = serde_json::from_str(&body)?;
    Ok(v)
}

pub use details::{MAX_INGREDIENT_SLOTS, ingredients_from_slots};
pub use images::CurlImageCache;
pub use lists::{fetch_categories, fetch_ingredients};
pub use search::{drink_from_json, parse_drinks};
