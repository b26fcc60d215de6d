//! Small helpers for URL encoding, JSON extraction, and name ordering.
use std::cmp::Ordering;

use serde_json::Value;

/// Percent-encode a string for use in URLs.
///
/// Encoding rules:
///
/// - Unreserved characters as per RFC 3986 (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`)
///   are left as-is.
/// - Space is encoded as `%20` (not `+`).
/// - All other bytes are encoded as two uppercase hexadecimal digits prefixed by `%`.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

/// Extract a trimmed string value from a JSON object by key, defaulting to empty string.
///
/// Returns `""` if the key is missing, `null`, or not a string.
pub fn s(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

/// Extract the first non-empty string from a list of candidate keys.
///
/// Returns `Some(String)` for the first key that maps to a non-blank JSON string, or `None`
/// if none match.
pub fn ss(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str())
            && !s.trim().is_empty()
        {
            return Some(s.trim().to_owned());
        }
    }
    None
}

/// What: Fold a character to its unaccented lowercase ASCII base when one is known.
///
/// Inputs:
/// - `c`: Any character.
///
/// Output:
/// - Lowercase base letter for common Latin accented letters; otherwise the lowercased input.
///
/// Details:
/// - Covers the Latin-1 Supplement and the ligatures that show up in drink names
///   (`Crème`, `Piña`, `Æbleskiver`). Anything else, `ß` included, falls back to
///   `char::to_lowercase`.
/// - Used for ordering and rail buckets only; search matching does not fold accents.
pub fn fold_char(c: char) -> char {
    match c {
        'À'..='Å' | 'à'..='å' | 'Æ' | 'æ' => 'a',
        'Ç' | 'ç' => 'c',
        'È'..='Ë' | 'è'..='ë' => 'e',
        'Ì'..='Ï' | 'ì'..='ï' => 'i',
        'Ñ' | 'ñ' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Œ' | 'œ' => 'o',
        'Ù'..='Ü' | 'ù'..='ü' => 'u',
        'Ý' | 'ý' | 'ÿ' => 'y',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Trimmed, lowercased form of `text` used for search and ingredient matching.
pub fn match_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// What: Compare two display names the way a user expects them listed.
///
/// Inputs:
/// - `a`, `b`: Display names.
///
/// Output:
/// - `Ordering` based on accent-folded, case-insensitive text, with the raw strings as tiebreak.
///
/// Details:
/// - `"apple"`, `"Apple"` and `"Äpple"` sort next to each other instead of after `"Zombie"`.
/// - The raw comparison tiebreak keeps the order total so sorting is deterministic.
pub fn name_cmp(a: &str, b: &str) -> Ordering {
    let ka = a.trim().chars().map(fold_char);
    let kb = b.trim().chars().map(fold_char);
    ka.cmp(kb).then_with(|| a.cmp(b))
}

/// Case-insensitive substring check; `needle_key` comes from [`match_key`] and an empty
/// needle always matches.
pub fn contains_ignore_case(haystack: &str, needle_key: &str) -> bool {
    needle_key.is_empty() || haystack.to_lowercase().contains(needle_key)
}

/// What: Turn an arbitrary locator (URL) into a safe, stable cache file name.
///
/// Inputs:
/// - `locator`: Image URL or any other opaque reference.
///
/// Output:
/// - File name consisting only of `[A-Za-z0-9._-]`, never empty.
///
/// Details:
/// - Strips the scheme, replaces every other byte with `_`, and caps the length at 180 bytes
///   keeping the tail (which carries the file extension).
pub fn cache_file_name(locator: &str) -> String {
    let trimmed = locator
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let mut out: String = trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.len() > 180 {
        out = out.split_off(out.len() - 180);
    }
    if out.trim_matches(['.', '_']).is_empty() {
        return "image".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Ensure percent encoding leaves unreserved characters and escapes the rest.
    fn percent_encode_escapes_reserved_bytes() {
        assert_eq!(percent_encode("a b&c"), "a%20b%26c");
        assert_eq!(percent_encode("Lime_juice-1.~"), "Lime_juice-1.~");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    /// What: Verify JSON string helpers treat `null` and blanks as missing.
    ///
    /// Inputs:
    /// - Object with a string, a blank string, and a `null`.
    ///
    /// Output:
    /// - `s` trims and defaults to empty; `ss` skips blank and `null` candidates.
    fn json_helpers_skip_null_and_blank() {
        let v = serde_json::json!({"a": "  Mojito ", "b": "  ", "c": null});
        assert_eq!(s(&v, "a"), "Mojito");
        assert_eq!(s(&v, "c"), "");
        assert_eq!(s(&v, "missing"), "");
        assert_eq!(ss(&v, &["c", "b", "a"]).as_deref(), Some("Mojito"));
        assert_eq!(ss(&v, &["b", "c"]), None);
    }

    #[test]
    /// What: Confirm name ordering is case- and accent-insensitive with a deterministic tiebreak.
    fn name_cmp_orders_like_a_locale_collator() {
        let mut names = vec!["zombie", "Éclair", "apple", "Apple", "Banana"];
        names.sort_by(|a, b| name_cmp(a, b));
        assert_eq!(names, vec!["Apple", "apple", "Banana", "Éclair", "zombie"]);
        assert_eq!(name_cmp("Piña Colada", "pina colada"), Ordering::Less);
    }

    #[test]
    /// What: Substring matching ignores case but keeps accents and `ß` as written.
    fn contains_ignore_case_does_not_fold_accents() {
        assert!(contains_ignore_case("Crème de Menthe", &match_key(" CRÈME ")));
        assert!(!contains_ignore_case("Crème de Menthe", &match_key("creme")));
        assert!(!contains_ignore_case("Whiskey Sour", &match_key("ß")));
        assert!(contains_ignore_case("Banana Fizz", ""));
        assert!(!contains_ignore_case("Cherry Sour", "a"));
    }

    #[test]
    /// What: Ensure cache file names are filesystem safe and never empty.
    fn cache_file_name_is_sanitized() {
        assert_eq!(
            cache_file_name("https://www.thecocktaildb.com/images/media/drink/abc.jpg/preview"),
            "www.thecocktaildb.com_images_media_drink_abc.jpg_preview"
        );
        assert_eq!(cache_file_name("https://"), "image");
        let long = format!("https://x/{}.png", "a".repeat(400));
        let name = cache_file_name(&long);
        assert_eq!(name.len(), 180);
        assert!(name.ends_with(".png"));
    }
}
