use serde_json::Value;

use crate::state::CatalogItem;
use crate::util::{s, ss};

/// What: Decode the `drinks` array of a search or lookup response.
///
/// Input:
/// - `v`: Parsed response body.
///
/// Output:
/// - Items in response order; records without an id or a name are skipped.
///
/// Details:
/// - The API uses `{"drinks": null}` (and sometimes `"no data found"`) for misses, both of
///   which decode to an empty list.
pub fn parse_drinks(v: &Value) -> Vec<CatalogItem> {
    let Some(arr) = v.get("drinks").and_then(Value::as_array) else {
        return Vec::new();
    };
    arr.iter().filter_map(drink_from_json).collect()
}

/// What: Convert one drink record into a [`CatalogItem`].
///
/// Input:
/// - `d`: Single element of the `drinks` array.
///
/// Output:
/// - `Some(item)` when both `idDrink` and `strDrink` are present; `None` otherwise.
///
/// Details:
/// - The thumbnail uses the service's `/preview` rendition of `strDrinkThumb`; the
///   full-size image is the plain `strDrinkThumb`.
pub fn drink_from_json(d: &Value) -> Option<CatalogItem> {
    let id = ss(d, &["idDrink", "id"])?;
    let name = ss(d, &["strDrink", "name"])?;
    let image = s(d, "strDrinkThumb");
    let thumbnail = if image.is_empty() {
        String::new()
    } else {
        format!("{image}/preview")
    };
    Some(CatalogItem {
        id,
        name,
        thumbnail,
        category: s(d, "strCategory"),
        ingredients: super::ingredients_from_slots(d),
        instructions: s(d, "strInstructions"),
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Ensure null payloads and incomplete records are dropped.
    ///
    /// Inputs:
    /// - `{"drinks": null}`, a non-array payload, and an array mixing valid and id-less records.
    ///
    /// Output:
    /// - Only complete records survive, in response order.
    fn parse_drinks_skips_misses_and_incomplete_records() {
        assert!(parse_drinks(&serde_json::json!({"drinks": null})).is_empty());
        assert!(parse_drinks(&serde_json::json!({"drinks": "no data found"})).is_empty());
        let v = serde_json::json!({"drinks": [
            {"idDrink": "2", "strDrink": "Banana Fizz", "strDrinkThumb": "https://img/2.jpg"},
            {"strDrink": "No Id"},
            {"idDrink": "3", "strDrink": "  "},
            {"idDrink": "1", "strDrink": "Apple Daisy"}
        ]});
        let items = parse_drinks(&v);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(items[0].thumbnail, "https://img/2.jpg/preview");
        assert_eq!(items[0].image, "https://img/2.jpg");
        assert!(items[1].thumbnail.is_empty());
    }
}
