use serde_json::Value;

use crate::state::Ingredient;

/// Number of indexed `strIngredientN`/`strMeasureN` slots a drink record carries.
pub const MAX_INGREDIENT_SLOTS: usize = 15;

/// What: Derive the ordered ingredient list from a drink record's indexed slots.
///
/// Inputs:
/// - `d`: Drink record with `strIngredient1..=15` and `strMeasure1..=15` keys.
///
/// Output:
/// - `(name, measure)` pairs in slot order.
///
/// Details:
/// - Slots whose ingredient is missing, `null`, or blank are skipped.
/// - A missing measure becomes an empty string; measures are trimmed.
pub fn ingredients_from_slots(d: &Value) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|i| {
            let name = crate::util::s(d, &format!("strIngredient{i}"));
            if name.is_empty() {
                return None;
            }
            let measure = crate::util::s(d, &format!("strMeasure{i}"));
            Some(Ingredient { name, measure })
        })
        .collect()
}
