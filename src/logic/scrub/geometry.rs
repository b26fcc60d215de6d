//! Pure mapping between rail coordinates, letter buckets, and list positions.

use crate::state::CatalogItem;

/// Bucket for names that do not start with a letter of the rail's alphabet.
pub const OTHER_BUCKET: char = '#';

const FULL: [char; 27] = [
    '#', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q',
    'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
const COMPACT: [char; 8] = ['#', 'A', 'B', 'C', 'D', 'E', 'F', 'G'];

/// Letter set shown on the side rail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alphabet {
    /// `#` followed by `A`..`Z`.
    #[default]
    Full,
    /// `#` followed by `A`..`G`.
    Compact,
}

impl Alphabet {
    /// Ordered bucket labels, `#` first.
    pub fn buckets(self) -> &'static [char] {
        match self {
            Alphabet::Full => &FULL,
            Alphabet::Compact => &COMPACT,
        }
    }

    /// Parse a settings value (`full`, `compact`, `a-g`, ...).
    pub fn from_config_key(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "full" | "a-z" | "az" | "all" => Some(Alphabet::Full),
            "compact" | "short" | "a-g" | "ag" => Some(Alphabet::Compact),
            _ => None,
        }
    }

    /// Normalize a user-supplied label to a bucket of this alphabet.
    pub fn normalize(self, letter: char) -> Option<char> {
        let up = letter.to_ascii_uppercase();
        self.buckets().contains(&up).then_some(up)
    }
}

/// What: Map a coordinate along the rail to a bucket index.
///
/// Inputs:
/// - `y`: Pointer position measured from the top of the rail.
/// - `rail_height`: Height of the rail in the same unit.
/// - `bucket_count`: Number of buckets on the rail.
///
/// Output:
/// - `clamp(floor(y / (rail_height / bucket_count)), 0, bucket_count - 1)`.
///
/// Details:
/// - Positions above or below the rail clamp to the first or last bucket.
/// - A non-positive or non-finite height, a NaN position, or zero buckets yield `0`.
pub fn bucket_index(y: f32, rail_height: f32, bucket_count: usize) -> usize {
    if bucket_count == 0 || !rail_height.is_finite() || rail_height <= 0.0 || y.is_nan() {
        return 0;
    }
    let slot = rail_height / bucket_count as f32;
    let raw = (y / slot).floor();
    if raw <= 0.0 {
        return 0;
    }
    let last = bucket_count - 1;
    if raw >= last as f32 {
        return last;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = raw as usize;
    idx.min(last)
}

/// Bucket label under `y` on a rail of `rail_height`.
pub fn letter_at(alphabet: Alphabet, y: f32, rail_height: f32) -> char {
    let buckets = alphabet.buckets();
    buckets[bucket_index(y, rail_height, buckets.len())]
}

/// What: Bucket a display name falls into.
///
/// Inputs:
/// - `name`: Display name.
/// - `alphabet`: Rail alphabet.
///
/// Output:
/// - `Some(letter)` when the first character folds to a rail letter, `Some('#')` when it does
///   not fold to a Latin letter, and `None` for a Latin letter the rail does not show.
///
/// Details:
/// - Leading whitespace is ignored; accents are folded (`Éclair` → `E`).
/// - On the compact rail, `Mojito` has no bucket and is never a jump target, not even for `#`.
pub fn bucket_of(name: &str, alphabet: Alphabet) -> Option<char> {
    match name.trim_start().chars().next().map(crate::util::fold_char) {
        Some(c) if c.is_ascii_alphabetic() => alphabet.normalize(c),
        _ => Some(OTHER_BUCKET),
    }
}

/// What: Position of the first item of `view` in the bucket `letter`.
///
/// Inputs:
/// - `view`: Currently visible (filtered) list.
/// - `letter`: Bucket label; case-insensitive.
/// - `alphabet`: Rail alphabet used to bucket names.
///
/// Output:
/// - `Some(index)` of the first match; `None` when no item is in that bucket.
pub fn index_for_letter(view: &[CatalogItem], letter: char, alphabet: Alphabet) -> Option<usize> {
    let wanted = if letter == OTHER_BUCKET {
        OTHER_BUCKET
    } else {
        alphabet.normalize(letter)?
    };
    view.iter()
        .position(|it| bucket_of(&it.name, alphabet) == Some(wanted))
}
