//! Cell comparison
//!
//! Cells are parsed once into a [`CellValue`]. Two numeric cells compare by
//! value, anything else compares as text. The mixed rule is not a total
//! order, so rows are ordered with [`stable_sort_by`], which tolerates that.

use std::cell::RefCell;
use std::cmp::Ordering;

use feruca::Collator;

use super::SortDirection;

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// A cell parsed for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Numeric { value: f64, text: String },
    Text(String),
}

impl CellValue {
    pub fn parse(text: &str) -> Self {
        match parse_float(text) {
            Some(value) => Self::Numeric {
                value,
                text: text.to_string(),
            },
            None => Self::Text(text.to_string()),
        }
    }

    /// The original cell text.
    pub fn text(&self) -> &str {
        match self {
            Self::Numeric { text, .. } | Self::Text(text) => text,
        }
    }
}

/// Parse the longest numeric prefix of `input`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12 kg"`
/// is 12. At least one mantissa digit is required: `""`, `"."` and `"abc"`
/// are not numbers.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut cursor = frac_start;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        frac_digits = cursor - frac_start;
        if frac_digits > 0 {
            end = cursor;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_start = cursor;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        if cursor > exp_start {
            end = cursor;
        }
    }

    s[..end].parse().ok()
}

/// Order two parsed cells ascending.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Numeric { value: x, .. }, CellValue::Numeric { value: y, .. }) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => locale_compare(a.text(), b.text()),
    }
}

/// Order two parsed cells in `direction`.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => compare_values(a, b),
        SortDirection::Descending => compare_values(b, a),
    }
}

/// Locale-aware text collation.
///
/// Uses the Unicode Collation Algorithm with the CLDR root order: letters
/// compare by base letter first, so `apple < Banana < Émile < Zoe`. Accents
/// and then case only break ties, with lowercase before uppercase. Strings
/// the collation calls equal fall back to code point order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.borrow_mut().collate(a, b))
        .then_with(|| a.cmp(b))
}

/// Bottom-up merge sort that keeps equal items in input order.
///
/// Unlike `slice::sort_by` it never panics on an inconsistent comparator;
/// the result is simply some stable interleaving.
pub fn stable_sort_by<T, F>(items: &mut Vec<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = order.clone();
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right, mut out) = (start, mid, start);
            while left < mid && right < end {
                // Right side wins only when strictly smaller
                if compare(&items[order[right]], &items[order[left]]) == Ordering::Less {
                    merged[out] = order[right];
                    right += 1;
                } else {
                    merged[out] = order[left];
                    left += 1;
                }
                out += 1;
            }
            let rest = mid - left;
            merged[out..out + rest].copy_from_slice(&order[left..mid]);
            out += rest;
            merged[out..out + (end - right)].copy_from_slice(&order[right..end]);
            start = end;
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.into_iter().filter_map(|index| slots[index].take()));
}
