use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::RawValue;

/// Parses a monetary amount out of a loosely-formatted value.
///
/// Numeric values are taken as-is. Strings are reduced to digits, `.`, `,`
/// and `-`; a `.` is treated as a thousands separator only when followed by
/// exactly three digits and a non-digit (or end of string), the first `,`
/// becomes the decimal point, and a trailing `-` moves to the front.
///
/// Returns `None` when no amount can be recovered. Callers must treat that
/// as "row unusable", not as a fatal condition.
pub fn parse_amount(value: &RawValue) -> Option<Decimal> {
    match value {
        RawValue::Number(n) => Decimal::from_f64(*n),
        RawValue::Text(s) => parse_amount_str(s),
        RawValue::Date(_) | RawValue::Empty => None,
    }
}

fn parse_amount_str(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: Vec<char> = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let mut without_thousands = String::with_capacity(cleaned.len());
    for (i, c) in cleaned.iter().enumerate() {
        if *c == '.' && is_thousands_separator(&cleaned, i) {
            continue;
        }
        without_thousands.push(*c);
    }

    // Only the first comma becomes the decimal point; a second comma is
    // malformed input and fails the final parse.
    let mut normalized = without_thousands.replacen(',', ".", 1);

    if normalized.ends_with('-') {
        normalized.pop();
        normalized.insert(0, '-');
    }

    if normalized.is_empty() || normalized == "-" {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// A dot at `idx` separates thousands when followed by exactly three digits
/// and then a non-digit or the end of input.
fn is_thousands_separator(chars: &[char], idx: usize) -> bool {
    let run = chars[idx + 1..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    run == 3
}
