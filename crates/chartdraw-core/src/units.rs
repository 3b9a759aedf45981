//! Price increment utilities.
//!
//! Rounding to the instrument's minimum price increment (tick size) and
//! display formatting for price labels.

use crate::constants::DEFAULT_PRICE_INCREMENT;

/// Round a price to the nearest multiple of the given increment.
///
/// An increment of exactly zero falls back to
/// [`DEFAULT_PRICE_INCREMENT`]; a zero increment would divide by zero in
/// the inverse-fraction formula.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    let increment = if increment == 0.0 {
        DEFAULT_PRICE_INCREMENT
    } else {
        increment
    };
    let inverse = 1.0 / increment;
    (value * inverse).round() / inverse
}

/// Format a price for display: thousands grouping, at most two fraction
/// digits, trailing zeros trimmed.
pub fn format_price(price: f64) -> String {
    let rounded = (price * 100.0).round() / 100.0;
    let negative = rounded < 0.0;

    let mut s = format!("{:.2}", rounded.abs());
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (s, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(&f);
    }
    out
}
