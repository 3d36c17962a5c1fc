//! # engine::parser
//!
//! Turns scraped cell text such as `"$1.5B"`, `"250M"` or `"$1,234.56"` into
//! a USD figure.
//!
//! The parser never fails: absent or empty text yields `0.0`, and text that
//! is not a number is logged and also yields `0.0`.  Only the fetch layer can
//! report "no data"; a `0.0` reading means "the page said nothing usable".

use tracing::{debug, warn};

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// Parse one cell.  `None` is a cell the page did not contain.
pub fn parse_oi_value(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }

    debug!(raw = %text, "Parsing OI cell");

    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();

    let (number, multiplier) = match cleaned.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('b') => (&cleaned[..cleaned.len() - 1], BILLION),
        Some('m') => (&cleaned[..cleaned.len() - 1], MILLION),
        _ => (cleaned, 1.0),
    };

    match number.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value * multiplier,
        Ok(_) | Err(_) => {
            warn!(raw = %text, "Unparseable OI value — treating as 0");
            0.0
        }
    }
}
