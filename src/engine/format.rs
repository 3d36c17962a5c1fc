//! # engine::format
//!
//! Display formatting for OI figures: `$X.XB`, `$X.XM`, or grouped
//! `$X,XXX.XX` below a million.

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

pub fn format_number(value: f64) -> String {
    if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else {
        format!("${}", group_thousands(value))
    }
}

/// `1234.5` → `"1,234.50"`; negatives keep their sign in front of the digits.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
