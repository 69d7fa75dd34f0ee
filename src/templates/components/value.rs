// templates/components/value.rs

use maud::{html, Markup};
use serde_json::Value;

/// How a single attribute should be shown in the report.
#[derive(Debug, PartialEq)]
pub enum Cell {
    /// Null, blank, or the `N/A` marker.
    Missing,
    /// The county's `-1` placeholder.
    Unavailable,
    Text(String),
}

/// Classifies and formats an attribute. `no_commas` is for identifier-like
/// numbers (schedule numbers) that should not get thousands separators.
pub fn cell(value: Option<&Value>, no_commas: bool) -> Cell {
    match value {
        None | Some(Value::Null) => Cell::Missing,
        Some(Value::String(s)) if s.trim().is_empty() || s == "N/A" => Cell::Missing,
        Some(Value::String(s)) => Cell::Text(s.clone()),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(-1.0) {
                return Cell::Unavailable;
            }
            match (n.as_i64(), n.as_f64()) {
                (Some(i), _) if no_commas => Cell::Text(i.to_string()),
                (Some(i), _) => Cell::Text(format_int(i)),
                (None, Some(f)) => Cell::Text(format_float(f, no_commas)),
                _ => Cell::Text(n.to_string()),
            }
        }
        Some(other) => Cell::Text(other.to_string()),
    }
}

pub fn value_cell(value: Option<&Value>, no_commas: bool) -> Markup {
    match cell(value, no_commas) {
        Cell::Missing => html! { span class="muted" { "N/A" } },
        Cell::Unavailable => html! { span class="muted" { "Not Available" } },
        Cell::Text(text) => html! { (text) },
    }
}

/// `1234567` -> `1,234,567`
pub fn format_int(i: i64) -> String {
    let digits = group_thousands(&i.unsigned_abs().to_string());
    if i < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Two decimals, with separators at or above 1. With `no_commas`, values of
/// 1 and up are rounded to whole numbers instead.
pub fn format_float(f: f64, no_commas: bool) -> String {
    if f.abs() < 1.0 {
        return format!("{f:.2}");
    }
    if no_commas {
        return format!("{f:.0}");
    }
    format_float_grouped(f, 2)
}

/// Fixed decimals with thousands separators on the integer part.
pub fn format_float_grouped(f: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, f.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let sign = if f < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(whole))
    } else {
        format!("{sign}{}.{frac}", group_thousands(whole))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
