//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Groups digits the en-IN way: last three, then pairs (`12,34,567`).
///
/// Usage in templates: `{{ totals.total|format_amount }}`
#[askama::filter_fn]
pub fn format_amount(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(group_digits(&value.to_string()))
}

/// Escapes a value for a single-quoted JS string literal. HTML escaping is
/// still applied by the template afterwards.
///
/// Usage in templates: `onclick="removeFromCart('{{ row.id|js_string }}')"`
#[askama::filter_fn]
pub fn js_string(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(escape_js(&value.to_string()))
}

pub fn group_digits(digits: &str) -> String {
    if digits.len() <= 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
