//! Formatting utilities used for log rows and report output.

/// Fixed four decimal places with trailing zeros trimmed.
///
/// `5.25` → `"5.25"`, `12.0` → `"12"`, `-0.5` → `"-0.5"`.
pub fn fmt_decimal(v: f64) -> String {
    let s = format!("{v:.4}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };

    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Fixed four decimal places, used by the report tables.
pub fn fmt_percent(v: f64) -> String {
    format!("{v:.4}%")
}

/// Cut `s` to at most `max` characters, on a character boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
