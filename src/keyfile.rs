//! `prefix[key]="value"` line files, shared by theme and shape files.
//!
//! One entry per line; blank lines and `#` comments are skipped, values may be
//! wrapped in single or double quotes. Lines with another prefix are ignored so
//! a theme and a shape set can live in the same file.

/// Parse every `prefix[key]=value` line of `s`, in file order.
pub fn parse_entries(prefix: &str, s: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('['))
        else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let value = unquote(value.trim());
        if !key.is_empty() && !value.is_empty() {
            entries.push((key.to_string(), value.to_string()));
        }
    }
    entries
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"').trim_matches('\'').trim()
}
