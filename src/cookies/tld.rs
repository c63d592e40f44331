//! Host truncation for cookie scoping.
//!
//! Cookies are stored against a registrable-looking suffix of the host
//! rather than the full name, so `www.example.com` and `shop.example.com`
//! share `example.com`. This is a heuristic, not a public suffix lookup:
//! multi-part suffixes like `co.uk` fall through to the three-label rule.

/// Generic top-level domains recognised by the two-label rule.
pub const TOP_LEVEL_DOMAINS: &[&str] = &[
    "com", "edu", "net", "org", "gov", "mil", "int", "biz", "info", "name", "pro", "aero", "coop",
    "museum",
];

fn is_label_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '-'
}

fn is_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(is_label_char)
}

/// Trailing run of `[a-z-]` characters in `label`.
fn label_tail(label: &str) -> &str {
    let start = label
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_label_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(label.len());
    &label[start..]
}

/// Reduce `host` to the suffix cookies are keyed on.
///
/// Returns `<label>.<tld>` for a known TLD, otherwise the last three
/// alphabetic labels, otherwise `None` (IP addresses, `localhost`, short
/// country-code hosts).
pub fn truncate_host(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    let n = labels.len();

    if n >= 2 && TOP_LEVEL_DOMAINS.contains(&labels[n - 1]) {
        let tail = label_tail(labels[n - 2]);
        if !tail.is_empty() {
            return Some(format!("{}.{}", tail, labels[n - 1]));
        }
    }

    if n >= 3 && is_label(labels[n - 1]) && is_label(labels[n - 2]) {
        let tail = label_tail(labels[n - 3]);
        if !tail.is_empty() {
            return Some(format!("{}.{}.{}", tail, labels[n - 2], labels[n - 1]));
        }
    }

    None
}
