//! Small string helpers used for listing pages and URLs.

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));
static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));
static EDGE_HYPHENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-+|-+$").expect("valid regex"));

/// Truncates `text` to at most `max_chars` characters, appending `"..."`
/// when anything was cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Builds a URL slug: lowercase ASCII word characters separated by single
/// hyphens.
///
/// Characters other than ASCII letters, digits, underscores, whitespace and
/// hyphens are dropped; runs of whitespace, underscores and hyphens collapse
/// into one hyphen; leading and trailing hyphens are trimmed.
#[must_use]
pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS_RE.replace_all(lowered.trim(), "");
    let hyphenated = SEPARATOR_RUN_RE.replace_all(&stripped, "-");
    EDGE_HYPHENS_RE.replace_all(&hyphenated, "").into_owned()
}

/// Capitalizes the first letter of every space-separated word and lowercases
/// the rest, e.g. `"home KITCHEN"` becomes `"Home Kitchen"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
