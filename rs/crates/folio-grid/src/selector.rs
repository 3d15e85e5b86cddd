/// Selector that matches every arrangeable item.
pub const MATCH_ALL: &str = "*";

/// Turn a free-text category label into a token safe for class selectors.
///
/// Lower-cases, spells out `&`, drops anything outside `[a-z0-9-_]`.
pub fn sanitize(label: &str) -> String {
    label
        .to_lowercase()
        .replace('&', "and")
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Class selector for a label, e.g. `"R&D"` → `".rand"`.
pub fn class_selector(label: &str) -> String {
    format!(".{}", sanitize(label))
}

/// True when an element carrying `classes` matches `selector`.
///
/// Only the two forms the grid emits are understood: `*` and `.token`.
pub fn matches(selector: &str, classes: &str) -> bool {
    if selector == MATCH_ALL {
        return true;
    }
    match selector.strip_prefix('.') {
        Some(token) => classes.split_whitespace().any(|c| c == token),
        None => false,
    }
}
