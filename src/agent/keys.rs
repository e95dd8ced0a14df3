//! Key-combination normalization for `key_combination` and text clearing

/// Title-case each `+`-separated token; a bare `enter` becomes `Enter`
///
/// Returns `None` for an empty or whitespace-only combination.
pub fn normalize_key_combination(keys: &str) -> Option<String> {
    let keys = keys.trim();
    if keys.is_empty() {
        return None;
    }
    if keys.eq_ignore_ascii_case("enter") {
        return Some("Enter".to_string());
    }

    let normalized = keys
        .split('+')
        .map(|token| title_case(token.trim()))
        .collect::<Vec<_>>()
        .join("+");
    Some(normalized)
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Platform select-all chord used before retyping a field
pub fn select_all_shortcut() -> &'static str {
    if cfg!(target_os = "macos") {
        "Meta+A"
    } else {
        "Control+A"
    }
}
