//! Key combination parsing for CDP `Input.dispatchKeyEvent`

use super::{BrowserError, BrowserResult};

// CDP modifier bitmask
pub(super) const ALT: i64 = 1;
pub(super) const CONTROL: i64 = 2;
pub(super) const META: i64 = 4;
pub(super) const SHIFT: i64 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct KeyDefinition {
    pub key: String,
    pub code: String,
    pub key_code: i64,
    pub text: Option<String>,
}

impl KeyDefinition {
    fn new(key: &str, code: &str, key_code: i64, text: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            key_code,
            text: text.map(str::to_string),
        }
    }
}

/// Modifiers held down around a single key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct KeyChord {
    pub modifiers: i64,
    pub held: Vec<KeyDefinition>,
    pub key: KeyDefinition,
}

/// Parse `Control+Shift+T`, `Enter`, `Meta+A`, `Control++` ...
pub(super) fn parse_chord(combination: &str) -> BrowserResult<KeyChord> {
    let combination = combination.trim();
    let (modifier_part, key_token) = if let Some(rest) = combination.strip_suffix("++") {
        (rest, "+")
    } else if combination == "+" {
        ("", "+")
    } else {
        combination.rsplit_once('+').unwrap_or(("", combination))
    };

    if key_token.is_empty() {
        return Err(BrowserError::UnknownKey(combination.to_string()));
    }

    let mut modifiers = 0;
    let mut held = Vec::new();
    for token in modifier_part.split('+').filter(|t| !t.is_empty()) {
        let (bit, definition) =
            modifier(token).ok_or_else(|| BrowserError::UnknownKey(token.to_string()))?;
        modifiers |= bit;
        held.push(definition);
    }

    let key = match modifier(key_token) {
        Some((_, definition)) => definition,
        None => key_definition(key_token, modifiers)
            .ok_or_else(|| BrowserError::UnknownKey(key_token.to_string()))?,
    };

    Ok(KeyChord {
        modifiers,
        held,
        key,
    })
}

/// Definition for a single typed character
pub(super) fn char_definition(c: char) -> KeyDefinition {
    match c {
        '\n' | '\r' => KeyDefinition::new("Enter", "Enter", 13, Some("\r")),
        _ => {
            let mut buf = [0u8; 4];
            key_definition(c.encode_utf8(&mut buf), 0).unwrap_or_else(|| KeyDefinition {
                key: c.to_string(),
                code: String::new(),
                key_code: 0,
                text: Some(c.to_string()),
            })
        }
    }
}

fn modifier(token: &str) -> Option<(i64, KeyDefinition)> {
    let parsed = match token.to_ascii_lowercase().as_str() {
        "control" | "ctrl" => (CONTROL, KeyDefinition::new("Control", "ControlLeft", 17, None)),
        "shift" => (SHIFT, KeyDefinition::new("Shift", "ShiftLeft", 16, None)),
        "alt" | "option" => (ALT, KeyDefinition::new("Alt", "AltLeft", 18, None)),
        "meta" | "command" | "cmd" | "super" | "win" | "windows" => {
            (META, KeyDefinition::new("Meta", "MetaLeft", 91, None))
        }
        _ => return None,
    };
    Some(parsed)
}

fn key_definition(token: &str, modifiers: i64) -> Option<KeyDefinition> {
    let named = match token.to_ascii_lowercase().as_str() {
        "enter" | "return" => Some(KeyDefinition::new("Enter", "Enter", 13, Some("\r"))),
        "tab" => Some(KeyDefinition::new("Tab", "Tab", 9, None)),
        "backspace" => Some(KeyDefinition::new("Backspace", "Backspace", 8, None)),
        "escape" | "esc" => Some(KeyDefinition::new("Escape", "Escape", 27, None)),
        "delete" | "del" => Some(KeyDefinition::new("Delete", "Delete", 46, None)),
        "space" | " " => Some(KeyDefinition::new(" ", "Space", 32, Some(" "))),
        "arrowup" | "up" => Some(KeyDefinition::new("ArrowUp", "ArrowUp", 38, None)),
        "arrowdown" | "down" => Some(KeyDefinition::new("ArrowDown", "ArrowDown", 40, None)),
        "arrowleft" | "left" => Some(KeyDefinition::new("ArrowLeft", "ArrowLeft", 37, None)),
        "arrowright" | "right" => Some(KeyDefinition::new("ArrowRight", "ArrowRight", 39, None)),
        "home" => Some(KeyDefinition::new("Home", "Home", 36, None)),
        "end" => Some(KeyDefinition::new("End", "End", 35, None)),
        "pageup" => Some(KeyDefinition::new("PageUp", "PageUp", 33, None)),
        "pagedown" => Some(KeyDefinition::new("PageDown", "PageDown", 34, None)),
        "insert" => Some(KeyDefinition::new("Insert", "Insert", 45, None)),
        lower => function_key(lower),
    };
    if named.is_some() {
        return named;
    }

    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    // Chords with Control/Meta/Alt must not insert text
    let inserts_text = modifiers & (CONTROL | META | ALT) == 0;
    let definition = if c.is_ascii_alphabetic() {
        let upper = c.to_ascii_uppercase();
        let key = if modifiers & SHIFT != 0 {
            upper
        } else if modifiers == 0 {
            c
        } else {
            c.to_ascii_lowercase()
        };
        KeyDefinition {
            key: key.to_string(),
            code: format!("Key{upper}"),
            key_code: upper as i64,
            text: inserts_text.then(|| key.to_string()),
        }
    } else if c.is_ascii_digit() {
        KeyDefinition {
            key: c.to_string(),
            code: format!("Digit{c}"),
            key_code: c as i64,
            text: inserts_text.then(|| c.to_string()),
        }
    } else {
        KeyDefinition {
            key: c.to_string(),
            code: String::new(),
            key_code: 0,
            text: inserts_text.then(|| c.to_string()),
        }
    };
    Some(definition)
}

fn function_key(lower: &str) -> Option<KeyDefinition> {
    let n: i64 = lower.strip_prefix('f')?.parse().ok()?;
    if !(1..=12).contains(&n) {
        return None;
    }
    let name = format!("F{n}");
    Some(KeyDefinition {
        key: name.clone(),
        code: name,
        key_code: 111 + n,
        text: None,
    })
}
