use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single key with modifiers, as written in the config file (`ctrl+c`, `G`, `Enter`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        match (self.code, event.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => {
                // Terminals disagree on whether 'G' arrives with SHIFT, so shift is
                // folded into the character case and ignored as a modifier.
                a == b
                    && (self.modifiers & !KeyModifiers::SHIFT)
                        == (event.modifiers & !KeyModifiers::SHIFT)
            }
            _ => self.code == event.code && self.modifiers == event.modifiers,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("alt".to_string());
        }

        let key_str = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => "?".to_string(),
        };

        parts.push(key_str);
        parts.join("+")
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "+" on its own is a key, not a separator.
        let (modifier_parts, key_part) = match s.rsplit_once('+') {
            Some((mods, key)) if !key.is_empty() => (Some(mods), key),
            _ => (None, s),
        };

        let mut modifiers = KeyModifiers::NONE;
        if let Some(mods) = modifier_parts {
            for part in mods.split('+') {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return Err(format!("Unknown modifier: {part}")),
                }
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" | "↑" => KeyCode::Up,
            "down" | "↓" => KeyCode::Down,
            "left" | "←" => KeyCode::Left,
            "right" | "→" => KeyCode::Right,
            "space" => KeyCode::Char(' '),
            lower if lower.starts_with('f') && lower.len() > 1 => {
                let num: u8 = lower[1..]
                    .parse()
                    .map_err(|_| format!("Invalid function key: {key_part}"))?;
                KeyCode::F(num)
            }
            _ => {
                let mut chars = key_part.chars();
                match (chars.next(), chars.next()) {
                    // Keep the original case: 'G' and 'g' are different bindings.
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(format!("Unknown key: {key_part}")),
                }
            }
        };

        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One or more keys bound to the same action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(Key),
    Multiple(Vec<Key>),
}

impl KeyBinding {
    pub const fn multiple(keys: Vec<Key>) -> Self {
        Self::Multiple(keys)
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        match self {
            Self::Single(key) => key.matches(event),
            Self::Multiple(keys) => keys.iter().any(|k| k.matches(event)),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Single(key) => key.display(),
            Self::Multiple(keys) => keys.iter().map(Key::display).collect::<Vec<_>>().join("/"),
        }
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::Single(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!(Key::from_str("q").unwrap(), Key::new(KeyCode::Char('q')));
        assert_eq!(Key::from_str("Enter").unwrap(), Key::new(KeyCode::Enter));
        assert_eq!(Key::from_str("esc").unwrap(), Key::new(KeyCode::Esc));
        assert_eq!(
            Key::from_str("ctrl+z").unwrap(),
            Key::with_ctrl(KeyCode::Char('z'))
        );
        assert_eq!(Key::from_str("F1").unwrap(), Key::new(KeyCode::F(1)));
        assert_eq!(Key::from_str("+").unwrap(), Key::new(KeyCode::Char('+')));
        assert_eq!(Key::from_str("G").unwrap(), Key::new(KeyCode::Char('G')));
    }

    #[test]
    fn test_key_parsing_rejects_garbage() {
        assert!(Key::from_str("hyper+x").is_err());
        assert!(Key::from_str("nope").is_err());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::new(KeyCode::Char('o')).display(), "o");
        assert_eq!(Key::new(KeyCode::Enter).display(), "Enter");
        assert_eq!(Key::with_ctrl(KeyCode::Char('z')).display(), "ctrl+z");
    }

    #[test]
    fn test_uppercase_key_ignores_shift() {
        let key = Key::new(KeyCode::Char('G'));
        assert!(key.matches(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)));
        assert!(key.matches(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE)));
        assert!(!key.matches(&KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_binding_list_parses_from_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            order: KeyBinding,
        }

        let parsed: Wrapper = toml::from_str(r#"order = ["Enter", "o"]"#).unwrap();
        assert!(parsed.order.matches(&KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE)));
        assert_eq!(parsed.order.display(), "Enter/o");
    }
}
