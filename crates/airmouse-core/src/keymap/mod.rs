//! Key name translation tables.
//!
//! Hotkey commands name keys with short lowercase tokens (`ctrl`, `tab`,
//! `f4`, `c`).  [`KeyName::from_token`] resolves a token, including common
//! aliases, to a platform-neutral [`KeyName`]; the sub-modules translate that
//! to the codes each injection backend needs.

pub mod linux_x11;
pub mod windows_vk;

/// A key that can appear in a hotkey combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    Ctrl,
    Alt,
    Shift,
    /// Windows / Command / Super key.
    Meta,
    Tab,
    Enter,
    Escape,
    Space,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    CapsLock,
    PrintScreen,
    /// Function key `F1`..=`F12`.
    F(u8),
    /// Letter `a`..=`z`, stored lowercase.
    Letter(char),
    /// Top-row digit `0`..=`9`.
    Digit(u8),
}

impl KeyName {
    /// Resolves a lowercase hotkey token to a key.
    ///
    /// Returns `None` for names with no mapping.
    pub fn from_token(token: &str) -> Option<Self> {
        let key = match token {
            "ctrl" | "control" => KeyName::Ctrl,
            "alt" | "menu" => KeyName::Alt,
            "shift" => KeyName::Shift,
            "win" | "cmd" | "super" | "meta" => KeyName::Meta,
            "tab" => KeyName::Tab,
            "enter" | "return" => KeyName::Enter,
            "esc" | "escape" => KeyName::Escape,
            "space" => KeyName::Space,
            "backspace" => KeyName::Backspace,
            "del" | "delete" => KeyName::Delete,
            "insert" => KeyName::Insert,
            "home" => KeyName::Home,
            "end" => KeyName::End,
            "pgup" | "pageup" => KeyName::PageUp,
            "pgdn" | "pagedown" => KeyName::PageDown,
            "left" => KeyName::Left,
            "right" => KeyName::Right,
            "up" => KeyName::Up,
            "down" => KeyName::Down,
            "capslock" => KeyName::CapsLock,
            "printscreen" => KeyName::PrintScreen,
            other => return Self::from_single_char(other).or_else(|| Self::from_function(other)),
        };
        Some(key)
    }

    fn from_single_char(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c {
            'a'..='z' => Some(KeyName::Letter(c)),
            '0'..='9' => Some(KeyName::Digit(c as u8 - b'0')),
            _ => None,
        }
    }

    fn from_function(token: &str) -> Option<Self> {
        let n: u8 = token.strip_prefix('f')?.parse().ok()?;
        (1..=12).contains(&n).then_some(KeyName::F(n))
    }
}

/// Unified mapper over the per-platform tables.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a key to a Windows virtual-key code.
    pub fn to_windows_vk(key: KeyName) -> u8 {
        windows_vk::key_to_vk(key)
    }

    /// Translates a key to an X11 KeySym.
    pub fn to_x11_keysym(key: KeyName) -> u32 {
        linux_x11::key_to_keysym(key)
    }
}
