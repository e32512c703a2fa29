//! Key name to X11 KeySym table for the XTest backend.
//!
//! KeySym values come from `X11/keysymdef.h`.  Letters use the lowercase
//! KeySym; XTest applies Shift itself when a shift key is part of the chord.

use super::KeyName;

/// Translates a [`KeyName`] to an X11 KeySym.
pub fn key_to_keysym(key: KeyName) -> u32 {
    match key {
        KeyName::Ctrl => 0xFFE3,  // XK_Control_L
        KeyName::Alt => 0xFFE9,   // XK_Alt_L
        KeyName::Shift => 0xFFE1, // XK_Shift_L
        KeyName::Meta => 0xFFEB,  // XK_Super_L
        KeyName::Tab => 0xFF09,
        KeyName::Enter => 0xFF0D, // XK_Return
        KeyName::Escape => 0xFF1B,
        KeyName::Space => 0x0020,
        KeyName::Backspace => 0xFF08,
        KeyName::Delete => 0xFFFF,
        KeyName::Insert => 0xFF63,
        KeyName::Home => 0xFF50,
        KeyName::End => 0xFF57,
        KeyName::PageUp => 0xFF55,   // XK_Prior
        KeyName::PageDown => 0xFF56, // XK_Next
        KeyName::Left => 0xFF51,
        KeyName::Up => 0xFF52,
        KeyName::Right => 0xFF53,
        KeyName::Down => 0xFF54,
        KeyName::CapsLock => 0xFFE5,
        KeyName::PrintScreen => 0xFF61, // XK_Print
        KeyName::F(n) => 0xFFBD + u32::from(n), // XK_F1 = 0xFFBE
        KeyName::Letter(c) => c as u32,
        KeyName::Digit(d) => 0x30 + u32::from(d),
    }
}
