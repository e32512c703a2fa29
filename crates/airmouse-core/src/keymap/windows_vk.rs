//! Key name to Windows Virtual-Key code table.
//!
//! Reference: "Virtual-Key Codes", Win32 documentation.  Letters and digits
//! use their uppercase ASCII value; everything else uses the `VK_*` constant.

use super::KeyName;

/// Translates a [`KeyName`] to a Windows VK code.
pub fn key_to_vk(key: KeyName) -> u8 {
    match key {
        KeyName::Ctrl => 0x11,  // VK_CONTROL
        KeyName::Alt => 0x12,   // VK_MENU
        KeyName::Shift => 0x10, // VK_SHIFT
        KeyName::Meta => 0x5B,  // VK_LWIN
        KeyName::Tab => 0x09,
        KeyName::Enter => 0x0D,
        KeyName::Escape => 0x1B,
        KeyName::Space => 0x20,
        KeyName::Backspace => 0x08,
        KeyName::Delete => 0x2E,
        KeyName::Insert => 0x2D,
        KeyName::Home => 0x24,
        KeyName::End => 0x23,
        KeyName::PageUp => 0x21,   // VK_PRIOR
        KeyName::PageDown => 0x22, // VK_NEXT
        KeyName::Left => 0x25,
        KeyName::Up => 0x26,
        KeyName::Right => 0x27,
        KeyName::Down => 0x28,
        KeyName::CapsLock => 0x14,
        KeyName::PrintScreen => 0x2C, // VK_SNAPSHOT
        KeyName::F(n) => 0x6F + n,    // VK_F1 = 0x70
        KeyName::Letter(c) => c.to_ascii_uppercase() as u8,
        KeyName::Digit(d) => b'0' + d,
    }
}

/// Returns `true` if `vk` must be sent with `KEYEVENTF_EXTENDEDKEY`.
///
/// Navigation keys and the Windows key live on the extended scan-code page;
/// without the flag `SendInput` delivers their numpad twins instead.
pub fn is_extended(vk: u8) -> bool {
    matches!(vk, 0x21..=0x28 | 0x2D | 0x2E | 0x5B | 0x5C)
}
