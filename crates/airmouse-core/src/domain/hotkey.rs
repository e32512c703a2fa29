//! Hotkey combo grammar.
//!
//! A hotkey verb carries its keys after the `HOTKEY_` prefix, separated by
//! underscores: `HOTKEY_CTRL_SHIFT_ESC`.  The suffix is tokenised into an
//! ordered list of lowercase key names (`["ctrl", "shift", "esc"]`); empty
//! tokens produced by doubled or trailing underscores are dropped.
//!
//! Key names are kept as strings here.  Resolving them to platform key codes
//! happens at injection time (see [`crate::keymap`]), so an unknown name is
//! an injection failure rather than a parse failure.

use crate::protocol::command::ParseError;

/// An ordered, non-empty sequence of lowercase key names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotkeyCombo {
    keys: Vec<String>,
}

impl HotkeyCombo {
    /// Parses the part of a hotkey verb that follows `HOTKEY_`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyHotkey`] if no key names remain after
    /// discarding empty tokens.
    pub fn parse(suffix: &str) -> Result<Self, ParseError> {
        let keys: Vec<String> = suffix
            .trim()
            .to_uppercase()
            .split('_')
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        if keys.is_empty() {
            return Err(ParseError::EmptyHotkey(suffix.to_string()));
        }
        Ok(Self { keys })
    }

    /// The key names in press order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns `true` for the `ctrl+c` combo.
    ///
    /// This combo interrupts foreground console programs and is injected
    /// through a separate path; see `InputInjector::send_interrupt_chord`
    /// in the server crate.
    pub fn is_interrupt(&self) -> bool {
        matches!(self.keys.as_slice(), [a, b] if a == "ctrl" && b == "c")
    }
}

impl std::fmt::Display for HotkeyCombo {
    /// Formats the combo as `ctrl+shift+esc`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.keys.join("+"))
    }
}
