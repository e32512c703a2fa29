//! Windows input injection via the SendInput API.
//!
//! Relative motion uses `MOUSEEVENTF_MOVE` without `MOUSEEVENTF_ABSOLUTE`,
//! so the OS applies the user's pointer acceleration settings just like a
//! physical mouse.  Key names are translated to Virtual-Key codes through
//! [`KeyMapper::to_windows_vk`].
//!
//! # Interrupt chord
//!
//! Ordinary chords go out as one `SendInput` batch so no other input can
//! interleave.  Console hosts, however, frequently miss a `ctrl+c` whose
//! press and release land in the same batch: the key state is sampled
//! between messages and `C` is already up.  The interrupt chord is therefore
//! sent as separate calls with a short hold before the release.

#![cfg(target_os = "windows")]

use std::time::Duration;

use airmouse_core::keymap::{windows_vk, KeyMapper};
use airmouse_core::{KeyName, MouseButton};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};

use super::{press_release_chord, resolve_keys};
use crate::application::dispatch_command::{InjectionError, InputInjector};

/// How long `ctrl+c` is held before release.
const INTERRUPT_HOLD: Duration = Duration::from_millis(30);

/// Windows implementation of [`InputInjector`] using SendInput.
pub struct WindowsInputInjector;

impl WindowsInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for WindowsInputInjector {
    fn move_relative(&self, dx: f64, dy: f64) -> Result<(), InjectionError> {
        send(&[mouse_input(
            MOUSEEVENTF_MOVE,
            dx.round() as i32,
            dy.round() as i32,
            0,
        )])
    }

    fn press_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        send(&[mouse_input(button_flags(button, true), 0, 0, 0)])
    }

    fn release_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        send(&[mouse_input(button_flags(button, false), 0, 0, 0)])
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        send(&[
            mouse_input(button_flags(button, true), 0, 0, 0),
            mouse_input(button_flags(button, false), 0, 0, 0),
        ])
    }

    fn scroll_vertical(&self, ticks: i32) -> Result<(), InjectionError> {
        // mouseData is a DWORD carrying a signed wheel delta.
        send(&[mouse_input(MOUSEEVENTF_WHEEL, 0, 0, ticks as u32)])
    }

    fn tap_key(&self, key: &str) -> Result<(), InjectionError> {
        send_chord_batch(&resolve_keys(&[key])?)
    }

    fn send_chord(&self, keys: &[String]) -> Result<(), InjectionError> {
        send_chord_batch(&resolve_keys(keys)?)
    }

    fn send_interrupt_chord(&self) -> Result<(), InjectionError> {
        let ctrl = KeyMapper::to_windows_vk(KeyName::Ctrl);
        let c = KeyMapper::to_windows_vk(KeyName::Letter('c'));
        press_release_chord(&[ctrl, c], Some(INTERRUPT_HOLD), |vk, down| {
            send(&[key_input(vk, !down)])
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Sends a chord as one batch.  A partially inserted batch can leave keys
/// down, so on failure every key gets a best-effort release.
fn send_chord_batch(keys: &[KeyName]) -> Result<(), InjectionError> {
    let result = send(&chord_inputs(keys));
    if result.is_err() {
        let releases: Vec<INPUT> = keys
            .iter()
            .rev()
            .map(|k| key_input(KeyMapper::to_windows_vk(*k), true))
            .collect();
        let _ = send(&releases);
    }
    result
}

/// Press every key in order, then release in reverse order.
fn chord_inputs(keys: &[KeyName]) -> Vec<INPUT> {
    let vks: Vec<u8> = keys.iter().map(|k| KeyMapper::to_windows_vk(*k)).collect();
    vks.iter()
        .map(|vk| key_input(*vk, false))
        .chain(vks.iter().rev().map(|vk| key_input(*vk, true)))
        .collect()
}

fn button_flags(button: MouseButton, pressed: bool) -> MOUSE_EVENT_FLAGS {
    match (button, pressed) {
        (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
        (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
        (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
        (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
    }
}

fn mouse_input(flags: MOUSE_EVENT_FLAGS, dx: i32, dy: i32, mouse_data: u32) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn key_input(vk: u8, key_up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    if windows_vk::is_extended(vk) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(u16::from(vk)),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) -> Result<(), InjectionError> {
    // SAFETY: every element is a fully initialised INPUT structure and the
    // size argument matches the element type.
    let inserted = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
    if inserted as usize != inputs.len() {
        return Err(InjectionError::Platform(format!(
            "SendInput inserted {inserted} of {} events (blocked by UIPI?)",
            inputs.len()
        )));
    }
    Ok(())
}
