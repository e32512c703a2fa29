//! Linux X11 input injection via the XTest extension.
//!
//! Uses `XTestFakeRelativeMotionEvent`, `XTestFakeButtonEvent`, and
//! `XTestFakeKeyEvent` to inject input into the X11 session named by the
//! `DISPLAY` environment variable.
//!
//! # Key code translation
//!
//! `XTestFakeKeyEvent` takes a server keycode, not a KeySym:
//!
//! ```text
//! key name → KeyName → X11 KeySym → XKeysymToKeycode(display, keysym) → keycode
//! ```
//!
//! # Scroll via button events
//!
//! X11 has no wheel API; buttons 4 and 5 are scroll up and down.  Scroll
//! amounts follow the Windows `WHEEL_DELTA` = 120 convention, so
//! `|ticks| / 120` clicks are sent, at least one.
//!
//! Only built with the `xtest` cargo feature, which links libX11 and libXtst.
//!
//! # Threading
//!
//! Xlib connections are not thread-safe unless `XInitThreads` was called
//! first.  The display pointer is kept behind a `Mutex` so every request is
//! serialised.

#![cfg(all(target_os = "linux", feature = "xtest"))]

use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use airmouse_core::keymap::KeyMapper;
use airmouse_core::{KeyName, MouseButton};
use x11::{xlib, xtest};

use super::{press_release_chord, resolve_keys};
use crate::application::dispatch_command::{InjectionError, InputInjector};

/// `CurrentTime`: let the server timestamp synthesized events.
const CURRENT_TIME: xlib::Time = 0;

/// One notch of a standard wheel.
const WHEEL_DELTA: u32 = 120;

const BUTTON_LEFT: c_uint = 1;
const BUTTON_RIGHT: c_uint = 3;
const BUTTON_SCROLL_UP: c_uint = 4;
const BUTTON_SCROLL_DOWN: c_uint = 5;

/// How long `ctrl+c` is held before release.
const INTERRUPT_HOLD: Duration = Duration::from_millis(30);

struct Display(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning Mutex is
// held, so it is never used from two threads at once.
unsafe impl Send for Display {}

/// Linux X11/XTest input injector.
pub struct LinuxXTestInjector {
    display: Mutex<Display>,
}

impl LinuxXTestInjector {
    /// Opens the X display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Unavailable`] if the display cannot be opened.
    pub fn new() -> Result<Self, InjectionError> {
        // SAFETY: a null name makes Xlib read the DISPLAY environment variable.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(InjectionError::Unavailable(
                "cannot open X display (is DISPLAY set?)".into(),
            ));
        }
        Ok(Self {
            display: Mutex::new(Display(display)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Display> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn keycode(display: &Display, key: KeyName) -> Result<c_uint, InjectionError> {
        let keysym = KeyMapper::to_x11_keysym(key);
        // SAFETY: display is a live connection guarded by the caller's lock.
        let code = unsafe { xlib::XKeysymToKeycode(display.0, xlib::KeySym::from(keysym)) };
        if code == 0 {
            return Err(InjectionError::Platform(format!(
                "no keycode for keysym 0x{keysym:04X} in current keyboard map"
            )));
        }
        Ok(c_uint::from(code))
    }

    fn chord(&self, keys: &[KeyName]) -> Result<(), InjectionError> {
        let display = self.lock();
        let codes = keys
            .iter()
            .map(|k| Self::keycode(&display, *k))
            .collect::<Result<Vec<_>, _>>()?;
        let result =
            press_release_chord(&codes, None, |code, down| fake_key(&display, code, down));
        flush(&display);
        result
    }

    fn button(&self, button: c_uint, pressed: bool) -> Result<(), InjectionError> {
        let display = self.lock();
        fake_button(&display, button, pressed)?;
        flush(&display);
        Ok(())
    }
}

impl Drop for LinuxXTestInjector {
    fn drop(&mut self) {
        let display = self.lock();
        // SAFETY: the connection was opened in `new` and is closed exactly once.
        unsafe {
            xlib::XCloseDisplay(display.0);
        }
    }
}

impl InputInjector for LinuxXTestInjector {
    fn move_relative(&self, dx: f64, dy: f64) -> Result<(), InjectionError> {
        let display = self.lock();
        // SAFETY: display is a live connection guarded by the lock.
        let ok = unsafe {
            xtest::XTestFakeRelativeMotionEvent(
                display.0,
                dx.round() as c_int,
                dy.round() as c_int,
                CURRENT_TIME,
            )
        };
        check(ok, "XTestFakeRelativeMotionEvent")?;
        flush(&display);
        Ok(())
    }

    fn press_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.button(x11_button(button), true)
    }

    fn release_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.button(x11_button(button), false)
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        let display = self.lock();
        let b = x11_button(button);
        fake_button(&display, b, true)?;
        fake_button(&display, b, false)?;
        flush(&display);
        Ok(())
    }

    fn scroll_vertical(&self, ticks: i32) -> Result<(), InjectionError> {
        if ticks == 0 {
            return Ok(());
        }
        let (button, clicks) = scroll_clicks(ticks);
        let display = self.lock();
        for _ in 0..clicks {
            fake_button(&display, button, true)?;
            fake_button(&display, button, false)?;
        }
        flush(&display);
        Ok(())
    }

    fn tap_key(&self, key: &str) -> Result<(), InjectionError> {
        self.chord(&resolve_keys(&[key])?)
    }

    fn send_chord(&self, keys: &[String]) -> Result<(), InjectionError> {
        self.chord(&resolve_keys(keys)?)
    }

    fn send_interrupt_chord(&self) -> Result<(), InjectionError> {
        // Each event is flushed on its own and the chord is held briefly, so
        // terminal emulators see ctrl held while `c` goes down.
        let display = self.lock();
        let ctrl = Self::keycode(&display, KeyName::Ctrl)?;
        let c = Self::keycode(&display, KeyName::Letter('c'))?;

        press_release_chord(&[ctrl, c], Some(INTERRUPT_HOLD), |code, down| {
            let sent = fake_key(&display, code, down);
            flush(&display);
            sent
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn x11_button(button: MouseButton) -> c_uint {
    match button {
        MouseButton::Left => BUTTON_LEFT,
        MouseButton::Right => BUTTON_RIGHT,
    }
}

/// Maps a signed scroll amount to a wheel button and a click count.
fn scroll_clicks(ticks: i32) -> (c_uint, u32) {
    let button = if ticks > 0 {
        BUTTON_SCROLL_UP
    } else {
        BUTTON_SCROLL_DOWN
    };
    (button, (ticks.unsigned_abs() / WHEEL_DELTA).max(1))
}

fn fake_key(display: &Display, code: c_uint, pressed: bool) -> Result<(), InjectionError> {
    // SAFETY: display is a live connection guarded by the caller's lock.
    let ok = unsafe { xtest::XTestFakeKeyEvent(display.0, code, c_int::from(pressed), CURRENT_TIME) };
    check(ok, "XTestFakeKeyEvent")
}

fn fake_button(display: &Display, button: c_uint, pressed: bool) -> Result<(), InjectionError> {
    // SAFETY: display is a live connection guarded by the caller's lock.
    let ok = unsafe {
        xtest::XTestFakeButtonEvent(display.0, button, c_int::from(pressed), CURRENT_TIME)
    };
    check(ok, "XTestFakeButtonEvent")
}

fn flush(display: &Display) {
    // SAFETY: display is a live connection guarded by the caller's lock.
    unsafe {
        xlib::XFlush(display.0);
    }
}

/// XTest calls return 0 when the extension is missing.
fn check(ok: c_int, call: &str) -> Result<(), InjectionError> {
    if ok == 0 {
        return Err(InjectionError::Platform(format!("{call} failed")));
    }
    Ok(())
}
