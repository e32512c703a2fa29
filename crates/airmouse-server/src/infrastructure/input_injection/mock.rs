//! Recording input injector for tests and dry runs.
//!
//! # Why a recording injector?
//!
//! The real injectors (`WindowsInputInjector`, `LinuxXTestInjector`) make OS
//! calls that need a live desktop session and actually move the cursor on
//! the machine running them.  `RecordingInjector` replaces every OS call with
//! an append to an in-memory log, so tests can assert exactly what was
//! injected and in what order.
//!
//! It is also selectable from the config file (`[injection] backend =
//! "recording"`), which runs the full server without touching real input;
//! each event is logged at `info` level.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return
//! `InjectionError::Platform`, for exercising error-handling paths.

use std::sync::{Mutex, MutexGuard, PoisonError};

use airmouse_core::MouseButton;
use tracing::info;

use super::resolve_keys;
use crate::application::dispatch_command::{InjectionError, InputInjector};

/// One call observed by the [`RecordingInjector`].
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedEvent {
    Move { dx: f64, dy: f64 },
    Press(MouseButton),
    Release(MouseButton),
    Click(MouseButton),
    Scroll(i32),
    Tap(String),
    Chord(Vec<String>),
    InterruptChord,
}

/// An injector that records calls instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    events: Mutex<Vec<InjectedEvent>>,
    /// When `true`, every method returns `InjectionError::Platform`.
    pub should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of every recorded event, oldest first.
    pub fn events(&self) -> Vec<InjectedEvent> {
        self.log().clone()
    }

    /// Recorded relative motions only.
    pub fn moves(&self) -> Vec<(f64, f64)> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                InjectedEvent::Move { dx, dy } => Some((*dx, *dy)),
                _ => None,
            })
            .collect()
    }

    /// Recorded scroll amounts only.
    pub fn scrolls(&self) -> Vec<i32> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                InjectedEvent::Scroll(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<InjectedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: InjectedEvent) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("recording injector set to fail".into()));
        }
        info!("inject {event:?}");
        self.log().push(event);
        Ok(())
    }
}

impl InputInjector for RecordingInjector {
    fn move_relative(&self, dx: f64, dy: f64) -> Result<(), InjectionError> {
        self.record(InjectedEvent::Move { dx, dy })
    }

    fn press_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.record(InjectedEvent::Press(button))
    }

    fn release_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.record(InjectedEvent::Release(button))
    }

    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError> {
        self.record(InjectedEvent::Click(button))
    }

    fn scroll_vertical(&self, ticks: i32) -> Result<(), InjectionError> {
        self.record(InjectedEvent::Scroll(ticks))
    }

    /// Validates the key name like a real backend before recording it.
    fn tap_key(&self, key: &str) -> Result<(), InjectionError> {
        resolve_keys(&[key])?;
        self.record(InjectedEvent::Tap(key.to_string()))
    }

    /// Validates every key name like a real backend before recording it.
    fn send_chord(&self, keys: &[String]) -> Result<(), InjectionError> {
        resolve_keys(keys)?;
        self.record(InjectedEvent::Chord(keys.to_vec()))
    }

    fn send_interrupt_chord(&self) -> Result<(), InjectionError> {
        self.record(InjectedEvent::InterruptChord)
    }
}
