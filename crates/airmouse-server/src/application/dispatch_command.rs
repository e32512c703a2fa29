//! CommandDispatcher: turns parsed commands into OS input events.
//!
//! This use case sits at the application layer and delegates every OS call
//! to an [`InputInjector`] trait object.  The platform implementations live
//! in `infrastructure::input_injection`.
//!
//! The dispatcher is the single owner of the mutable relay state: the
//! [`MotionScaler`] (scale factor plus optional smoothing history).  It is
//! moved into the command listener thread and handles one datagram at a
//! time, so no locking is needed.

use std::sync::Arc;

use airmouse_core::{
    parse_command, Command, HotkeyCombo, MotionConfig, MotionScaler, MouseButton, ParseError,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error type for input injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// A hotkey named a key that has no platform mapping.
    #[error("unsupported key name: {0:?}")]
    UnsupportedKey(String),
    /// The OS rejected or only partially applied the event.
    #[error("platform error: {0}")]
    Platform(String),
    /// No backend could be opened (no display, unsupported OS, ...).
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
}

/// Error returned when a single command cannot be carried out.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("injection error: {0}")]
    Injection(#[from] InjectionError),
}

/// Input-injection capability provided by the host platform.
///
/// Each supported OS provides an implementation in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    /// Moves the cursor by a relative amount in host pixels.
    fn move_relative(&self, dx: f64, dy: f64) -> Result<(), InjectionError>;

    /// Presses a mouse button without releasing it.
    fn press_button(&self, button: MouseButton) -> Result<(), InjectionError>;

    /// Releases a mouse button.
    fn release_button(&self, button: MouseButton) -> Result<(), InjectionError>;

    /// Presses and releases a mouse button.
    fn click_button(&self, button: MouseButton) -> Result<(), InjectionError>;

    /// Scrolls vertically.  Positive is up.
    fn scroll_vertical(&self, ticks: i32) -> Result<(), InjectionError>;

    /// Presses then releases a single named key.
    fn tap_key(&self, key: &str) -> Result<(), InjectionError>;

    /// Presses every key in order, then releases them in reverse order.
    fn send_chord(&self, keys: &[String]) -> Result<(), InjectionError>;

    /// Sends `ctrl+c` through the backend's interrupt-safe path.
    fn send_interrupt_chord(&self) -> Result<(), InjectionError>;
}

/// The Dispatch Command use case.
pub struct CommandDispatcher {
    injector: Arc<dyn InputInjector>,
    scaler: MotionScaler,
    scroll_step: i32,
}

impl CommandDispatcher {
    /// Creates a dispatcher with the given injector and motion settings.
    pub fn new(injector: Arc<dyn InputInjector>, motion: &MotionConfig) -> Self {
        Self {
            injector,
            scaler: MotionScaler::new(motion),
            scroll_step: motion.scroll_step.saturating_abs(),
        }
    }

    /// Read access to the motion state, mainly for diagnostics and tests.
    pub fn scaler(&self) -> &MotionScaler {
        &self.scaler
    }

    /// Handles one raw command line, logging and swallowing any failure.
    pub fn handle_line(&mut self, line: &str) {
        match self.try_handle_line(line) {
            Ok(()) => {}
            Err(DispatchError::Parse(e)) => warn!("dropped command {:?}: {e}", line.trim()),
            Err(DispatchError::Injection(e)) => error!("command {:?} failed: {e}", line.trim()),
        }
    }

    /// Parses and dispatches one raw command line.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Parse`] for malformed lines and
    /// [`DispatchError::Injection`] if the OS call fails.
    pub fn try_handle_line(&mut self, line: &str) -> Result<(), DispatchError> {
        let command = parse_command(line)?;
        self.dispatch(command)
    }

    /// Dispatches a parsed command.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Injection`] if the OS call fails.
    pub fn dispatch(&mut self, command: Command) -> Result<(), DispatchError> {
        debug!("dispatching {}", command.verb());
        match command {
            Command::MoveDelta { dx, dy } => {
                if let Some((mx, my)) = self.scaler.apply(dx, dy) {
                    self.injector.move_relative(mx, my)?;
                }
            }
            Command::SetScale(scale) => {
                self.scaler.set_scale(scale);
                info!("scale set to {scale}");
            }
            Command::Scroll(direction) => {
                self.injector
                    .scroll_vertical(direction.sign() * self.scroll_step)?;
            }
            Command::Click(button) => self.injector.click_button(button)?,
            Command::Press(button) => self.injector.press_button(button)?,
            Command::Release(button) => self.injector.release_button(button)?,
            Command::Hotkey(combo) => self.send_hotkey(&combo)?,
        }
        Ok(())
    }

    fn send_hotkey(&self, combo: &HotkeyCombo) -> Result<(), InjectionError> {
        if combo.is_interrupt() {
            // Ordinary chords are unreliable for interrupt-generating input on
            // some hosts; keep this on its own backend path.
            debug!("sending interrupt chord");
            return self.injector.send_interrupt_chord();
        }
        debug!("sending hotkey {combo}");
        match combo.keys() {
            [single] => self.injector.tap_key(single),
            keys => self.injector.send_chord(keys),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
