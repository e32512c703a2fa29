//! Platform-specific input injection implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`.  [`platform_injector`] returns it as a trait
//! object, or the in-memory recorder when the config asks for one.

use std::sync::Arc;
use std::time::Duration;

use airmouse_core::KeyName;

use crate::application::dispatch_command::{InjectionError, InputInjector};
use crate::infrastructure::storage::config::{BackendKind, InjectionConfig};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "xtest"))]
pub mod linux;

/// Builds the injector selected by `config`.
///
/// # Errors
///
/// Returns [`InjectionError::Unavailable`] if the platform backend cannot be
/// opened or the OS has no backend at all.
pub fn platform_injector(config: &InjectionConfig) -> Result<Arc<dyn InputInjector>, InjectionError> {
    match config.backend {
        BackendKind::Recording => Ok(Arc::new(mock::RecordingInjector::new())),
        BackendKind::Platform => native_injector(),
    }
}

#[cfg(target_os = "windows")]
fn native_injector() -> Result<Arc<dyn InputInjector>, InjectionError> {
    Ok(Arc::new(windows::WindowsInputInjector::new()))
}

#[cfg(all(target_os = "linux", feature = "xtest"))]
fn native_injector() -> Result<Arc<dyn InputInjector>, InjectionError> {
    Ok(Arc::new(linux::LinuxXTestInjector::new()?))
}

#[cfg(all(target_os = "linux", not(feature = "xtest")))]
fn native_injector() -> Result<Arc<dyn InputInjector>, InjectionError> {
    Err(InjectionError::Unavailable(
        "built without the `xtest` feature; rebuild with `--features xtest`".into(),
    ))
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
fn native_injector() -> Result<Arc<dyn InputInjector>, InjectionError> {
    Err(InjectionError::Unavailable(format!(
        "no input backend for {}",
        std::env::consts::OS
    )))
}

/// Resolves hotkey tokens to keys, failing on the first unknown name.
pub fn resolve_keys<S: AsRef<str>>(names: &[S]) -> Result<Vec<KeyName>, InjectionError> {
    names
        .iter()
        .map(|n| {
            let n = n.as_ref();
            KeyName::from_token(n).ok_or_else(|| InjectionError::UnsupportedKey(n.to_string()))
        })
        .collect()
}

/// Presses `keys` in order, holds for `hold`, then releases them in reverse.
///
/// `send(key, down)` emits one key event.  If a press fails, the keys that
/// already went down are still released, so no modifier is left held on the
/// host.  Releases are best effort; the first error is returned.
#[cfg_attr(
    not(any(target_os = "windows", all(target_os = "linux", feature = "xtest"))),
    allow(dead_code)
)]
pub(crate) fn press_release_chord<K: Copy>(
    keys: &[K],
    hold: Option<Duration>,
    mut send: impl FnMut(K, bool) -> Result<(), InjectionError>,
) -> Result<(), InjectionError> {
    let mut result = Ok(());
    let mut pressed = 0;
    for key in keys {
        if let Err(e) = send(*key, true) {
            result = Err(e);
            break;
        }
        pressed += 1;
    }
    if let (Ok(()), Some(hold)) = (&result, hold) {
        std::thread::sleep(hold);
    }
    for key in keys[..pressed].iter().rev() {
        let released = send(*key, false);
        if result.is_ok() {
            result = released;
        }
    }
    result
}
