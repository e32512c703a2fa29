//! Infrastructure layer for the server.
//!
//! Contains OS-facing adapters: input injection APIs, UDP network I/O, and
//! configuration file loading.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `airmouse_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`input_injection`** – OS-specific implementations of `InputInjector`.
//!   The backend is selected at compile time using `#[cfg(target_os)]`, with
//!   an in-memory `RecordingInjector` for tests and dry runs.
//!
//! - **`network`** – The discovery responder and the command listener, each a
//!   blocking UDP loop on its own thread.
//!
//! - **`storage`** – TOML configuration loading with defaults for every field.

pub mod input_injection;
pub mod network;
pub mod storage;
