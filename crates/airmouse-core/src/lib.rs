//! # airmouse-core
//!
//! Shared library for AirMouse containing the text command grammar, the
//! motion scaling and hotkey domain logic, and key name translation tables.
//!
//! This crate has zero dependencies on OS APIs or network sockets, so every
//! rule in it can be unit-tested on any machine.
//!
//! # Architecture overview (for beginners)
//!
//! AirMouse turns a phone (or any device on the LAN) into a mouse and
//! keyboard for a host computer.  The device sends short text commands such
//! as `MOVE_DELTA:3.5,-1` or `HOTKEY_ALT_TAB` over UDP; the host-side server
//! parses them and injects synthetic input.
//!
//! - **`protocol`** – What travels over the wire.  Raw text lines are parsed
//!   into the closed [`Command`] enum, and the discovery probe/reply literals
//!   live here too.
//!
//! - **`domain`** – Pure input rules: the [`MotionScaler`] (scale factor,
//!   dead-zone, optional moving-average smoothing) and the [`HotkeyCombo`]
//!   token grammar.
//!
//! - **`keymap`** – Translation from the key names used in hotkey commands
//!   (`ctrl`, `tab`, `f4`, ...) to Windows virtual-key codes and X11 KeySyms.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::hotkey::HotkeyCombo;
pub use domain::motion::{MotionConfig, MotionHistory, MotionScaler, ScaleFactor};
pub use keymap::KeyName;
pub use protocol::command::{parse_command, Command, MouseButton, ParseError, ScrollDirection};
