//! Protocol module: the text command grammar and the discovery literals.

pub mod command;
pub mod discovery;

pub use command::{parse_command, Command, MouseButton, ParseError, ScrollDirection};
pub use discovery::{is_discovery_probe, DISCOVERY_REPLY, DISCOVERY_REQUEST};

/// Default UDP port for the command channel.
pub const DEFAULT_COMMAND_PORT: u16 = 5000;

/// Default UDP port for discovery probes.
pub const DEFAULT_DISCOVERY_PORT: u16 = 5001;

/// Receive buffer size used by both listeners.
///
/// Commands are a few dozen bytes; anything longer than this is truncated by
/// the OS and then fails to parse.
pub const MAX_DATAGRAM_SIZE: usize = 1024;
