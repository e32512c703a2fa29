//! Application layer use cases for the server.
//!
//! - **`dispatch_command`** – Parses one command line and routes it to an
//!   [`InputInjector`](dispatch_command::InputInjector).  Owns the only
//!   mutable state in the process: the motion scale factor and the optional
//!   smoothing history.  The OS call itself is made by an injector
//!   implementation supplied at construction time.

pub mod dispatch_command;
