//! Storage infrastructure: the server's TOML configuration file.
//!
//! The server only ever reads its config; there is no settings UI that
//! writes it back.  Missing files and missing fields fall back to defaults,
//! so a fresh install runs with no file at all.

pub mod config;
