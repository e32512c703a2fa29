//! Domain logic for AirMouse.
//!
//! Pure input rules with no OS or network dependencies: how relative motion
//! is scaled and smoothed, and how hotkey names are tokenised.

/// Scale factor, dead-zone, and moving-average smoothing for pointer motion.
pub mod motion;

/// Hotkey combo token grammar.
pub mod hotkey;
