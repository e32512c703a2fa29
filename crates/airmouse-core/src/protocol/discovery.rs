//! Discovery probe and reply literals.
//!
//! A client that does not know the server address broadcasts `DISCOVER` to
//! the discovery port; every server on the LAN answers with `MOUSE_SERVER`
//! and the client learns the address from the reply's source.

/// Probe payload expected on the discovery port.
pub const DISCOVERY_REQUEST: &str = "DISCOVER";

/// Reply payload sent back to the prober.
pub const DISCOVERY_REPLY: &[u8] = b"MOUSE_SERVER";

/// Returns `true` if `datagram` is a discovery probe.
///
/// The match is case-sensitive after trimming surrounding whitespace.  Bytes
/// that are not valid UTF-8 are replaced rather than rejected, so a garbled
/// datagram simply fails the comparison.
pub fn is_discovery_probe(datagram: &[u8]) -> bool {
    String::from_utf8_lossy(datagram).trim() == DISCOVERY_REQUEST
}
