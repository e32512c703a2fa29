//! UDP command listener.
//!
//! Every datagram on the command port (default 5000) is one command line.
//! The payload is decoded as lossy UTF-8 and handed to
//! [`CommandDispatcher::handle_line`] on the listener thread, one datagram at
//! a time, in arrival order.  Nothing is ever sent back.
//!
//! A panic inside the dispatcher or an injection backend is caught and
//! logged, so a single bad packet never takes the listener down.

use std::net::{SocketAddr, UdpSocket};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, error, info};

use super::{spawn_listener, ListenerError, ListenerHandle, RunningFlag};
use crate::application::dispatch_command::CommandDispatcher;

/// Binds `addr` and starts the command thread, which takes ownership of
/// `dispatcher`.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the socket cannot be bound, and
/// [`ListenerError::Spawn`] if the thread cannot be started.
pub fn start_command_listener(
    addr: SocketAddr,
    recv_timeout: Duration,
    mut dispatcher: CommandDispatcher,
    running: RunningFlag,
) -> Result<ListenerHandle, ListenerError> {
    let handle = spawn_listener(
        "airmouse-command",
        addr,
        recv_timeout,
        running,
        move |_: &UdpSocket, payload: &[u8], src: SocketAddr| {
            handle_datagram(&mut dispatcher, payload, src);
        },
    )?;
    info!("command listener listening on UDP {}", handle.local_addr());
    Ok(handle)
}

fn handle_datagram(dispatcher: &mut CommandDispatcher, payload: &[u8], src: SocketAddr) {
    let line = String::from_utf8_lossy(payload);
    debug!("command from {src}: {:?}", line.trim());
    let outcome = catch_unwind(AssertUnwindSafe(|| dispatcher.handle_line(&line)));
    if outcome.is_err() {
        error!("panic while handling command {:?} from {src}", line.trim());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use airmouse_core::MotionConfig;

    use crate::application::dispatch_command::{InjectionError, InputInjector};
    use crate::infrastructure::input_injection::mock::{InjectedEvent, RecordingInjector};

    const TIMEOUT: Duration = Duration::from_millis(50);

    fn wait_for(inj: &RecordingInjector, count: usize) {
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while inj.events().len() < count && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_datagrams_are_dispatched_in_order() {
        // Arrange
        let inj = Arc::new(RecordingInjector::new());
        let dispatcher = CommandDispatcher::new(inj.clone(), &MotionConfig::default());
        let running = RunningFlag::new();
        let handle = start_command_listener(
            "127.0.0.1:0".parse().unwrap(),
            TIMEOUT,
            dispatcher,
            running.clone(),
        )
        .unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").unwrap();

        // Act
        client.send_to(b"LEFT_CLICK", handle.local_addr()).unwrap();
        client.send_to(b"SCROLL_DOWN\n", handle.local_addr()).unwrap();
        wait_for(&inj, 2);
        running.stop();
        handle.join();

        // Assert
        assert_eq!(
            inj.events(),
            vec![
                InjectedEvent::Click(airmouse_core::MouseButton::Left),
                InjectedEvent::Scroll(-100),
            ]
        );
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily_and_dropped() {
        let inj = Arc::new(RecordingInjector::new());
        let mut d = CommandDispatcher::new(inj.clone(), &MotionConfig::default());
        let src: SocketAddr = "127.0.0.1:9".parse().unwrap();

        handle_datagram(&mut d, &[0xFF, 0xFE, b':', b'1'], src);
        handle_datagram(&mut d, b"RIGHT_CLICK", src);

        assert_eq!(
            inj.events(),
            vec![InjectedEvent::Click(airmouse_core::MouseButton::Right)]
        );
    }

    struct PanickingInjector;

    impl InputInjector for PanickingInjector {
        fn move_relative(&self, _: f64, _: f64) -> Result<(), InjectionError> {
            panic!("backend bug")
        }
        fn press_button(&self, _: airmouse_core::MouseButton) -> Result<(), InjectionError> {
            Ok(())
        }
        fn release_button(&self, _: airmouse_core::MouseButton) -> Result<(), InjectionError> {
            Ok(())
        }
        fn click_button(&self, _: airmouse_core::MouseButton) -> Result<(), InjectionError> {
            Ok(())
        }
        fn scroll_vertical(&self, _: i32) -> Result<(), InjectionError> {
            Ok(())
        }
        fn tap_key(&self, _: &str) -> Result<(), InjectionError> {
            Ok(())
        }
        fn send_chord(&self, _: &[String]) -> Result<(), InjectionError> {
            Ok(())
        }
        fn send_interrupt_chord(&self) -> Result<(), InjectionError> {
            Ok(())
        }
    }

    #[test]
    fn test_panic_in_backend_is_contained() {
        // Arrange
        let mut d = CommandDispatcher::new(Arc::new(PanickingInjector), &MotionConfig::default());
        let src: SocketAddr = "127.0.0.1:9".parse().unwrap();

        // Act / Assert – must return normally
        handle_datagram(&mut d, b"MOVE_DELTA:10,10", src);
        handle_datagram(&mut d, b"LEFT_CLICK", src);
    }
}
