use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Shared cell holding the token of the session that is currently recording.
///
/// The supervisor replaces the token before every session; the rotation
/// clock cancels whatever token is current. A fresh slot already holds a
/// token that no session listens to, so cancelling it is a no-op.
#[derive(Clone)]
pub struct CancelSlot {
    tx: watch::Sender<CancellationToken>,
}

impl CancelSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CancellationToken::new());
        Self { tx }
    }

    /// Publish a fresh token for the next session and hand it back.
    pub fn install(&self) -> CancellationToken {
        let token = CancellationToken::new();
        self.tx.send_replace(token.clone());
        token
    }

    /// Request that the current session stop.
    pub fn cancel_current(&self) {
        let token = self.tx.borrow().clone();
        token.cancel();
    }
}

impl Default for CancelSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_before_any_session_is_noop() {
        let slot = CancelSlot::new();
        slot.cancel_current();

        let token = slot.install();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_reaches_installed_token() {
        let slot = CancelSlot::new();
        let token = slot.install();

        slot.clone().cancel_current();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_install_replaces_previous_token() {
        let slot = CancelSlot::new();
        let first = slot.install();
        let second = slot.install();

        slot.cancel_current();
        assert!(!first.is_cancelled());
        assert!(second.is_cancelled());
    }
}
