// Session provider backed by a watch channel
use crate::application::auth_gate::SessionProvider;
use crate::domain::session::SessionState;
use std::sync::Arc;
use tokio::sync::watch;

/// Whatever talks to the identity provider pushes state in through
/// [`WatchSessionProvider::set`]; the auth gate reads it back out.
#[derive(Debug, Clone)]
pub struct WatchSessionProvider {
    tx: Arc<watch::Sender<SessionState>>,
}

impl WatchSessionProvider {
    pub fn new(initial: SessionState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Loaded session that is signed in iff a credential is configured.
    pub fn from_credential(credential: Option<&str>) -> Self {
        let signed_in = credential.is_some_and(|c| !c.trim().is_empty());
        Self::new(SessionState {
            is_signed_in: signed_in,
            is_loaded: true,
        })
    }

    pub fn set(&self, state: SessionState) {
        self.tx.send_replace(state);
    }
}

impl SessionProvider for WatchSessionProvider {
    fn current(&self) -> SessionState {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_credential() {
        assert_eq!(
            WatchSessionProvider::from_credential(Some("tok")).current(),
            SessionState::signed_in()
        );
        assert_eq!(
            WatchSessionProvider::from_credential(Some("  ")).current(),
            SessionState::signed_out()
        );
        assert_eq!(
            WatchSessionProvider::from_credential(None).current(),
            SessionState::signed_out()
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let provider = WatchSessionProvider::new(SessionState::loading());
        let mut rx = provider.subscribe();
        provider.set(SessionState::signed_in());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SessionState::signed_in());
    }
}
