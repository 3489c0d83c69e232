// Auth gate - Guarding protected pages on identity-provider session state
use crate::domain::session::SessionState;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

/// Read-only view of the identity provider's session.
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> SessionState;

    /// Receiver that observes every later state change.
    fn subscribe(&self) -> watch::Receiver<SessionState>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session not loaded yet; render nothing.
    Pending,
    Allow,
    /// Navigate to the given path.
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    sign_in_path: String,
}

impl AuthGate {
    pub fn new(sign_in_path: impl Into<String>) -> Self {
        Self {
            sign_in_path: sign_in_path.into(),
        }
    }

    pub fn decide(&self, state: SessionState) -> GateDecision {
        match (state.is_loaded, state.is_signed_in) {
            (false, _) => GateDecision::Pending,
            (true, true) => GateDecision::Allow,
            (true, false) => GateDecision::Redirect(self.sign_in_path.clone()),
        }
    }

    /// Wait until the session has loaded and return the resulting decision.
    /// Returns `Pending` only if the provider goes away before loading.
    pub async fn wait(&self, provider: &dyn SessionProvider) -> GateDecision {
        let mut states = WatchStream::new(provider.subscribe());
        while let Some(state) = states.next().await {
            let decision = self.decide(state);
            if decision != GateDecision::Pending {
                tracing::debug!(?decision, "Auth gate settled");
                return decision;
            }
        }
        GateDecision::Pending
    }
}
