//! Realtime Client.
//!
//! [`RealtimeClient`] owns at most one live connection at a time. It is
//! constructed explicitly and handed to whatever needs it; there is no
//! process-wide instance.
//!
//! None of the public operations report connection problems. Emits are
//! fire-and-forget, and every dashboard-scoped operation is a silent no-op
//! when no connection exists. Connect and disconnect transitions are logged.
//! Reconnection after a server-side close is left to the caller
//! (`disconnect()` then `connect()`).

use crate::domain::collaboration::{
    COMPONENT_UPDATE, COMPONENT_UPDATED, CURSOR_MOVE, CURSOR_MOVED, ComponentUpdate,
    ComponentUpdated, CursorMove, CursorMoved, CursorPosition, EventFrame, JOIN_DASHBOARD,
    LEAVE_DASHBOARD, PresenceUser,
};
use crate::error::RealtimeError;
use crate::infrastructure::realtime_transport::RealtimeTransport;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Notify, mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Registration token returned by the `on_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerId {
    event: &'static str,
    id: u64,
}

/// Inbound listeners keyed by event name. Shared by every connection the
/// client creates, so registrations survive a reconnect.
#[derive(Default)]
struct Listeners {
    by_event: Mutex<HashMap<&'static str, Vec<(u64, Listener)>>>,
    next_id: AtomicU64,
}

impl Listeners {
    fn add(&self, event: &'static str, listener: Listener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.by_event
            .lock()
            .entry(event)
            .or_default()
            .push((id, listener));
        ListenerId { event, id }
    }

    fn remove(&self, listener: &ListenerId) -> bool {
        let mut by_event = self.by_event.lock();
        let Some(listeners) = by_event.get_mut(listener.event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != listener.id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            by_event.remove(listener.event);
        }
        removed
    }

    fn count(&self, event: &str) -> usize {
        self.by_event.lock().get(event).map_or(0, Vec::len)
    }

    fn dispatch(&self, frame: &EventFrame) {
        // Snapshot so listeners run without the lock held.
        let listeners: Vec<Listener> = match self.by_event.lock().get(frame.event.as_str()) {
            Some(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            None => {
                debug!(event = %frame.event, "No listener for realtime event");
                return;
            }
        };
        for listener in listeners {
            listener(&frame.data);
        }
    }
}

/// One live (or formerly live) connection.
pub struct ConnectionHandle {
    id: u64,
    outbound: mpsc::UnboundedSender<EventFrame>,
    state: Arc<watch::Sender<ConnectionState>>,
    shutdown: Arc<Notify>,
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ConnectionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Resolve once the connection reaches `target`.
    pub async fn wait_for_state(&self, target: ConnectionState) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == target).await;
    }

    /// Queue a frame. Frames emitted while still connecting are sent once
    /// the channel opens; frames emitted after close are dropped.
    pub fn emit(&self, event: &str, data: Value) {
        if self.outbound.send(EventFrame::new(event, data)).is_err() {
            debug!(connection = self.id, event, "Dropping frame for closed connection");
        }
    }

    fn close(&self) {
        self.shutdown.notify_one();
    }
}

pub struct RealtimeClient {
    transport: Arc<dyn RealtimeTransport>,
    connection: Mutex<Option<Arc<ConnectionHandle>>>,
    listeners: Arc<Listeners>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("connection", &*self.connection.lock())
            .finish_non_exhaustive()
    }
}

impl RealtimeClient {
    pub fn new(transport: Arc<dyn RealtimeTransport>) -> Self {
        Self {
            transport,
            connection: Mutex::new(None),
            listeners: Arc::new(Listeners::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Return the current connection, opening one in the background if there
    /// is none. Must be called from within a Tokio runtime.
    pub fn connect(&self) -> Arc<ConnectionHandle> {
        let mut slot = self.connection.lock();
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ConnectionState::Connecting);
        let handle = Arc::new(ConnectionHandle {
            id,
            outbound: outbound_tx,
            state: Arc::new(state_tx),
            shutdown: Arc::new(Notify::new()),
        });

        tokio::spawn(drive(
            id,
            self.transport.clone(),
            outbound_rx,
            self.listeners.clone(),
            handle.state.clone(),
            handle.shutdown.clone(),
        ));

        *slot = Some(handle.clone());
        handle
    }

    /// Close the current connection, if any. The next `connect()` opens a
    /// fresh one.
    pub fn disconnect(&self) {
        if let Some(handle) = self.connection.lock().take() {
            debug!(connection = handle.id, "Closing realtime connection");
            handle.close();
        }
    }

    pub fn connection(&self) -> Option<Arc<ConnectionHandle>> {
        self.connection.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connection()
            .is_some_and(|handle| handle.state() == ConnectionState::Connected)
    }

    fn emit(&self, event: &str, data: Value) {
        match self.connection() {
            Some(handle) => handle.emit(event, data),
            None => debug!(event, "Not connected, skipping realtime emit"),
        }
    }

    pub fn join_dashboard(&self, slug: &str) {
        self.emit(JOIN_DASHBOARD, Value::String(slug.to_string()));
    }

    pub fn leave_dashboard(&self, slug: &str) {
        self.emit(LEAVE_DASHBOARD, Value::String(slug.to_string()));
    }

    pub fn emit_component_update(&self, slug: &str, component_id: &str, changes: Value) {
        self.send_component_update(slug, component_id, changes, None);
    }

    /// Same as [`emit_component_update`](Self::emit_component_update), tagged
    /// with the author so the echo can be recognized.
    pub fn emit_component_update_as(&self, slug: &str, component_id: &str, changes: Value, user_id: &str) {
        self.send_component_update(slug, component_id, changes, Some(user_id.to_string()));
    }

    fn send_component_update(&self, slug: &str, component_id: &str, changes: Value, user_id: Option<String>) {
        let payload = ComponentUpdate {
            dashboard_slug: slug.to_string(),
            component_id: component_id.to_string(),
            changes,
            user_id,
        };
        self.emit_payload(COMPONENT_UPDATE, &payload);
    }

    /// Ephemeral presence; no delivery or ordering guarantee.
    pub fn emit_cursor_move(&self, slug: &str, position: CursorPosition, user: PresenceUser) {
        let payload = CursorMove {
            dashboard_slug: slug.to_string(),
            position,
            user,
        };
        self.emit_payload(CURSOR_MOVE, &payload);
    }

    fn emit_payload<T: serde::Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(data) => self.emit(event, data),
            Err(e) => warn!(event, error = %e, "Failed to encode realtime payload"),
        }
    }

    /// Register a `component-updated` listener. Registrations accumulate
    /// until removed with [`remove_listener`](Self::remove_listener).
    pub fn on_component_updated<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(ComponentUpdated) + Send + Sync + 'static,
    {
        self.listeners
            .add(COMPONENT_UPDATED, typed_listener(COMPONENT_UPDATED, callback))
    }

    /// Register a `cursor-moved` listener. Registrations accumulate.
    pub fn on_cursor_moved<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(CursorMoved) + Send + Sync + 'static,
    {
        self.listeners
            .add(CURSOR_MOVED, typed_listener(CURSOR_MOVED, callback))
    }

    /// Returns false if the listener was already gone.
    pub fn remove_listener(&self, listener: &ListenerId) -> bool {
        self.listeners.remove(listener)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn typed_listener<T, F>(event: &'static str, callback: F) -> Listener
where
    T: DeserializeOwned,
    F: Fn(T) + Send + Sync + 'static,
{
    Arc::new(move |data: &Value| match serde_json::from_value::<T>(data.clone()) {
        Ok(payload) => callback(payload),
        Err(e) => warn!(event, error = %e, "Ignoring malformed realtime payload"),
    })
}

async fn drive(
    id: u64,
    transport: Arc<dyn RealtimeTransport>,
    mut outbound: mpsc::UnboundedReceiver<EventFrame>,
    listeners: Arc<Listeners>,
    state: Arc<watch::Sender<ConnectionState>>,
    shutdown: Arc<Notify>,
) {
    let mut channel = tokio::select! {
        opened = transport.open() => match opened {
            Ok(channel) => channel,
            Err(e) => {
                warn!(connection = id, error = %e, "Realtime connection failed");
                state.send_replace(ConnectionState::Disconnected);
                return;
            }
        },
        _ = shutdown.notified() => {
            state.send_replace(ConnectionState::Disconnected);
            return;
        }
    };

    state.send_replace(ConnectionState::Connected);
    info!(connection = id, "Realtime connected");

    let reason = loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Flush what was emitted before the disconnect call.
                while let Ok(frame) = outbound.try_recv() {
                    if channel.send(frame).await.is_err() {
                        break;
                    }
                }
                channel.close().await;
                break "client disconnect".to_string();
            }
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    debug!(connection = id, event = %frame.event, "Realtime emit");
                    if let Err(e) = channel.send(frame).await {
                        break e.to_string();
                    }
                }
                None => {
                    channel.close().await;
                    break "connection handle dropped".to_string();
                }
            },
            inbound = channel.recv() => match inbound {
                Some(Ok(frame)) => listeners.dispatch(&frame),
                Some(Err(RealtimeError::Frame(e))) => {
                    warn!(connection = id, error = %e, "Dropping malformed realtime frame");
                }
                Some(Err(e)) => break e.to_string(),
                None => break "closed by server".to_string(),
            },
        }
    };

    state.send_replace(ConnectionState::Disconnected);
    info!(connection = id, reason = %reason, "Realtime disconnected");
}
