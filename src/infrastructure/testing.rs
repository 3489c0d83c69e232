// In-memory transports shared by unit tests
use crate::domain::collaboration::EventFrame;
use crate::error::{ApiError, RealtimeError};
use crate::infrastructure::http_transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::infrastructure::realtime_transport::{FrameChannel, RealtimeTransport};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::mpsc;

struct Route {
    method: Method,
    path: String,
    response: HttpResponse,
}

/// Records every request and answers from a route table, falling back to a
/// fixed response.
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    fallback: Result<HttpResponse, ApiError>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        body: body.to_string(),
    }
}

impl FakeTransport {
    pub fn always(status: u16, status_text: &str, body: &str) -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            fallback: Ok(response(status, status_text, body)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable(message: &str) -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
            fallback: Err(ApiError::Transport(message.to_string())),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answer `method` requests whose URL ends with `path`.
    pub fn on(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            response: response(status, "", &body.to_string()),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let routed = self
            .routes
            .lock()
            .iter()
            .find(|r| r.method == request.method && request.url.ends_with(&r.path))
            .map(|r| r.response.clone());
        self.requests.lock().push(request);
        match routed {
            Some(response) => Ok(response),
            None => self.fallback.clone(),
        }
    }
}

/// Test end of an in-memory realtime channel.
pub struct FakePeer {
    /// Frames the client sent.
    pub sent: mpsc::UnboundedReceiver<EventFrame>,
    /// Push frames to the client.
    pub inbound: mpsc::UnboundedSender<EventFrame>,
}

struct FakeChannel {
    sent: mpsc::UnboundedSender<EventFrame>,
    inbound: mpsc::UnboundedReceiver<EventFrame>,
}

#[async_trait]
impl FrameChannel for FakeChannel {
    async fn send(&mut self, frame: EventFrame) -> Result<(), RealtimeError> {
        self.sent
            .send(frame)
            .map_err(|_| RealtimeError::Closed("peer dropped".to_string()))
    }

    async fn recv(&mut self) -> Option<Result<EventFrame, RealtimeError>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.inbound.close();
    }
}

/// Hands out in-memory channels and keeps the peer ends for assertions.
#[derive(Default)]
pub struct FakeRealtimeTransport {
    peers: Mutex<Vec<FakePeer>>,
    opened: Mutex<usize>,
}

impl FakeRealtimeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened(&self) -> usize {
        *self.opened.lock()
    }

    /// Take the peer end of the oldest connection not yet taken.
    pub fn take_peer(&self) -> Option<FakePeer> {
        let mut peers = self.peers.lock();
        if peers.is_empty() {
            None
        } else {
            Some(peers.remove(0))
        }
    }
}

#[async_trait]
impl RealtimeTransport for FakeRealtimeTransport {
    async fn open(&self) -> Result<Box<dyn FrameChannel>, RealtimeError> {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        self.peers.lock().push(FakePeer {
            sent: sent_rx,
            inbound: inbound_tx,
        });
        *self.opened.lock() += 1;
        Ok(Box::new(FakeChannel {
            sent: sent_tx,
            inbound: inbound_rx,
        }))
    }
}
