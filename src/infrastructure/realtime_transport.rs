// Realtime transport seam and its WebSocket implementation
use crate::domain::collaboration::EventFrame;
use crate::error::RealtimeError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// An open bidirectional frame channel.
#[async_trait]
pub trait FrameChannel: Send {
    async fn send(&mut self, frame: EventFrame) -> Result<(), RealtimeError>;

    /// Next inbound frame; `None` once the peer has closed the channel.
    /// Must be cancel-safe, the connection driver polls it inside `select!`.
    async fn recv(&mut self) -> Option<Result<EventFrame, RealtimeError>>;

    async fn close(&mut self);
}

#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    async fn open(&self) -> Result<Box<dyn FrameChannel>, RealtimeError>;
}

/// JSON-over-WebSocket transport. Frames travel as text messages of the form
/// `{"event": ..., "data": ...}`.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
    session_cookie: Option<String>,
    credential: Option<String>,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_cookie: None,
            credential: None,
        }
    }

    /// Session cookie sent on the upgrade request.
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie;
        self
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RealtimeError> {
    HeaderValue::from_str(value).map_err(|e| RealtimeError::Connect(format!("invalid header: {e}")))
}

#[async_trait]
impl RealtimeTransport for WebSocketTransport {
    async fn open(&self) -> Result<Box<dyn FrameChannel>, RealtimeError> {
        if !self.url.starts_with("ws://") && !self.url.starts_with("wss://") {
            return Err(RealtimeError::Connect(format!(
                "invalid realtime URL: {}, must start with ws:// or wss://",
                self.url
            )));
        }

        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;
        if let Some(cookie) = &self.session_cookie {
            request.headers_mut().insert(header::COOKIE, header_value(cookie)?);
        }
        if let Some(credential) = &self.credential {
            request
                .headers_mut()
                .insert(header::AUTHORIZATION, header_value(&format!("Bearer {credential}"))?);
        }

        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;

        Ok(Box::new(WebSocketChannel { ws }))
    }
}

struct WebSocketChannel {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameChannel for WebSocketChannel {
    async fn send(&mut self, frame: EventFrame) -> Result<(), RealtimeError> {
        let json = serde_json::to_string(&frame)?;
        self.ws
            .send(Message::Text(json))
            .await
            .map_err(|e| RealtimeError::Closed(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<EventFrame, RealtimeError>> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Some(serde_json::from_str(&text).map_err(RealtimeError::from));
                }
                Some(Ok(Message::Close(_))) | None => return None,
                // Ping/pong are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Some(Err(RealtimeError::Closed(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.ws.close(None).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_websocket_url() {
        let transport = WebSocketTransport::new("http://localhost:3001");
        let err = transport.open().await.err().unwrap();
        assert!(matches!(err, RealtimeError::Connect(_)));
    }

    #[tokio::test]
    async fn test_rejects_invalid_cookie_header() {
        let transport = WebSocketTransport::new("ws://localhost:1/ws")
            .with_session_cookie(Some("bad\nvalue".to_string()));
        let err = transport.open().await.err().unwrap();
        assert!(err.to_string().contains("invalid header"));
    }
}
