//! HttpChatGateway -- concrete [`ChatGateway`] over HTTP.
//!
//! Posts the JSON request body to `{base_url}/chat` and decodes the JSON
//! reply. Error mapping:
//! - connection / timeout failures -> [`GatewayError::Transport`]
//! - non-2xx status -> [`GatewayError::Status`]
//! - unparsable body -> [`GatewayError::InvalidResponse`]

use std::time::Duration;

use madchat_core::chat::gateway::ChatGateway;
use madchat_types::config::ClientConfig;
use madchat_types::error::GatewayError;
use madchat_types::gateway::{ChatRequest, ChatResponse};

/// reqwest-backed chat gateway.
#[derive(Debug, Clone)]
pub struct HttpChatGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatGateway {
    /// Create a gateway for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        Self::new(
            &config.gateway_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatGateway for HttpChatGateway {
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Gateway returned an error status");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        serde_json::from_slice::<ChatResponse>(&bytes)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a random local port.
    ///
    /// Returns the base URL and a handle yielding the raw request body.
    async fn serve_once(
        status_line: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            concat!(
                "HTTP/1.1 {status_line}\r\n",
                "content-type: application/json\r\n",
                "content-length: {}\r\n",
                "connection: close\r\n\r\n{body}",
            ),
            body.len(),
            status_line = status_line,
            body = body,
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request_body = read_request_body(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request_body
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return text[header_end + 4..].to_string();
                }
            }
        }
        String::new()
    }

    fn request() -> ChatRequest {
        serde_json::from_value(serde_json::json!({
            "message_content": "hello",
            "anger_level": 10,
            "glitch_level": 0.0
        }))
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_chat_path() {
        let gw = HttpChatGateway::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(gw.endpoint(), "http://localhost:8000/chat");

        let gw = HttpChatGateway::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(gw.endpoint(), "http://localhost:8000/chat");
    }

    #[tokio::test]
    async fn test_success_decodes_response() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"conversation_id":"c-9","response":"Ugh.","user_message":"hello"}"#,
        )
        .await;
        let gw = HttpChatGateway::new(&url, Duration::from_secs(5)).unwrap();

        let resp = gw.send(&request()).await.unwrap();
        assert_eq!(resp.conversation_id, "c-9");
        assert_eq!(resp.response, "Ugh.");

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["message_content"], "hello");
        assert_eq!(sent["anger_level"], 10);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_status() {
        let (url, _server) = serve_once("502 Bad Gateway", r#"{"error":"upstream"}"#).await;
        let gw = HttpChatGateway::new(&url, Duration::from_secs(5)).unwrap();

        match gw.send(&request()).await {
            Err(GatewayError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.contains("upstream"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_body_maps_to_invalid_response() {
        let (url, _server) = serve_once("200 OK", "not json").await;
        let gw = HttpChatGateway::new(&url, Duration::from_secs(5)).unwrap();

        let err = gw.send(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_transport() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gw = HttpChatGateway::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let err = gw.send(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
