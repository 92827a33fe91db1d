//! Remote suggestion service client

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info};

use crate::{ColorSuggester, SuggestError, SuggestionRequest, parse_response};

/// Suggestion client that talks to a WebSocket server
///
/// One connection per request: send the request as a text frame, read the
/// first text reply.
#[derive(Debug, Clone)]
pub struct RemoteSuggester {
    server_url: String,
}

impl RemoteSuggester {
    pub fn new(server_url: String) -> Self {
        Self { server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl ColorSuggester for RemoteSuggester {
    async fn suggest(&self, drawing_data_uri: String) -> Result<Vec<String>, SuggestError> {
        let (ws_stream, _) = connect_async(self.server_url.as_str())
            .await
            .map_err(|e| SuggestError::Connection(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        let request_json = serde_json::to_string(&SuggestionRequest::new(drawing_data_uri))
            .map_err(|e| SuggestError::InvalidResponse(e.to_string()))?;
        debug!("Sending suggestion request ({} bytes)", request_json.len());

        write
            .send(Message::Text(request_json.into()))
            .await
            .map_err(|e| SuggestError::Connection(e.to_string()))?;

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let colors = parse_response(&text)?;
                    info!("Received {} suggested colors", colors.len());
                    // Best effort; the reply is already in hand
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(colors);
                }
                Ok(Message::Close(_)) => break,
                Err(e) => return Err(SuggestError::Connection(e.to_string())),
                _ => {}
            }
        }

        Err(SuggestError::InvalidResponse(
            "Connection closed without a reply".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Serve a single connection, answering the first text frame with `reply`
    async fn serve_once(reply: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Text(text) = msg {
                    let request: SuggestionRequest = serde_json::from_str(&text).unwrap();
                    assert!(request.drawing_data_uri.starts_with("data:"));
                    ws.send(Message::Text(reply.into())).await.unwrap();
                    break;
                }
            }
        });

        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn test_remote_round_trip() {
        let url = serve_once(r##"{"suggested_colors":["#112233","nope","#ABC"]}"##).await;
        let suggester = RemoteSuggester::new(url);

        let colors = suggester
            .suggest("data:image/jpeg;base64,AAAA".to_string())
            .await
            .unwrap();

        assert_eq!(colors, vec!["#112233".to_string(), "#ABC".to_string()]);
    }

    #[tokio::test]
    async fn test_remote_service_error() {
        let url = serve_once(r#"{"error":"SAFETY: blocked"}"#).await;
        let suggester = RemoteSuggester::new(url);

        let result = suggester.suggest("data:image/jpeg;base64,AAAA".to_string()).await;
        assert!(matches!(result, Err(SuggestError::ContentSafety(_))));
    }

    #[tokio::test]
    async fn test_remote_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let suggester = RemoteSuggester::new(format!("ws://{addr}"));
        let result = suggester.suggest("data:,".to_string()).await;
        assert!(matches!(result, Err(SuggestError::Connection(_))));
    }
}
