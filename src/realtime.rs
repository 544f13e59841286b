//! Realtime subscription for attachment changes.
//!
//! Connects to the platform WebSocket API and asks the host to fetch the
//! document list again whenever an attachment of the record changes.

use crate::host::HostEvent;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::HeaderValue, Message},
};
use url::Url;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Realtime message as sent by the platform.
#[derive(Debug, Deserialize)]
struct RealtimeMessage {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    record: Option<serde_json::Value>,
}

/// Subscription to attachment changes of one record.
pub struct RealtimeManager {
    api_url: String,
    record_id: String,
    event_tx: mpsc::Sender<HostEvent>,
}

impl RealtimeManager {
    pub fn new(api_url: String, record_id: String, event_tx: mpsc::Sender<HostEvent>) -> Self {
        Self {
            api_url,
            record_id,
            event_tx,
        }
    }

    /// Build the WebSocket URL.
    fn ws_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_url).context("Invalid platform API URL")?;

        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| anyhow::anyhow!("Failed to set WebSocket scheme"))?;

        let path = format!("{}/realtime", url.path().trim_end_matches('/'));
        url.set_path(&path);

        Ok(url)
    }

    /// Subscription topic for the record's attachments.
    fn build_subscription(&self) -> String {
        format!("attached-documents?filter=recordId='{}'", self.record_id)
    }

    /// Start the realtime connection loop. Returns once the host stops listening.
    pub async fn run(&self, token: Option<String>) {
        loop {
            tracing::info!("Connecting to platform realtime...");

            match self.connect_and_subscribe(token.as_deref()).await {
                Ok(()) => {
                    tracing::warn!("Realtime connection closed, reconnecting in 5s...");
                }
                Err(e) => {
                    tracing::error!("Realtime connection error: {:#}, reconnecting in 5s...", e);
                }
            }

            if self.event_tx.is_closed() {
                tracing::debug!("Host event channel closed, stopping realtime");
                return;
            }

            sleep(RECONNECT_DELAY).await;
        }
    }

    async fn connect_and_subscribe(&self, token: Option<&str>) -> Result<()> {
        let url = self.ws_url()?;
        tracing::debug!("Connecting to: {}", url);

        let mut request = url.to_string().into_client_request()?;
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Invalid token for Authorization header")?;
            request.headers_mut().insert("Authorization", value);
        }

        let (ws_stream, _response) = connect_async(request)
            .await
            .context("Failed to connect to WebSocket")?;

        let (mut write, mut read) = ws_stream.split();

        // The server greets with our client id before accepting subscriptions.
        let client_id = loop {
            let Some(msg) = read.next().await else {
                return Ok(());
            };
            let msg = msg.context("Failed to receive message")?;
            if let Message::Text(text) = msg {
                if let Some(id) = parse_client_id(&text) {
                    break id;
                }
            }
        };

        tracing::debug!("Got client ID: {}", client_id);

        let subscribe_msg = serde_json::json!({
            "clientId": client_id,
            "subscriptions": [self.build_subscription()]
        });
        write
            .send(Message::Text(subscribe_msg.to_string()))
            .await
            .context("Failed to send subscription")?;

        tracing::info!("Realtime connected and subscribed for {}", self.record_id);

        while let Some(msg) = read.next().await {
            let msg = msg.context("Failed to receive message")?;

            match msg {
                Message::Text(text) => {
                    if let Some(event) = self.handle_message(&text) {
                        if self.event_tx.send(event).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Message::Ping(data) => {
                    write
                        .send(Message::Pong(data))
                        .await
                        .context("Failed to send pong")?;
                }
                Message::Close(_) => {
                    tracing::info!("WebSocket closed by server");
                    break;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Map an incoming message to a host event, if it concerns our record.
    fn handle_message(&self, text: &str) -> Option<HostEvent> {
        let msg: RealtimeMessage = match serde_json::from_str(text) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Failed to parse realtime message: {} - {}", e, text);
                return None;
            }
        };

        let action = msg.action?;
        if !matches!(action.as_str(), "create" | "update" | "delete") {
            return None;
        }

        let record = msg.record?;
        if !self.matches_record(&record) {
            return None;
        }

        tracing::debug!("Attachment {} for {}", action, self.record_id);
        Some(HostEvent::RefreshRequested)
    }

    /// Whether a link record belongs to the subscribed record.
    fn matches_record(&self, record: &serde_json::Value) -> bool {
        ["recordId", "LinkedEntityId"]
            .iter()
            .filter_map(|key| record.get(*key).and_then(|v| v.as_str()))
            .any(|id| id == self.record_id)
    }
}

fn parse_client_id(text: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(text).ok()?;
    json.get("clientId")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Spawn the realtime manager as a background task.
pub fn spawn_realtime(
    api_url: String,
    record_id: String,
    token: Option<String>,
    event_tx: mpsc::Sender<HostEvent>,
) -> tokio::task::JoinHandle<()> {
    let manager = RealtimeManager::new(api_url, record_id, event_tx);

    tokio::spawn(async move {
        manager.run(token).await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(api_url: &str) -> RealtimeManager {
        let (tx, _rx) = mpsc::channel(1);
        RealtimeManager::new(api_url.to_string(), "001X".to_string(), tx)
    }

    #[test]
    fn ws_url_switches_scheme() {
        let url = manager("https://api.example.com").ws_url().expect("url");
        assert_eq!(url.as_str(), "wss://api.example.com/realtime");

        let url = manager("http://localhost:8090/api/").ws_url().expect("url");
        assert_eq!(url.as_str(), "ws://localhost:8090/api/realtime");
    }

    #[test]
    fn invalid_api_url_is_error() {
        assert!(manager("not a url").ws_url().is_err());
    }

    #[test]
    fn subscription_filters_by_record() {
        assert_eq!(
            manager("http://localhost").build_subscription(),
            "attached-documents?filter=recordId='001X'"
        );
    }

    #[test]
    fn change_for_our_record_requests_refresh() {
        let m = manager("http://localhost");
        for action in ["create", "update", "delete"] {
            let text = format!(r#"{{"action":"{}","record":{{"recordId":"001X"}}}}"#, action);
            assert!(matches!(
                m.handle_message(&text),
                Some(HostEvent::RefreshRequested)
            ));
        }

        let text = r#"{"action":"update","record":{"LinkedEntityId":"001X"}}"#;
        assert!(m.handle_message(text).is_some());
    }

    #[test]
    fn unrelated_messages_are_ignored() {
        let m = manager("http://localhost");
        assert!(m
            .handle_message(r#"{"action":"update","record":{"recordId":"001Y"}}"#)
            .is_none());
        assert!(m
            .handle_message(r#"{"action":"touch","record":{"recordId":"001X"}}"#)
            .is_none());
        assert!(m.handle_message(r#"{"clientId":"abc"}"#).is_none());
        assert!(m.handle_message("not json").is_none());
    }

    #[test]
    fn reads_client_id() {
        assert_eq!(parse_client_id(r#"{"clientId":"abc"}"#).as_deref(), Some("abc"));
        assert_eq!(parse_client_id(r#"{"other":1}"#), None);
    }
}
