//! HTTP client for the platform API.
//!
//! Fetches the documents attached to a record and the org base URL, and
//! pushes each result into the host event channel.

use crate::documents::AttachedDocument;
use crate::host::HostEvent;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use tokio::sync::mpsc;

/// Client for the platform REST endpoints.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl PlatformClient {
    pub fn new(api_url: String, token: Option<String>) -> Self {
        Self::with_client(Client::new(), api_url, token)
    }

    pub fn with_client(client: Client, api_url: String, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// URL of the attached documents listing for a record.
    pub fn documents_url(&self, record_id: &str) -> String {
        format!(
            "{}/attached-documents?recordId={}",
            self.api_url,
            urlencoding::encode(record_id)
        )
    }

    pub fn base_url_url(&self) -> String {
        format!("{}/base-url", self.api_url)
    }

    fn get(&self, url: String) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Documents attached to `record_id`, in display order.
    pub async fn attached_documents(&self, record_id: &str) -> Result<Vec<AttachedDocument>> {
        let url = self.documents_url(record_id);
        tracing::debug!("Fetching attached documents: {}", url);

        let res = self
            .get(url)
            .send()
            .await
            .context("Failed to send request")?
            .error_for_status()
            .context("Server returned error")?;
        let documents: Vec<AttachedDocument> =
            res.json().await.context("Failed to parse attached documents")?;
        Ok(documents)
    }

    /// The org base URL, `None` when the platform has none.
    pub async fn base_url(&self) -> Result<Option<String>> {
        let res = self
            .get(self.base_url_url())
            .send()
            .await
            .context("Failed to send request")?
            .error_for_status()
            .context("Server returned error")?;
        let base_url: Option<String> = res.json().await.context("Failed to parse base url")?;
        Ok(base_url)
    }
}

/// Fetch attached documents in the background and push the outcome.
pub fn spawn_documents_fetch(
    client: PlatformClient,
    record_id: String,
    event_tx: mpsc::Sender<HostEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = client
            .attached_documents(&record_id)
            .await
            .map_err(|e| format!("{:#}", e));
        if event_tx.send(HostEvent::Documents(result)).await.is_err() {
            tracing::debug!("Host event channel closed, dropping documents result");
        }
    })
}

/// Fetch the org base URL in the background and push it.
///
/// A failure is only logged; the viewer keeps building relative URLs.
pub fn spawn_base_url_fetch(
    client: PlatformClient,
    event_tx: mpsc::Sender<HostEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match client.base_url().await {
            Ok(base_url) => {
                if event_tx.send(HostEvent::BaseUrl(base_url)).await.is_err() {
                    tracing::debug!("Host event channel closed, dropping base url");
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch base url: {:#}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/", addr), handle)
    }

    fn local_client(api: String, token: Option<String>) -> PlatformClient {
        let client = Client::builder().no_proxy().build().expect("build client");
        PlatformClient::with_client(client, api, token)
    }

    #[test]
    fn builds_endpoint_urls() {
        let client = PlatformClient::new("https://api.example.com/".into(), None);
        assert_eq!(
            client.documents_url("001 A&B"),
            "https://api.example.com/attached-documents?recordId=001%20A%26B"
        );
        assert_eq!(client.base_url_url(), "https://api.example.com/base-url");
    }

    #[tokio::test]
    async fn fetches_attached_documents() {
        let (api, server) = serve_once(
            "200 OK",
            r#"[{"ContentDocumentId":"069A","ContentDocument":{"Id":"069A","Title":"Intro","Description":"First"}}]"#,
        )
        .await;

        let client = local_client(api, Some("secret".into()));
        let docs = client.attached_documents("001X").await.expect("fetch");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content_document.id, "069A");

        let request = server.await.expect("join");
        assert!(request.starts_with("GET /attached-documents?recordId=001X "));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let (api, _server) = serve_once("500 Internal Server Error", "{}").await;
        let client = local_client(api, None);
        assert!(client.attached_documents("001X").await.is_err());
    }

    #[tokio::test]
    async fn null_base_url_is_none() {
        let (api, _server) = serve_once("200 OK", "null").await;
        let client = local_client(api, None);
        assert_eq!(client.base_url().await.expect("fetch"), None);
    }

    #[tokio::test]
    async fn spawned_fetch_pushes_error_event() {
        let (api, _server) = serve_once("404 Not Found", "{}").await;
        let (tx, mut rx) = mpsc::channel(1);
        spawn_documents_fetch(local_client(api, None), "001X".into(), tx);

        match rx.recv().await {
            Some(HostEvent::Documents(Err(message))) => {
                assert!(message.contains("Server returned error"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_channel_does_not_fail_the_task() {
        let (api, _server) = serve_once("200 OK", "null").await;
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let handle = spawn_base_url_fetch(local_client(api, None), tx);
        assert!(handle.await.is_ok());
    }
}
