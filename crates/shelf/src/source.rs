//! Data source adapter: one fetch of the full catalog.

use crate::catalog::Catalog;
use futures::future::BoxFuture;
use tracing::debug;

/// Default API endpoint serving the catalog as a JSON array.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/software";

/// Why the catalog could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can produce the full catalog.
///
/// The returned future owns everything it needs, so the runtime can spawn it
/// and deliver the result back to the view as a message.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch(&self) -> BoxFuture<'static, Result<Catalog, FetchError>>;
}

/// Fetches the catalog with a single GET request.
///
/// No retries and no timeout beyond what the client itself applies.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    /// Fetch from `endpoint` with a default client.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Fetch through a caller-configured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Catalog, FetchError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            debug!(%endpoint, "requesting catalog");
            let response = client.get(&endpoint).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            let body = response.bytes().await?;
            Ok(Catalog::from_json(&body)?)
        })
    }
}

/// Serves a fixed catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    catalog: Catalog,
}

impl StaticSource {
    /// Always resolves to a copy of `catalog`.
    pub fn new(catalog: impl Into<Catalog>) -> Self {
        Self {
            catalog: catalog.into(),
        }
    }
}

impl CatalogSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Catalog, FetchError>> {
        let catalog = self.catalog.clone();
        Box::pin(async move { Ok(catalog) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a local port and return its URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/api/software")
    }

    #[tokio::test]
    async fn fetches_and_decodes_catalog() {
        let url = serve_once(
            "200 OK",
            r#"[{"id":1,"name":"Zoom","tagline":"video calls","categories":[{"id":10,"name":"Free","type":"cost"}]}]"#,
        )
        .await;

        let catalog = HttpSource::new(url).fetch().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.items()[0].name, "Zoom");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let url = serve_once("503 Service Unavailable", "[]").await;
        let err = HttpSource::new(url).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let url = serve_once("200 OK", "<html>login</html>").await;
        let err = HttpSource::new(url).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpSource::new(format!("http://{addr}/api/software"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn static_source_serves_its_catalog() {
        let catalog = Catalog::from_json(br#"[{"id":1,"name":"Zoom"}]"#).unwrap();
        let fetched = StaticSource::new(catalog.clone()).fetch().await.unwrap();
        assert_eq!(fetched, catalog);
    }
}
