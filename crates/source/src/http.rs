//! HTTP dataset source.

use crate::DatasetSource;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Client, Url};
use tracing::instrument;

/// Where the published catalog lives.
pub const DEFAULT_DATASET_URL: &str =
    "https://darjancrncic.github.io/registar-bezglutenskih-proizvoda-scraper/gluten_free_products.jsonl";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches the dataset with a single `GET` request.
///
/// No timeout is configured beyond the client's defaults.
#[derive(Clone)]
pub struct HttpSource {
    url: Url,
    name: String,
    client: Client,
}

impl HttpSource {
    /// Create a source for `url` with a default client.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build().or_raise(|| ErrorKind::Client)?;
        Self::with_client(url, client)
    }

    /// Create a source for `url` that sends requests through `client`.
    pub fn with_client(url: impl AsRef<str>, client: Client) -> Result<Self> {
        let url = url.as_ref();
        let url = Url::parse(url).or_raise(|| ErrorKind::InvalidUrl(url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            name: url.to_string(),
            url,
            client,
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .or_raise(|| ErrorKind::Network(self.name.clone()))?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Dataset request was not successful");
            exn::bail!(ErrorKind::Fetch(status.as_u16()));
        }
        let body = response.text().await.or_raise(|| ErrorKind::Network(self.name.clone()))?;
        tracing::debug!(bytes = body.len(), "Fetched dataset");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/x-ndjson\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/gluten_free_products.jsonl")
    }

    /// Local test servers must not be routed through whatever proxy the
    /// environment has configured.
    fn source(url: impl AsRef<str>) -> HttpSource {
        HttpSource::with_client(url, Client::builder().no_proxy().build().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let url = serve_once("200 OK", "{\"EAN\":\"123\"}\n").await;
        let source = source(&url);
        assert_eq!(source.fetch().await.unwrap(), "{\"EAN\":\"123\"}\n");
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let url = serve_once("200 OK", "").await;
        let source = source(&url);
        assert_eq!(source.fetch().await.unwrap(), "");
    }

    #[rstest]
    #[case("404 Not Found", 404)]
    #[case("500 Internal Server Error", 500)]
    #[case("403 Forbidden", 403)]
    #[tokio::test]
    async fn test_fetch_status(#[case] status: &'static str, #[case] expected: u16) {
        let url = serve_once(status, "").await;
        let source = source(&url);
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Fetch(code) if *code == expected));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = source(format!("http://{addr}/data.jsonl"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        assert!(err.is_retryable());
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://example.org/data.jsonl")]
    fn test_invalid_url(#[case] url: &str) {
        let err = HttpSource::new(url).err().unwrap();
        assert!(matches!(&*err, ErrorKind::InvalidUrl(_)));
    }
}
