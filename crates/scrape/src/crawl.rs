use crate::error::{ErrorKind, Result};
use crate::{consts, parse};
use exn::ResultExt;
use reqwest::{Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How to crawl the registry.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: Url,
    pub user_agent: String,
    /// Pause after every product page, successful or not.
    pub delay: Duration,
}

impl Options {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url).or_raise(|| ErrorKind::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url: parsed,
            user_agent: consts::DEFAULT_USER_AGENT.to_string(),
            delay: Duration::from_millis(250),
        })
    }
}

/// What a crawl produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub categories: usize,
    /// Product links found across all categories.
    pub products: usize,
    pub written: usize,
    pub failed: usize,
}

/// Crawls the registry: home page → categories → product pages.
pub struct Crawler {
    client: Client,
    options: Options,
}

impl Crawler {
    pub fn new(options: Options) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self::with_client(options, client))
    }

    /// Use a preconfigured client. The user agent and timeout from `options`
    /// are not applied to it.
    pub fn with_client(options: Options, client: Client) -> Self {
        Self { client, options }
    }

    async fn get(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.or_raise(|| ErrorKind::Network(url.to_string()))
    }

    /// Every category linked from the home page.
    pub async fn categories(&self) -> Result<Vec<Url>> {
        let html = self.get(&self.options.base_url).await.or_raise(|| ErrorKind::Categories)?;
        Ok(parse::categories(&html, &self.options.base_url))
    }

    /// Fetch and parse one product page.
    pub async fn product(&self, url: &Url) -> Result<bezglutena_catalog::Product> {
        let html = self.get(url).await?;
        Ok(parse::product(&html, url, &self.options.base_url))
    }

    /// Crawl everything into `output`, one JSON record per line.
    ///
    /// The file is truncated before anything is fetched and flushed after
    /// every record, so an interrupted run leaves every finished record
    /// behind. Categories or products that fail are logged and skipped; only
    /// failing to load the category index aborts the run.
    #[instrument(skip(self, output), fields(base_url = %self.options.base_url, output = %output.as_ref().display()))]
    pub async fn run(&self, output: impl AsRef<Path>) -> Result<Report> {
        let output = output.as_ref();
        let mut file = File::create(output).await.or_raise(|| ErrorKind::Output(output.to_path_buf()))?;
        let categories = self.categories().await?;
        tracing::info!(count = categories.len(), "Found categories");

        let mut report = Report {
            categories: categories.len(),
            ..Report::default()
        };
        for category in &categories {
            let links = match self.get(category).await {
                Ok(html) => parse::product_links(&html, &self.options.base_url),
                Err(err) => {
                    tracing::warn!(url = %category, error = ?err, "Skipping category");
                    continue;
                },
            };
            tracing::info!(url = %category, products = links.len(), "Scanning category");
            report.products += links.len();

            for link in &links {
                match self.product(link).await {
                    Ok(product) => {
                        let mut line = serde_json::to_vec(&product).or_raise(|| ErrorKind::Output(output.to_path_buf()))?;
                        line.push(b'\n');
                        file.write_all(&line).await.or_raise(|| ErrorKind::Output(output.to_path_buf()))?;
                        file.flush().await.or_raise(|| ErrorKind::Output(output.to_path_buf()))?;
                        report.written += 1;
                        tracing::debug!(url = %link, "Wrote product");
                    },
                    Err(err) => {
                        tracing::warn!(url = %link, error = ?err, "Error parsing product");
                        report.failed += 1;
                    },
                }
                if !self.options.delay.is_zero() {
                    tokio::time::sleep(self.options.delay).await;
                }
            }
        }
        tracing::info!(written = report.written, failed = report.failed, "Crawl complete");
        Ok(report)
    }
}
