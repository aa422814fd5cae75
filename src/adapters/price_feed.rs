use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;

/// Where the price feed text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    Url(String),
    File(PathBuf),
}

impl PriceSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            PriceSource::Url(raw.to_string())
        } else {
            PriceSource::File(PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw)))
        }
    }
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::Url(url) => write!(f, "{}", url),
            PriceSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches raw price feed text
pub struct PriceFeedClient {
    http: Client,
}

impl PriceFeedClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub async fn fetch(&self, source: &PriceSource) -> Result<String> {
        debug!("Fetching prices from {}", source);
        let text = match source {
            PriceSource::Url(url) => {
                self.http
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            PriceSource::File(path) => tokio::fs::read_to_string(path).await?,
        };
        info!("Fetched {} bytes of price data from {}", text.len(), source);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            PriceSource::parse("http://doc-x.net/hex/all_prices.txt"),
            PriceSource::Url("http://doc-x.net/hex/all_prices.txt".into())
        );
        assert_eq!(
            PriceSource::parse("file:///tmp/prices.txt"),
            PriceSource::File(PathBuf::from("/tmp/prices.txt"))
        );
        assert_eq!(
            PriceSource::parse(" prices.txt "),
            PriceSource::File(PathBuf::from("prices.txt"))
        );
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.txt");
        std::fs::write(&path, "Burn ... 0 PLATINUM ... 12 GOLD\n").unwrap();

        let client = PriceFeedClient::new(Duration::from_secs(5)).unwrap();
        let text = client.fetch(&PriceSource::File(path)).await.unwrap();
        assert!(text.starts_with("Burn"));
    }
}
