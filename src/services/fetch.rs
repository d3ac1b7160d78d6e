/// Image fetching: turns a URL into an image that can be embedded in a card

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine as _;

use crate::{Error, Result};

/// An image ready to be embedded in a document, as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage(String);

impl EmbeddedImage {
    /// Encode raw bytes of the given MIME type.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        EmbeddedImage(format!("data:{};base64,{}", mime, b64))
    }

    /// Wrap an existing data URL.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        EmbeddedImage(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolves image references to embeddable images.
///
/// Implementations own their timeout and retry policy; the renderer waits for
/// every fetch of a post before rendering it.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<EmbeddedImage>;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout per image request in milliseconds
    pub timeout_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("linkcard/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 15000,
        }
    }
}

/// Fetches images over HTTP(S) and inlines them as base64.
#[cfg(feature = "http")]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpImageFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<EmbeddedImage> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::NetworkError(format!("HTTP GET failed: {}", e)))?;

        let mime = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let body = res
            .bytes()
            .await
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;

        log::debug!("fetched {} ({} bytes, {})", url, body.len(), mime);
        Ok(EmbeddedImage::from_bytes(&mime, &body))
    }
}

/// In-memory fetcher for offline rendering and tests.
///
/// Unknown URLs fail like a 404 would.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    images: HashMap<String, EmbeddedImage>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, image: EmbeddedImage) {
        self.images.insert(url.into(), image);
    }

    pub fn with(mut self, url: impl Into<String>, image: EmbeddedImage) -> Self {
        self.insert(url, image);
        self
    }
}

#[async_trait]
impl ImageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<EmbeddedImage> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| Error::NetworkError(format!("no image registered for {}", url)))
    }
}
