//! Asynchronous GeoJSON sources.
//!
//! A fetch never fails towards the map: errors are logged and reported as
//! "no data", which leaves the previously drawn map in place.

use crate::data::geojson::GeoJson;
use crate::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared HTTP client for URL sources
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent("geomap/0.1.0")
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

#[async_trait]
pub trait GeoJsonSource: Send + Sync + fmt::Debug {
    /// Loads and parses the document
    async fn load(&self) -> Result<GeoJson>;

    /// Short human readable origin, used in log messages
    fn describe(&self) -> String;

    /// Loads the document, logging and swallowing any failure
    async fn fetch(&self) -> Option<GeoJson> {
        match self.load().await {
            Ok(geojson) => {
                log::debug!(
                    "loaded {} features from {}",
                    geojson.features().len(),
                    self.describe()
                );
                Some(geojson)
            }
            Err(e) => {
                log::warn!("failed to load GeoJSON from {}: {}", self.describe(), e);
                None
            }
        }
    }
}

/// In-memory GeoJSON text
#[derive(Debug, Clone)]
pub struct StrSource {
    json: Arc<str>,
}

impl StrSource {
    pub fn new(json: impl Into<Arc<str>>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl GeoJsonSource for StrSource {
    async fn load(&self) -> Result<GeoJson> {
        GeoJson::parse(&self.json)
    }

    fn describe(&self) -> String {
        format!("inline document ({} bytes)", self.json.len())
    }
}

/// GeoJSON file on the local file system
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl GeoJsonSource for FileSource {
    async fn load(&self) -> Result<GeoJson> {
        #[cfg(feature = "tokio-runtime")]
        let text = tokio::fs::read_to_string(&self.path).await?;

        #[cfg(not(feature = "tokio-runtime"))]
        let text = std::fs::read_to_string(&self.path)?;

        GeoJson::parse(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// GeoJSON fetched over HTTP(S)
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
}

impl UrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl GeoJsonSource for UrlSource {
    async fn load(&self) -> Result<GeoJson> {
        let response = HTTP_CLIENT.get(&self.url).send().await?.error_for_status()?;
        let text = response.text().await?;
        GeoJson::parse(&text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Tries each source in order and returns the first document found
#[derive(Debug, Default)]
pub struct FallbackSource {
    sources: Vec<Box<dyn GeoJsonSource>>,
}

impl FallbackSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl GeoJsonSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn GeoJsonSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl GeoJsonSource for FallbackSource {
    async fn load(&self) -> Result<GeoJson> {
        let mut last_error = None;
        for source in &self.sources {
            match source.load().await {
                Ok(geojson) => return Ok(geojson),
                Err(e) => {
                    log::debug!("{} unavailable, trying next source: {}", source.describe(), e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| crate::Error::Config("no GeoJSON sources configured".into())))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        format!("[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature",
        "properties":{"adcode":1},
        "geometry":{"type":"Polygon","coordinates":[[[100,30],[101,30],[101,31],[100,31],[100,30]]]}}]}"#;

    #[tokio::test]
    async fn test_str_source() {
        let geojson = StrSource::new(SQUARE).fetch().await.unwrap();
        assert_eq!(geojson.features().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_source_is_no_data() {
        assert!(StrSource::new("{ not json").fetch().await.is_none());
        assert!(FileSource::new("/definitely/not/here.json").fetch().await.is_none());
    }

    #[tokio::test]
    async fn test_fallback_takes_first_available() {
        let source = FallbackSource::new()
            .with(FileSource::new("/definitely/not/here.json"))
            .with(StrSource::new(SQUARE));
        assert_eq!(source.len(), 2);
        let geojson = source.fetch().await.unwrap();
        assert_eq!(geojson.features().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_fallback() {
        let source = FallbackSource::new();
        assert!(source.is_empty());
        assert!(matches!(source.load().await, Err(crate::Error::Config(_))));
        assert!(source.fetch().await.is_none());
    }
}
