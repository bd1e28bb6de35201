//! Content loading: pick a strategy for a URL and turn it into documents.

pub mod transcript;
pub mod web;

use crate::config::LoaderConfig;
use crate::document::Document;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub use transcript::TranscriptLoader;
pub use web::WebLoader;

/// Marker substrings used when no configuration is supplied
pub const DEFAULT_VIDEO_MARKERS: [&str; 2] = ["youtube.com", "youtu.be"];

/// How a URL's content gets fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Fetch the caption track of a video
    Transcript,
    /// Fetch an HTML page and keep its visible text
    GenericPage,
}

impl LoadStrategy {
    /// Choose a strategy by case-insensitive substring match on the URL
    pub fn for_url<S: AsRef<str>>(url: &str, video_markers: &[S]) -> Self {
        let url = url.to_lowercase();
        let is_video = video_markers
            .iter()
            .map(|marker| marker.as_ref().to_lowercase())
            .any(|marker| !marker.is_empty() && url.contains(&marker));

        if is_video {
            LoadStrategy::Transcript
        } else {
            LoadStrategy::GenericPage
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Transcript => write!(f, "transcript"),
            LoadStrategy::GenericPage => write!(f, "web page"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadErrorKind {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("no extractable text found")]
    NoContent,
    #[error("could not find a video id in the URL")]
    NoVideoId,
    #[error("transcript unavailable: {0}")]
    Transcript(String),
}

/// A failed fetch or extraction, tagged with the URL it was for
#[derive(Error, Debug)]
#[error("failed to load {url}: {kind}")]
pub struct LoadError {
    pub url: String,
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(url: &str, kind: impl Into<LoadErrorKind>) -> Self {
        Self {
            url: url.to_string(),
            kind: kind.into(),
        }
    }
}

/// Source of documents for the summarization pipeline
#[async_trait(?Send)]
pub trait ContentLoader {
    /// The strategy this loader would use for `url`
    fn strategy(&self, url: &str) -> LoadStrategy {
        LoadStrategy::for_url(url, &DEFAULT_VIDEO_MARKERS)
    }

    /// Fetch `url` with the given strategy
    async fn load(&self, url: &str, strategy: LoadStrategy) -> Result<Vec<Document>, LoadError>;
}

/// Production loader dispatching to the web or transcript loader
pub struct Loader {
    web: WebLoader,
    transcripts: TranscriptLoader,
    video_markers: Vec<String>,
}

impl Loader {
    pub fn new(config: &LoaderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            web: WebLoader::new(config)?,
            transcripts: TranscriptLoader::new(config.transcript_languages.clone()),
            video_markers: config.video_markers.clone(),
        })
    }
}

#[async_trait(?Send)]
impl ContentLoader for Loader {
    fn strategy(&self, url: &str) -> LoadStrategy {
        LoadStrategy::for_url(url, &self.video_markers)
    }

    async fn load(&self, url: &str, strategy: LoadStrategy) -> Result<Vec<Document>, LoadError> {
        tracing::info!(%url, %strategy, "loading content");
        match strategy {
            LoadStrategy::Transcript => self.transcripts.load(url).await,
            LoadStrategy::GenericPage => self.web.load(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_links_use_transcripts() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://m.youtube.com/shorts/abcdefghijk",
            "HTTPS://WWW.YOUTUBE.COM/watch?v=x",
        ] {
            assert_eq!(
                LoadStrategy::for_url(url, &DEFAULT_VIDEO_MARKERS),
                LoadStrategy::Transcript,
                "{url}"
            );
        }
    }

    #[test]
    fn everything_else_is_a_web_page() {
        for url in [
            "https://example.com",
            "https://www.rust-lang.org/learn",
            "https://vimeo.com/12345",
            "https://youtube.co/not-quite",
        ] {
            assert_eq!(
                LoadStrategy::for_url(url, &DEFAULT_VIDEO_MARKERS),
                LoadStrategy::GenericPage,
                "{url}"
            );
        }
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let markers = vec!["vimeo.com".to_string()];
        assert_eq!(
            LoadStrategy::for_url("https://vimeo.com/1", &markers),
            LoadStrategy::Transcript
        );
        assert_eq!(
            LoadStrategy::for_url("https://youtu.be/abc", &markers),
            LoadStrategy::GenericPage
        );
        let empty: Vec<String> = vec![String::new()];
        assert_eq!(
            LoadStrategy::for_url("https://youtu.be/abc", &empty),
            LoadStrategy::GenericPage
        );
    }

    fn loader_with_markers(markers: &[&str]) -> Loader {
        let config = LoaderConfig {
            video_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..LoaderConfig::default()
        };
        Loader::new(&config).unwrap()
    }

    #[tokio::test]
    async fn page_urls_go_through_the_web_loader() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/post")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head><title>Post</title></head><body><p>Body text.</p></body></html>")
            .create_async()
            .await;

        let loader = Loader::new(&LoaderConfig::default()).unwrap();
        let url = format!("{}/post", server.url());
        let strategy = loader.strategy(&url);
        assert_eq!(strategy, LoadStrategy::GenericPage);

        let documents = loader.load(&url, strategy).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "Body text.");
        assert_eq!(documents[0].title.as_deref(), Some("Post"));
        assert_eq!(documents[0].source.as_deref(), Some(url.as_str()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn video_urls_go_through_the_transcript_loader() {
        let loader = Loader::new(&LoaderConfig::default()).unwrap();
        let url = "https://www.youtube.com/feed/trending";
        let strategy = loader.strategy(url);
        assert_eq!(strategy, LoadStrategy::Transcript);

        let err = loader.load(url, strategy).await.unwrap_err();
        assert_eq!(err.url, url);
        assert!(matches!(err.kind, LoadErrorKind::NoVideoId));
    }

    #[test]
    fn configured_markers_drive_the_loader_strategy() {
        let loader = loader_with_markers(&["vimeo.com"]);
        assert_eq!(
            loader.strategy("https://vimeo.com/76979871"),
            LoadStrategy::Transcript
        );
        assert_eq!(
            loader.strategy("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            LoadStrategy::GenericPage
        );
    }

    #[test]
    fn load_error_names_the_url() {
        let err = LoadError::new("https://example.com", LoadErrorKind::NoContent);
        assert_eq!(
            err.to_string(),
            "failed to load https://example.com: no extractable text found"
        );
    }
}
