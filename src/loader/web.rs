//! Generic web page loading.
//!
//! Uses reqwest for fetching and scraper for HTML parsing.

use super::{LoadError, LoadErrorKind};
use crate::config::LoaderConfig;
use crate::document::Document;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref BODY: Selector = Selector::parse("body").unwrap();
}

/// Elements whose text is never visible
const HIDDEN: [&str; 8] = [
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object",
];

/// Elements that start a new paragraph in the extracted text
const BLOCKS: [&str; 27] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "p", "pre", "section", "tr",
];

/// Fetches HTML pages with a browser-like client
pub struct WebLoader {
    client: Client,
}

impl WebLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its visible text as a single document
    pub async fn load(&self, url: &str) -> Result<Vec<Document>, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::new(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "page request failed");
            return Err(LoadError::new(url, LoadErrorKind::Status(status)));
        }

        let html = response.text().await.map_err(|e| LoadError::new(url, e))?;
        tracing::debug!(%url, bytes = html.len(), "fetched page");

        let document = Html::parse_document(&html);
        let text = extract_text(&document);
        if text.trim().is_empty() {
            return Err(LoadError::new(url, LoadErrorKind::NoContent));
        }

        Ok(vec![Document::new(text)
            .with_source(url)
            .with_title(extract_title(&document))])
    }
}

/// Extract the page title from <title> or <h1>
pub(crate) fn extract_title(document: &Html) -> Option<String> {
    [&*TITLE, &*H1].into_iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|title| !title.is_empty())
    })
}

/// Extract the visible text of the page, one paragraph per block element
pub(crate) fn extract_text(document: &Html) -> String {
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    collect_text(root, &mut current, &mut paragraphs);
    flush(&mut current, &mut paragraphs);

    paragraphs.join("\n\n")
}

fn collect_text(element: ElementRef<'_>, current: &mut String, paragraphs: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                current.push_str(text);
            }
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN.contains(&name) {
                    continue;
                }
                let is_block = BLOCKS.contains(&name);
                if is_block {
                    flush(current, paragraphs);
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(child_ref, current, paragraphs);
                }
                if is_block {
                    flush(current, paragraphs);
                } else {
                    // inline elements still separate words, e.g. <td>a</td><td>b</td>
                    current.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let cleaned = collapse_whitespace(current);
    if !cleaned.is_empty() {
        paragraphs.push(cleaned);
    }
    current.clear();
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
