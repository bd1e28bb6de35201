//! YouTube transcript loading.
//!
//! Only the caption track is fetched; video details are never requested.

use super::{LoadError, LoadErrorKind};
use crate::document::Document;
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;

const VIDEO_ID_LEN: usize = 11;

/// Loads the caption track of a YouTube video as a single document
pub struct TranscriptLoader {
    languages: Vec<String>,
}

impl TranscriptLoader {
    pub fn new(languages: Vec<String>) -> Self {
        Self { languages }
    }

    pub async fn load(&self, url: &str) -> Result<Vec<Document>, LoadError> {
        let video_id =
            extract_video_id(url).ok_or_else(|| LoadError::new(url, LoadErrorKind::NoVideoId))?;
        tracing::debug!(%url, %video_id, "fetching transcript");

        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| LoadError::new(url, LoadErrorKind::Transcript(e.to_string())))?;

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        let transcript = api
            .fetch_transcript(&video_id, &languages, false)
            .await
            .map_err(|e| LoadError::new(url, LoadErrorKind::Transcript(e.to_string())))?;

        let text = to_running_text(&transcript.text());
        tracing::debug!(
            %video_id,
            language = %transcript.language_code,
            chars = text.len(),
            "fetched transcript"
        );

        if text.is_empty() {
            return Err(LoadError::new(url, LoadErrorKind::NoContent));
        }

        Ok(vec![Document::new(text)
            .with_source(video_id)
            .with_language(transcript.language_code.clone())])
    }
}

/// Caption lines become one paragraph of space-separated text
fn to_running_text(captions: &str) -> String {
    captions.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the video id from the common YouTube URL shapes
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let host = host.strip_prefix("m.").unwrap_or(host);
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed") | Some("shorts") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    is_video_id(&candidate).then_some(candidate)
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
