//! Course page video extraction.
//!
//! Two passes feed one ordered, de-duplicated list:
//! 1. embedded widget settings (`data-settings` and friends) carrying a
//!    `youtube_url` field behind layers of HTML and JSON escaping;
//! 2. a raw scan of the page for YouTube URL substrings, which catches embeds
//!    the widget pass does not know about.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::models::CatalogConfig;
use crate::utils::video::extract_video_id;

static YOUTUBE_URL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""youtube_url"\s*:\s*"([^"]*)""#).expect("static youtube_url pattern")
});

static RAW_YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?v=|embed/|shorts/|v/)|youtu\.be/)[A-Za-z0-9_-]{11}",
    )
    .expect("static raw youtube pattern")
});

/// Escape layers peeled from widget settings, applied until stable.
const UNESCAPES: &[(&str, &str)] = &[
    ("\\/", "/"),
    ("\\\"", "\""),
    ("\\u0026", "&"),
    ("\\u002F", "/"),
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&amp;", "&"),
];

const MAX_UNESCAPE_ROUNDS: usize = 4;

/// Extracts the video IDs embedded in a course page.
pub struct ContentParser {
    widget_attributes: Vec<String>,
}

impl ContentParser {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            widget_attributes: config.widget_attributes.clone(),
        }
    }

    /// Video IDs in order of first appearance. Unknown markup yields an
    /// empty list rather than an error.
    pub fn extract_video_ids(&self, html: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let mut push = |id: String| {
            if !ids.contains(&id) {
                ids.push(id);
            }
        };

        for id in self.widget_pass(html) {
            push(id);
        }
        for id in raw_pass(html) {
            push(id);
        }

        ids
    }

    fn widget_pass(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut found = Vec::new();

        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            for attr in &self.widget_attributes {
                let Some(value) = element.value().attr(attr) else {
                    continue;
                };
                let settings = unescape(value);
                for caps in YOUTUBE_URL_FIELD.captures_iter(&settings) {
                    if let Some(id) = caps.get(1).and_then(|m| extract_video_id(m.as_str())) {
                        found.push(id);
                    }
                }
            }
        }

        found
    }
}

fn raw_pass(html: &str) -> Vec<String> {
    let text = html.replace("\\/", "/");
    RAW_YOUTUBE_URL
        .find_iter(&text)
        .filter_map(|m| extract_video_id(m.as_str()))
        .collect()
}

fn unescape(value: &str) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_UNESCAPE_ROUNDS {
        let next = UNESCAPES
            .iter()
            .fold(current.clone(), |acc, (from, to)| acc.replace(from, to));
        if next == current {
            break;
        }
        current = next;
    }
    current
}
