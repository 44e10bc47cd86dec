// src/utils/video.rs

//! Video identifier extraction.
//!
//! Turns any of the usual YouTube watch/share/shorts/embed URL shapes, or a
//! bare identifier, into the canonical 11-character video ID. This is the join
//! key between the source CMS and the destination database, so both sides go
//! through [`extract_video_id`].

use std::sync::LazyLock;

use regex::Regex;

/// Length of a canonical video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// URL patterns in priority order. The first one that matches wins.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"watch\?v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"shorts/([A-Za-z0-9_-]{11})",
        r"embed/([A-Za-z0-9_-]{11})",
        r"/v/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static video pattern"))
    .collect()
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("static bare id pattern"));

/// Extract the canonical video ID from a URL or bare identifier.
///
/// Returns `None` when no known shape matches. No network validation is done.
///
/// # Examples
/// ```
/// use course_xref::utils::video::extract_video_id;
///
/// assert_eq!(
///     extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
///     Some("dQw4w9WgXcQ".to_string())
/// );
/// assert_eq!(extract_video_id("not a video"), None);
/// ```
pub fn extract_video_id(input: &str) -> Option<String> {
    for pattern in URL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(input) {
            if let Some(id) = caps.get(1) {
                return Some(id.as_str().to_string());
            }
        }
    }

    let trimmed = input.trim();
    BARE_ID
        .is_match(trimmed)
        .then(|| trimmed.to_string())
}
