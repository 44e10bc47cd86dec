//! Video → source course index.

use std::collections::HashMap;

use crate::models::SourceCatalog;

/// Maps each video ID to the source courses (normalized titles) that embed it.
///
/// A video shared by several source courses is kept under all of them; the
/// voting step treats that as evidence for each.
#[derive(Debug, Clone, Default)]
pub struct VideoIndex {
    by_video: HashMap<String, Vec<String>>,
}

impl VideoIndex {
    /// Index every video of every course, in catalog order.
    pub fn build(catalog: &SourceCatalog) -> Self {
        let mut by_video: HashMap<String, Vec<String>> = HashMap::new();
        for (key, course) in catalog.iter() {
            for video_id in &course.video_ids {
                let sources = by_video.entry(video_id.clone()).or_default();
                if !sources.contains(&key) {
                    sources.push(key.clone());
                }
            }
        }
        Self { by_video }
    }

    /// Normalized source titles containing `video_id`, in catalog order.
    pub fn sources_for(&self, video_id: &str) -> &[String] {
        self.by_video
            .get(video_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct indexed videos.
    pub fn len(&self) -> usize {
        self.by_video.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_video.is_empty()
    }

    /// Videos embedded by more than one source course.
    pub fn shared_count(&self) -> usize {
        self.by_video.values().filter(|s| s.len() > 1).count()
    }
}
