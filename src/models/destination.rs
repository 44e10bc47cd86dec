//! Destination database course tree.

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::video::extract_video_id;

/// A course row with its nested modules and lessons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestinationCourse {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default)]
    pub modules: Vec<Module>,
}

/// A module inside a destination course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Sort key, when the store exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// A lesson with its optional stored video reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default)]
    pub video_url: Option<String>,

    /// Derived from `video_url`; see [`DestinationCourse::prepare`]
    #[serde(default)]
    pub video_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Lesson {
    pub fn new(id: i64, title: impl Into<String>, video_url: Option<&str>) -> Self {
        Self {
            id,
            title: title.into(),
            video_url: video_url.map(str::to_string),
            video_id: video_url.and_then(extract_video_id),
            position: None,
        }
    }
}

impl DestinationCourse {
    /// Order modules and lessons by position and derive every lesson's
    /// video ID from its stored URL.
    pub fn prepare(mut self) -> Self {
        self.modules.sort_by_key(|m| m.position.unwrap_or(i64::MAX));
        for module in &mut self.modules {
            module.lessons.sort_by_key(|l| l.position.unwrap_or(i64::MAX));
            for lesson in &mut module.lessons {
                lesson.video_id = lesson.video_url.as_deref().and_then(extract_video_id);
            }
        }
        self
    }

    /// Video IDs across all lessons in order, no repeats.
    pub fn video_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self
            .modules
            .iter()
            .flat_map(|m| &m.lessons)
            .filter_map(|l| l.video_id.as_ref())
        {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
