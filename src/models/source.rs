//! Source CMS catalog structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::utils::title::normalize_title;

/// A course scraped from the source CMS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceCourse {
    /// Display title as shown on the directory page
    pub title: String,

    /// Absolute URL of the course page
    pub canonical_url: String,

    /// Video IDs in order of first appearance, no repeats
    pub video_ids: Vec<String>,
}

impl SourceCourse {
    /// Build a course, dropping repeated video IDs while keeping order.
    pub fn new(
        title: impl Into<String>,
        canonical_url: impl Into<String>,
        video_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in video_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self {
            title: title.into(),
            canonical_url: canonical_url.into(),
            video_ids: ids,
        }
    }

    /// Normalized title used as the catalog key.
    pub fn key(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Source courses keyed by normalized title, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    courses: Vec<SourceCourse>,
    by_key: HashMap<String, usize>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a course. A course with the same normalized title is replaced
    /// in place and returned.
    pub fn insert(&mut self, course: SourceCourse) -> Option<SourceCourse> {
        let key = course.key();
        match self.by_key.get(&key) {
            Some(&idx) => Some(std::mem::replace(&mut self.courses[idx], course)),
            None => {
                self.by_key.insert(key, self.courses.len());
                self.courses.push(course);
                None
            }
        }
    }

    /// Look up a course by normalized title.
    pub fn get(&self, key: &str) -> Option<&SourceCourse> {
        self.by_key.get(key).map(|&idx| &self.courses[idx])
    }

    /// Iterate `(normalized title, course)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &SourceCourse)> {
        self.courses.iter().map(|c| (c.key(), c))
    }

    pub fn courses(&self) -> &[SourceCourse] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Total video IDs across all courses, counting shared ones per course.
    pub fn video_count(&self) -> usize {
        self.courses.iter().map(|c| c.video_ids.len()).sum()
    }
}

impl FromIterator<SourceCourse> for SourceCatalog {
    fn from_iter<T: IntoIterator<Item = SourceCourse>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for course in iter {
            catalog.insert(course);
        }
        catalog
    }
}

/// A source page that could not be fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailedSource {
    /// Course title, or the directory URL for directory pages
    pub title: String,
    pub url: String,
    pub error: String,
}
