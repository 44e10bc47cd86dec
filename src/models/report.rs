//! Integrity report structures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FailedSource;

/// Classification of a destination course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Title agrees with the source course its videos belong to
    Correct,
    /// Videos belong to a source course with a different title
    WrongTitle,
    /// Another destination course already covers the same source course
    Duplicate,
    /// No videos, or none of them appear in the source catalog
    Orphan,
    /// Videos split across source courses without a clear winner
    Mixed,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 5] = [
        MatchStatus::Correct,
        MatchStatus::WrongTitle,
        MatchStatus::Duplicate,
        MatchStatus::Orphan,
        MatchStatus::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Correct => "CORRECT",
            MatchStatus::WrongTitle => "WRONG_TITLE",
            MatchStatus::Duplicate => "DUPLICATE",
            MatchStatus::Orphan => "ORPHAN",
            MatchStatus::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one destination course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseReport {
    pub destination_id: i64,
    pub destination_title: String,
    pub status: MatchStatus,
    pub matched_source_title: Option<String>,
    pub correct_title: Option<String>,
    /// `round(matching / total * 100)`, 0 when the course has no videos
    pub confidence_percent: u8,
    pub matching_video_count: usize,
    pub total_video_count: usize,
    pub recommendation: Option<String>,
}

/// Destination courses that all matched the same source course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub source_title: String,
    /// Keeper first, then the courses to delete
    pub destination_ids: Vec<i64>,
    pub keeper_id: i64,
    pub recommendation: String,
}

/// Orphaned destination course, as listed at the end of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanSummary {
    pub destination_id: i64,
    pub destination_title: String,
    pub total_video_count: usize,
    pub recommendation: Option<String>,
}

/// Counts per status plus catalog sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_courses: usize,
    pub correct: usize,
    pub wrong_title: usize,
    pub duplicate: usize,
    pub orphan: usize,
    pub mixed: usize,
    pub source_courses: usize,
    pub source_videos: usize,
    pub failed_sources: usize,
}

impl ReportSummary {
    pub fn count(&self, status: MatchStatus) -> usize {
        match status {
            MatchStatus::Correct => self.correct,
            MatchStatus::WrongTitle => self.wrong_title,
            MatchStatus::Duplicate => self.duplicate,
            MatchStatus::Orphan => self.orphan,
            MatchStatus::Mixed => self.mixed,
        }
    }

    pub(crate) fn bump(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Correct => self.correct += 1,
            MatchStatus::WrongTitle => self.wrong_title += 1,
            MatchStatus::Duplicate => self.duplicate += 1,
            MatchStatus::Orphan => self.orphan += 1,
            MatchStatus::Mixed => self.mixed += 1,
        }
        self.total_courses += 1;
    }
}

/// Snapshot written once at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ReportSummary,
    pub courses: Vec<CourseReport>,
    pub duplicates: Vec<DuplicateGroup>,
    pub orphans: Vec<OrphanSummary>,
    #[serde(default)]
    pub failed_sources: Vec<FailedSource>,
}
