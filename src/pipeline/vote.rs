//! Voting cross-referencer.
//!
//! Every video of a destination course casts one vote for each source course
//! that embeds it. The best-voted source course decides the classification.

use std::collections::HashMap;

use crate::models::{CourseReport, DestinationCourse, MatchStatus, SourceCatalog};
use crate::pipeline::VideoIndex;
use crate::utils::title::titles_match;

/// Below this confidence a close race is reported as MIXED.
pub const MIXED_CONFIDENCE_THRESHOLD: u8 = 50;

/// Largest lead (in votes) over the runner-up that still counts as a close race.
pub const MAX_VOTE_GAP: usize = 2;

pub const NO_VIDEOS: &str = "delete — no videos found";
pub const NO_SOURCE_MATCH: &str = "delete — no source match";

/// Votes per source course, kept in the order sources first received a vote.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn vote(&mut self, source: &str) {
        match self.positions.get(source) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.positions.insert(source.to_string(), self.entries.len());
                self.entries.push((source.to_string(), 1));
            }
        }
    }

    /// Index of the highest tally; the earliest entry wins ties.
    fn winner(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, (_, votes)) in self.entries.iter().enumerate() {
            if best.is_none_or(|b| *votes > self.entries[b].1) {
                best = Some(idx);
            }
        }
        best
    }

    fn runner_up(&self, winner: usize) -> usize {
        self.entries
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != winner)
            .map(|(_, (_, votes))| *votes)
            .max()
            .unwrap_or(0)
    }
}

/// `round(matching / total * 100)`, rounding halves up. Zero when `total` is zero.
pub fn confidence_percent(matching: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (matching * 200 + total) / (2 * total);
    percent.min(100) as u8
}

/// Classify one destination course against the source catalog.
///
/// Never returns [`MatchStatus::Duplicate`]; that is assigned afterwards by
/// the duplicate pass.
pub fn cross_reference(
    course: &DestinationCourse,
    catalog: &SourceCatalog,
    index: &VideoIndex,
) -> CourseReport {
    let video_ids = course.video_ids();
    let total = video_ids.len();

    let mut report = CourseReport {
        destination_id: course.id,
        destination_title: course.title.clone(),
        status: MatchStatus::Orphan,
        matched_source_title: None,
        correct_title: None,
        confidence_percent: 0,
        matching_video_count: 0,
        total_video_count: total,
        recommendation: None,
    };

    if total == 0 {
        report.recommendation = Some(NO_VIDEOS.to_string());
        return report;
    }

    let mut tally = Tally::default();
    for video_id in &video_ids {
        for source in index.sources_for(video_id) {
            tally.vote(source);
        }
    }

    let Some(winner_idx) = tally.winner() else {
        report.recommendation = Some(NO_SOURCE_MATCH.to_string());
        return report;
    };

    let (winner_key, max_votes) = &tally.entries[winner_idx];
    let max_votes = *max_votes;
    let runner_up = tally.runner_up(winner_idx);
    let display = |key: &str| {
        catalog
            .get(key)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| key.to_string())
    };
    let winner_title = display(winner_key.as_str());

    report.matched_source_title = Some(winner_title.clone());
    report.matching_video_count = max_votes;
    report.confidence_percent = confidence_percent(max_votes, total);

    let close_race = runner_up > 0 && max_votes - runner_up <= MAX_VOTE_GAP;
    if report.confidence_percent < MIXED_CONFIDENCE_THRESHOLD && close_race {
        let contenders: Vec<String> = tally
            .entries
            .iter()
            .filter(|(_, votes)| max_votes - votes <= MAX_VOTE_GAP)
            .map(|(key, votes)| format!("\"{}\" ({})", display(key.as_str()), votes))
            .collect();
        report.status = MatchStatus::Mixed;
        report.recommendation = Some(format!(
            "manual review — videos split across {}",
            contenders.join(", ")
        ));
        return report;
    }

    if titles_match(&course.title, &winner_title) {
        report.status = MatchStatus::Correct;
    } else {
        report.status = MatchStatus::WrongTitle;
        report.recommendation = Some(format!("rename to \"{winner_title}\""));
        report.correct_title = Some(winner_title);
    }

    report
}

/// Classify every destination course, preserving input order.
pub fn cross_reference_all(
    courses: &[DestinationCourse],
    catalog: &SourceCatalog,
    index: &VideoIndex,
) -> Vec<CourseReport> {
    courses
        .iter()
        .map(|course| cross_reference(course, catalog, index))
        .collect()
}
