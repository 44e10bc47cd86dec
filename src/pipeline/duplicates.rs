//! Duplicate detection.
//!
//! Runs after voting. Destination courses classified CORRECT or WRONG_TITLE
//! that point at the same source course form a group; the one with the most
//! content is kept and the rest are reclassified as DUPLICATE.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::{CourseReport, DestinationCourse, DuplicateGroup, MatchStatus};

/// Group, rank and reclassify. Returns the duplicate groups in the order
/// their source course first appeared among `reports`.
pub fn detect_duplicates(
    reports: &mut [CourseReport],
    courses: &[DestinationCourse],
) -> Vec<DuplicateGroup> {
    let by_id: HashMap<i64, &DestinationCourse> = courses.iter().map(|c| (c.id, c)).collect();
    let depth = |report: &CourseReport| {
        by_id
            .get(&report.destination_id)
            .map(|c| (c.lesson_count(), c.module_count()))
            .unwrap_or((0, 0))
    };

    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, report) in reports.iter().enumerate() {
        if !matches!(report.status, MatchStatus::Correct | MatchStatus::WrongTitle) {
            continue;
        }
        let Some(source) = report.matched_source_title.as_ref() else {
            continue;
        };
        match groups.iter_mut().find(|(s, _)| s == source) {
            Some((_, members)) => members.push(idx),
            None => groups.push((source.clone(), vec![idx])),
        }
    }

    let mut duplicates = Vec::new();
    for (source_title, mut members) in groups {
        if members.len() < 2 {
            continue;
        }

        // Stable: on a full tie the earlier report stays ahead.
        members.sort_by_key(|&idx| {
            let (lessons, modules) = depth(&reports[idx]);
            (Reverse(lessons), Reverse(modules))
        });

        let keeper_idx = members[0];
        let keeper_id = reports[keeper_idx].destination_id;
        let (keeper_lessons, keeper_modules) = depth(&reports[keeper_idx]);
        let keeper_title = reports[keeper_idx].destination_title.clone();

        for &idx in &members[1..] {
            let report = &mut reports[idx];
            log::debug!(
                "#{} '{}' duplicates #{} for source '{}'",
                report.destination_id,
                report.destination_title,
                keeper_id,
                source_title
            );
            report.status = MatchStatus::Duplicate;
            report.recommendation = Some(format!(
                "delete — duplicate of #{keeper_id} \"{keeper_title}\""
            ));
        }

        let destination_ids: Vec<i64> = members
            .iter()
            .map(|&idx| reports[idx].destination_id)
            .collect();
        let deletions: Vec<String> = destination_ids[1..]
            .iter()
            .map(|id| format!("#{id}"))
            .collect();

        duplicates.push(DuplicateGroup {
            recommendation: format!(
                "keep #{keeper_id} \"{keeper_title}\" ({keeper_lessons} lessons, {keeper_modules} modules); delete {}",
                deletions.join(", ")
            ),
            source_title,
            destination_ids,
            keeper_id,
        });
    }

    duplicates
}
