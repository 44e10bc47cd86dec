// src/pipeline/report.rs

//! Report assembly and the console summary printed after a run.

use chrono::Utc;

use crate::models::{
    CourseReport, DuplicateGroup, FailedSource, IntegrityReport, MatchStatus, OrphanSummary,
    ReportSummary, SourceCatalog,
};
use crate::utils::console;

/// Fold classified courses and duplicate groups into the final report.
pub fn assemble(
    courses: Vec<CourseReport>,
    duplicates: Vec<DuplicateGroup>,
    catalog: &SourceCatalog,
    failed_sources: Vec<FailedSource>,
) -> IntegrityReport {
    let mut summary = ReportSummary {
        source_courses: catalog.len(),
        source_videos: catalog.video_count(),
        failed_sources: failed_sources.len(),
        ..ReportSummary::default()
    };
    for course in &courses {
        summary.bump(course.status);
    }

    let orphans = courses
        .iter()
        .filter(|c| c.status == MatchStatus::Orphan)
        .map(|c| OrphanSummary {
            destination_id: c.destination_id,
            destination_title: c.destination_title.clone(),
            total_video_count: c.total_video_count,
            recommendation: c.recommendation.clone(),
        })
        .collect();

    IntegrityReport {
        timestamp: Utc::now(),
        summary,
        courses,
        duplicates,
        orphans,
        failed_sources,
    }
}

/// Print the human-readable summary of `report`.
pub fn print_summary(report: &IntegrityReport) {
    let s = &report.summary;
    console::header(&format!(
        "Integrity report ({})",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let mut counts: Vec<(&str, String)> = vec![
        ("Source courses", s.source_courses.to_string()),
        ("Source videos", s.source_videos.to_string()),
        ("Failed sources", s.failed_sources.to_string()),
        ("Destination courses", s.total_courses.to_string()),
    ];
    counts.extend(
        MatchStatus::ALL
            .iter()
            .map(|status| (status.as_str(), s.count(*status).to_string())),
    );
    console::summary("Counts", &counts);

    let renames: Vec<String> = report
        .courses
        .iter()
        .filter(|c| c.status == MatchStatus::WrongTitle)
        .map(|c| {
            format!(
                "#{} \"{}\" -> \"{}\" ({}%)",
                c.destination_id,
                c.destination_title,
                c.correct_title.as_deref().unwrap_or_default(),
                c.confidence_percent
            )
        })
        .collect();
    console::list("Title corrections", &renames);

    let groups: Vec<String> = report
        .duplicates
        .iter()
        .map(|g| format!("{}: {}", g.source_title, g.recommendation))
        .collect();
    console::list("Duplicate groups", &groups);

    let orphans: Vec<String> = report
        .orphans
        .iter()
        .map(|o| {
            format!(
                "#{} \"{}\" ({} videos): {}",
                o.destination_id,
                o.destination_title,
                o.total_video_count,
                o.recommendation.as_deref().unwrap_or_default()
            )
        })
        .collect();
    console::list("Orphans", &orphans);

    let mixed: Vec<String> = report
        .courses
        .iter()
        .filter(|c| c.status == MatchStatus::Mixed)
        .map(|c| {
            format!(
                "#{} \"{}\" ({}%): {}",
                c.destination_id,
                c.destination_title,
                c.confidence_percent,
                c.recommendation.as_deref().unwrap_or_default()
            )
        })
        .collect();
    console::list("Mixed courses", &mixed);

    let failed: Vec<String> = report
        .failed_sources
        .iter()
        .map(|f| format!("{} <{}>: {}", f.title, f.url, f.error))
        .collect();
    console::list("Failed sources", &failed);

    console::separator();
}
