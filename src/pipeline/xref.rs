// src/pipeline/xref.rs

//! Cross-reference run: load both catalogs, classify, write the report.

use chrono::Utc;

use crate::error::Result;
use crate::models::{
    Config, CourseReport, DestinationCourse, DuplicateGroup, IntegrityReport, SourceCatalog,
};
use crate::pipeline::{VideoIndex, assemble, cross_reference_all, detect_duplicates, print_summary};
use crate::services::{DestinationCatalog, SourceCrawler};
use crate::storage::ReportStorage;
use crate::utils::console;

const STEPS: usize = 4;

/// Classify every destination course against the source catalog and
/// collapse duplicates.
pub fn reconcile(
    catalog: &SourceCatalog,
    courses: &[DestinationCourse],
) -> (Vec<CourseReport>, Vec<DuplicateGroup>) {
    let index = VideoIndex::build(catalog);
    log::debug!(
        "Indexed {} videos ({} shared between source courses)",
        index.len(),
        index.shared_count()
    );

    let mut reports = cross_reference_all(courses, catalog, &index);
    let duplicates = detect_duplicates(&mut reports, courses);
    (reports, duplicates)
}

/// Run the full cross-reference and persist the report.
///
/// The destination is loaded before the crawl starts; failing to load it, or
/// failing to write the report, aborts the run. Source pages that fail are
/// recorded in the report instead.
pub async fn run_xref(
    config: &Config,
    source: &SourceCrawler,
    destination: &dyn DestinationCatalog,
    storage: &dyn ReportStorage,
) -> Result<IntegrityReport> {
    let start_time = Utc::now();
    console::header("Course cross-reference");

    console::step(
        1,
        STEPS,
        &format!("Loading destination from {}", destination.describe()),
    );
    let courses = destination.load().await?;
    let lessons: usize = courses.iter().map(DestinationCourse::lesson_count).sum();
    console::sub_item(&format!("{} courses, {} lessons", courses.len(), lessons));

    console::step(
        2,
        STEPS,
        &format!(
            "Crawling {} source directory page(s)",
            config.source.directory_urls.len()
        ),
    );
    let outcome = source.crawl(&config.source.directory_urls).await;
    console::sub_item(&format!(
        "{} courses, {} videos, {} failed",
        outcome.catalog.len(),
        outcome.catalog.video_count(),
        outcome.failed.len()
    ));
    if outcome.dropped_headings > 0 || outcome.unclaimed_links > 0 {
        log::debug!(
            "{} headings without a link, {} links before any heading",
            outcome.dropped_headings,
            outcome.unclaimed_links
        );
    }

    console::step(3, STEPS, "Cross-referencing");
    let (reports, duplicates) = reconcile(&outcome.catalog, &courses);
    let report = assemble(reports, duplicates, &outcome.catalog, outcome.failed);

    console::step(4, STEPS, "Writing report");
    let location = storage.write_report(&report).await?;
    console::sub_item(&format!("Saved to {}", location));

    print_summary(&report);

    let elapsed = Utc::now() - start_time;
    log::info!("Finished in {}s", elapsed.num_seconds());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, SourceCourse};
    use crate::services::JsonExportCatalog;
    use crate::storage::LocalStorage;
    use crate::utils::http::create_client;
    use crate::utils::test_server::{ok, serve};

    const DIRECTORY: &str = r#"
        <h3 class="course-title">Widgets 101</h3>
        <a href="/courses/widgets/">View</a>
        <h3 class="course-title">Gadgets &amp; Gizmos</h3>
        <a href="/courses/gadgets/">View</a>
    "#;

    const WIDGETS: &str = r#"
        <iframe src="https://www.youtube.com/embed/AAAAAAAAAAA"></iframe>
        <iframe src="https://www.youtube.com/embed/BBBBBBBBBBB"></iframe>
    "#;

    const GADGETS: &str = r#"
        <div data-settings="{&quot;youtube_url&quot;:&quot;https:\/\/youtu.be\/CCCCCCCCCCC&quot;}"></div>
    "#;

    const EXPORT: &str = r#"[
        {"id": 1, "title": "Widgets 101", "modules": [{"id": 10, "title": "M", "lessons": [
            {"id": 100, "title": "L1", "video_url": "https://youtu.be/AAAAAAAAAAA"},
            {"id": 101, "title": "L2", "video_url": "https://youtu.be/BBBBBBBBBBB"}
        ]}]},
        {"id": 2, "title": "Widgets One-Oh-One", "modules": [{"id": 20, "title": "M", "lessons": [
            {"id": 200, "title": "L1", "video_url": "https://youtu.be/AAAAAAAAAAA"}
        ]}]},
        {"id": 3, "title": "Untitled", "modules": [{"id": 30, "title": "M", "lessons": [
            {"id": 300, "title": "L1", "video_url": "https://youtu.be/CCCCCCCCCCC"}
        ]}]},
        {"id": 4, "title": "Empty", "modules": []}
    ]"#;

    #[test]
    fn test_reconcile_classifies_and_groups() {
        let catalog: SourceCatalog = [
            SourceCourse::new("Foo", "https://x/foo", ["AAAAAAAAAAA".into()]),
            SourceCourse::new("Bar", "https://x/bar", ["BBBBBBBBBBB".into()]),
        ]
        .into_iter()
        .collect();
        let courses: Vec<DestinationCourse> = serde_json::from_str::<Vec<DestinationCourse>>(
            r#"[
                {"id": 1, "title": "Foo", "modules": [{"id": 1, "title": "M", "lessons": [
                    {"id": 1, "title": "L", "video_url": "AAAAAAAAAAA"}]}]},
                {"id": 2, "title": "Foo again", "modules": [{"id": 2, "title": "M", "lessons": [
                    {"id": 2, "title": "L", "video_url": "AAAAAAAAAAA"},
                    {"id": 3, "title": "L", "video_url": null}]}]}
            ]"#,
        )
        .unwrap()
        .into_iter()
        .map(DestinationCourse::prepare)
        .collect();

        let (reports, duplicates) = reconcile(&catalog, &courses);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].keeper_id, 2);
        assert_eq!(reports[0].status, MatchStatus::Duplicate);
        assert_eq!(reports[1].status, MatchStatus::Correct);
    }

    #[tokio::test]
    async fn test_run_xref_end_to_end() {
        let server = serve(vec![
            ("/catalog/", ok(DIRECTORY)),
            ("/courses/widgets/", ok(WIDGETS)),
            ("/courses/gadgets/", ok(GADGETS)),
        ]);
        let base = server.base();

        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("courses.json");
        std::fs::write(&export, EXPORT).unwrap();

        let mut config = Config::default();
        config.http.request_delay_ms = 0;
        config.source.directory_urls = vec![format!("{base}/catalog/")];

        let client = create_client(&config.http).unwrap();
        let crawler = SourceCrawler::new(client, &config).unwrap();
        let destination = JsonExportCatalog::new(&export);
        let storage = LocalStorage::new(dir.path(), "out/report.json");

        let report = run_xref(&config, &crawler, &destination, &storage)
            .await
            .unwrap();

        let status = |id: i64| {
            report
                .courses
                .iter()
                .find(|c| c.destination_id == id)
                .map(|c| c.status)
                .unwrap()
        };
        assert_eq!(status(1), MatchStatus::Correct);
        assert_eq!(status(2), MatchStatus::Duplicate);
        assert_eq!(status(3), MatchStatus::WrongTitle);
        assert_eq!(status(4), MatchStatus::Orphan);
        assert_eq!(report.summary.source_courses, 2);
        assert_eq!(report.duplicates[0].destination_ids, vec![1, 2]);

        let saved = storage.load_report().await.unwrap().unwrap();
        assert_eq!(saved, report);
    }

    #[tokio::test]
    async fn test_run_xref_destination_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.source.directory_urls = vec!["http://127.0.0.1:9/".to_string()];

        let client = create_client(&config.http).unwrap();
        let crawler = SourceCrawler::new(client, &config).unwrap();
        let destination = JsonExportCatalog::new(dir.path().join("missing.json"));
        let storage = LocalStorage::new(dir.path(), "report.json");

        let result = run_xref(&config, &crawler, &destination, &storage).await;
        assert!(result.is_err());
        assert!(storage.load_report().await.unwrap().is_none());
    }
}
