// src/services/source.rs

//! Source CMS crawler.
//!
//! Fetches every directory page, then every course page it links to, one at a
//! time with a fixed pause between requests. A page that fails to load is
//! recorded and skipped; the crawl itself never fails.

use std::time::Duration;

use reqwest::Client;
use crate::error::Result;
use crate::models::{Config, FailedSource, SourceCatalog, SourceCourse};
use crate::services::{CatalogEntry, CatalogPage, CatalogParser, ContentParser};
use crate::utils::http::{fetch_html, fetch_page};

/// Everything learned from one pass over the source CMS.
#[derive(Debug, Default)]
pub struct SourceCrawlOutcome {
    pub catalog: SourceCatalog,
    pub failed: Vec<FailedSource>,
    pub directory_pages: usize,
    pub dropped_headings: usize,
    pub unclaimed_links: usize,
}

/// Sequential crawler for the source CMS.
pub struct SourceCrawler {
    client: Client,
    catalog_parser: CatalogParser,
    content_parser: ContentParser,
    delay: Duration,
    max_redirects: usize,
}

impl SourceCrawler {
    /// Create a crawler using `client` and the catalog markup settings.
    pub fn new(client: Client, config: &Config) -> Result<Self> {
        Ok(Self {
            client,
            catalog_parser: CatalogParser::new(&config.catalog)?,
            content_parser: ContentParser::new(&config.catalog),
            delay: Duration::from_millis(config.http.request_delay_ms),
            max_redirects: config.http.max_redirects,
        })
    }

    /// Crawl all directory pages and the course pages they list.
    pub async fn crawl(&self, directory_urls: &[String]) -> SourceCrawlOutcome {
        let mut outcome = SourceCrawlOutcome::default();
        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut first_request = true;

        for directory_url in directory_urls {
            self.pace(&mut first_request).await;

            match self.scan_directory(directory_url).await {
                Ok(page) => {
                    log::info!(
                        "Directory {}: {} courses",
                        directory_url,
                        page.entries.len()
                    );
                    outcome.directory_pages += 1;
                    outcome.dropped_headings += page.dropped_headings;
                    outcome.unclaimed_links += page.unclaimed_links;
                    merge_entries(&mut entries, page.entries);
                }
                Err(e) => {
                    log::warn!("Failed to fetch directory {}: {}", directory_url, e);
                    outcome.failed.push(FailedSource {
                        title: directory_url.clone(),
                        url: directory_url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let total = entries.len();
        for (i, entry) in entries.into_iter().enumerate() {
            self.pace(&mut first_request).await;

            match self.scan_course(&entry.url).await {
                Ok(video_ids) => {
                    log::info!(
                        "[{}/{}] {}: {} videos",
                        i + 1,
                        total,
                        entry.title,
                        video_ids.len()
                    );
                    let course = SourceCourse::new(entry.title, entry.url, video_ids);
                    if let Some(replaced) = outcome.catalog.insert(course) {
                        log::warn!(
                            "Source title collision: '{}' ({}) was overwritten",
                            replaced.title,
                            replaced.canonical_url
                        );
                    }
                }
                Err(e) => {
                    log::warn!("[{}/{}] {}: FAILED ({})", i + 1, total, entry.title, e);
                    outcome.failed.push(FailedSource {
                        title: entry.title,
                        url: entry.url,
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }

    /// Fetch and parse one directory page. Links resolve against the URL the
    /// redirect chain ended at.
    pub async fn scan_directory(&self, url: &str) -> Result<CatalogPage> {
        let page = fetch_page(&self.client, url, self.max_redirects).await?;
        Ok(self.catalog_parser.parse(&page.html, &page.url))
    }

    /// Fetch one course page and extract its video IDs.
    pub async fn scan_course(&self, url: &str) -> Result<Vec<String>> {
        let html = fetch_html(&self.client, url, self.max_redirects).await?;
        Ok(self.content_parser.extract_video_ids(&html))
    }

    async fn pace(&self, first_request: &mut bool) {
        if !std::mem::replace(first_request, false) && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Merge entries from another directory page; same-title entries are replaced
/// in place, matching how the catalog itself treats collisions.
fn merge_entries(entries: &mut Vec<CatalogEntry>, more: Vec<CatalogEntry>) {
    for entry in more {
        match entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::create_client;
    use crate::utils::test_server::{ok, redirect, serve, status};

    fn crawler() -> SourceCrawler {
        let mut config = Config::default();
        config.http.request_delay_ms = 0;
        let client = create_client(&config.http).unwrap();
        SourceCrawler::new(client, &config).unwrap()
    }

    #[tokio::test]
    async fn test_crawl_builds_catalog_and_records_failures() {
        let directory = r#"
            <h3 class="course-title">Widgets 101</h3>
            <a href="/courses/widgets/">View</a>
            <h3 class="course-title">Broken Course</h3>
            <a href="/courses/broken/">View</a>
        "#;
        let widgets = r#"
            <iframe src="https://www.youtube.com/embed/AAAAAAAAAAA"></iframe>
            <iframe src="https://www.youtube.com/embed/BBBBBBBBBBB"></iframe>
        "#;
        let server = serve(vec![
            ("/catalog/", ok(directory)),
            ("/courses/widgets/", ok(widgets)),
            ("/courses/broken/", status(500)),
        ]);
        let base = server.base();

        let outcome = crawler()
            .crawl(&[format!("{base}/catalog/"), format!("{base}/missing/")])
            .await;

        assert_eq!(outcome.directory_pages, 1);
        assert_eq!(outcome.catalog.len(), 1);
        let course = outcome.catalog.get("widgets 101").unwrap();
        assert_eq!(course.video_ids, vec!["AAAAAAAAAAA", "BBBBBBBBBBB"]);
        assert_eq!(course.canonical_url, format!("{base}/courses/widgets/"));

        assert_eq!(outcome.failed.len(), 2);
        assert_eq!(outcome.failed[0].url, format!("{base}/missing/"));
        assert_eq!(outcome.failed[1].title, "Broken Course");
    }

    #[tokio::test]
    async fn test_redirected_directory_resolves_links_against_final_url() {
        let directory = r#"
            <h3 class="course-title">Widgets 101</h3>
            <a href="./courses/widgets/">View</a>
        "#;
        let server = serve(vec![
            ("/old", redirect("/catalog/list/")),
            ("/catalog/list/", ok(directory)),
        ]);
        let base = server.base();

        let page = crawler()
            .scan_directory(&format!("{base}/old"))
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 1);
        assert_eq!(
            page.entries[0].url,
            format!("{base}/catalog/list/courses/widgets/")
        );
    }

    #[test]
    fn test_merge_entries_replaces_same_key() {
        let entry = |key: &str, url: &str| CatalogEntry {
            key: key.to_string(),
            title: key.to_string(),
            url: url.to_string(),
        };
        let mut entries = vec![entry("a", "1"), entry("b", "2")];
        merge_entries(&mut entries, vec![entry("a", "3"), entry("c", "4")]);
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["3", "2", "4"]);
    }
}
