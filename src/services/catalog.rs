//! Directory page parser.
//!
//! A directory page lists courses as a title heading followed by a link to
//! the course page. The parser walks the DOM in document order and pairs
//! each heading with the first course link that follows it before the next
//! heading. Entries that do not fit that layout are dropped and counted.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::CatalogConfig;
use crate::utils::title::normalize_title;

/// One course found on a directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Normalized title
    pub key: String,
    /// Heading text, whitespace collapsed
    pub title: String,
    /// Absolute course URL
    pub url: String,
}

/// Parse result for a single directory page.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    /// Headings with no course link before the next heading
    pub dropped_headings: usize,
    /// Course links no heading claimed (including any before the first heading)
    pub unclaimed_links: usize,
}

impl CatalogPage {
    /// Add an entry; an entry with the same key is replaced in place.
    fn push(&mut self, entry: CatalogEntry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => {
                log::warn!(
                    "Duplicate catalog title '{}': {} replaces {}",
                    entry.title,
                    entry.url,
                    existing.url
                );
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
    }
}

enum Marker {
    Heading(String),
    Link(String),
}

/// Extracts title → URL pairs from directory pages.
pub struct CatalogParser {
    heading: Selector,
    link_patterns: Vec<String>,
}

impl CatalogParser {
    /// Create a parser from the catalog markup settings.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let heading = Selector::parse(&config.heading_selector)
            .map_err(|e| AppError::selector(&config.heading_selector, format!("{e:?}")))?;
        Ok(Self {
            heading,
            link_patterns: config.link_patterns.clone(),
        })
    }

    /// Parse a directory page. Relative links are resolved against `base`.
    pub fn parse(&self, html: &str, base: &Url) -> CatalogPage {
        let document = Html::parse_document(html);
        let markers = self.collect_markers(&document, base);

        let mut page = CatalogPage::default();
        let mut pending: Option<String> = None;

        for marker in markers {
            match marker {
                Marker::Heading(title) => {
                    if let Some(dropped) = pending.replace(title) {
                        log::debug!("No course link after heading '{}'", dropped);
                        page.dropped_headings += 1;
                    }
                }
                Marker::Link(url) => match pending.take() {
                    Some(title) => page.push(CatalogEntry {
                        key: normalize_title(&title),
                        title,
                        url,
                    }),
                    None => {
                        log::debug!("Course link without a heading: {}", url);
                        page.unclaimed_links += 1;
                    }
                },
            }
        }

        if let Some(dropped) = pending {
            log::debug!("No course link after heading '{}'", dropped);
            page.dropped_headings += 1;
        }

        page
    }

    /// Headings and course links in document order, links de-duplicated by URL.
    fn collect_markers(&self, document: &Html, base: &Url) -> Vec<Marker> {
        let heading_ids: HashSet<_> = document.select(&self.heading).map(|h| h.id()).collect();
        let mut seen_urls = HashSet::new();
        let mut markers = Vec::new();

        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };

            if heading_ids.contains(&element.id()) {
                let title = collapse_text(&element);
                if !title.is_empty() {
                    markers.push(Marker::Heading(title));
                }
                continue;
            }

            if element.value().name() != "a" {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = base.join(href.trim()) else {
                log::debug!("Unresolvable link '{}'", href);
                continue;
            };
            if !self.is_course_link(&resolved) {
                continue;
            }

            let url = resolved.to_string();
            if seen_urls.insert(url.clone()) {
                markers.push(Marker::Link(url));
            }
        }

        markers
    }

    /// Patterns match the resolved path, so relative hrefs count too.
    fn is_course_link(&self, url: &Url) -> bool {
        let path = url.path();
        self.link_patterns.iter().any(|p| path.contains(p.as_str()))
    }
}

fn collapse_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
