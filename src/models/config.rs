//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Source CMS entry points
    #[serde(default)]
    pub source: SourceConfig,

    /// Markup hints for the source CMS pages
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where the destination course tree comes from
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Report output location
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.source.directory_urls.is_empty() {
            return Err(AppError::validation("No source directory URLs defined"));
        }
        for url in &self.source.directory_urls {
            url::Url::parse(url)
                .map_err(|e| AppError::validation(format!("Bad directory URL '{url}': {e}")))?;
        }
        Selector::parse(&self.catalog.heading_selector)
            .map_err(|e| AppError::selector(&self.catalog.heading_selector, format!("{e:?}")))?;
        if self.catalog.link_patterns.is_empty() {
            return Err(AppError::validation("catalog.link_patterns is empty"));
        }
        if self.output.report_file.trim().is_empty() {
            return Err(AppError::validation("output.report_file is empty"));
        }

        match self.destination.kind {
            DestinationKind::Export => {
                if self.destination.export_path.as_os_str().is_empty() {
                    return Err(AppError::validation("destination.export_path is empty"));
                }
            }
            DestinationKind::Rest => {
                if self.destination.rest_url.as_deref().is_none_or(str::is_empty) {
                    return Err(AppError::validation(
                        "destination.rest_url is required for kind = \"rest\"",
                    ));
                }
                if self.destination.table.trim().is_empty() {
                    return Err(AppError::validation("destination.table is empty"));
                }
            }
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fixed delay between page fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Redirect hops followed before giving up
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_redirects: defaults::max_redirects(),
        }
    }
}

/// Source CMS entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory listing pages to scrape for course links
    #[serde(default = "defaults::directory_urls")]
    pub directory_urls: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directory_urls: defaults::directory_urls(),
        }
    }
}

/// Markup hints for directory and course pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSS selector for course title headings on a directory page
    #[serde(default = "defaults::heading_selector")]
    pub heading_selector: String,

    /// Substrings identifying course links, one per catalog section
    #[serde(default = "defaults::link_patterns")]
    pub link_patterns: Vec<String>,

    /// Attributes holding embedded widget configuration on course pages
    #[serde(default = "defaults::widget_attributes")]
    pub widget_attributes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            heading_selector: defaults::heading_selector(),
            link_patterns: defaults::link_patterns(),
            widget_attributes: defaults::widget_attributes(),
        }
    }
}

/// Destination backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    /// JSON export of the course tree on disk
    #[default]
    Export,
    /// PostgREST-style HTTP endpoint of the hosted database
    Rest,
}

/// Destination catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default)]
    pub kind: DestinationKind,

    /// Path of the JSON export (kind = "export")
    #[serde(default = "defaults::export_path")]
    pub export_path: PathBuf,

    /// Base URL of the hosted database (kind = "rest")
    #[serde(default)]
    pub rest_url: Option<String>,

    /// Course table name
    #[serde(default = "defaults::table")]
    pub table: String,

    /// PostgREST `select` clause pulling the nested module/lesson tree
    #[serde(default = "defaults::select")]
    pub select: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            kind: DestinationKind::default(),
            export_path: defaults::export_path(),
            rest_url: None,
            table: defaults::table(),
            select: defaults::select(),
            api_key_env: defaults::api_key_env(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the report is written under
    #[serde(default = "defaults::output_dir")]
    pub dir: PathBuf,

    /// Report file name, relative to `dir`
    #[serde(default = "defaults::report_file")]
    pub report_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            report_file: defaults::report_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; course-xref/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        500
    }
    pub fn max_redirects() -> usize {
        10
    }

    // Source defaults
    pub fn directory_urls() -> Vec<String> {
        vec!["https://www.example.com/courses/".into()]
    }

    // Catalog markup defaults
    pub fn heading_selector() -> String {
        "h3.course-title".into()
    }
    pub fn link_patterns() -> Vec<String> {
        vec![
            "/courses/".into(),
            "/masterclasses/".into(),
            "/workshops/".into(),
        ]
    }
    pub fn widget_attributes() -> Vec<String> {
        vec!["data-settings".into()]
    }

    // Destination defaults
    pub fn export_path() -> PathBuf {
        PathBuf::from("data/courses.json")
    }
    pub fn table() -> String {
        "courses".into()
    }
    pub fn select() -> String {
        "id,title,modules(id,title,position,lessons(id,title,video_url,position))".into()
    }
    pub fn api_key_env() -> String {
        "COURSE_DB_API_KEY".into()
    }

    // Output defaults
    pub fn output_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn report_file() -> String {
        "integrity-report.json".into()
    }
}
