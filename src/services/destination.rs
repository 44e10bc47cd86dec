// src/services/destination.rs

//! Destination catalog loaders.
//!
//! The destination is the course/module/lesson tree of the hosted database,
//! read either from a JSON export or straight from its PostgREST endpoint.
//! Loading is all-or-nothing: any failure aborts the run.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{DestinationConfig, DestinationCourse, DestinationKind};

/// Source of destination courses.
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Load every course with modules and lessons, video IDs derived.
    async fn load(&self) -> Result<Vec<DestinationCourse>>;

    /// Where the courses come from, for log lines.
    fn describe(&self) -> String;
}

/// Build the configured destination backend.
pub fn from_config(
    config: &DestinationConfig,
    client: &Client,
) -> Result<Box<dyn DestinationCatalog>> {
    match config.kind {
        DestinationKind::Export => Ok(Box::new(JsonExportCatalog::new(&config.export_path))),
        DestinationKind::Rest => Ok(Box::new(RestCatalog::from_config(config, client.clone())?)),
    }
}

/// Course tree exported to a JSON file.
pub struct JsonExportCatalog {
    path: PathBuf,
}

impl JsonExportCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DestinationCatalog for JsonExportCatalog {
    async fn load(&self) -> Result<Vec<DestinationCourse>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::destination(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let courses: Vec<DestinationCourse> = serde_json::from_slice(&bytes)?;
        Ok(courses.into_iter().map(DestinationCourse::prepare).collect())
    }

    fn describe(&self) -> String {
        format!("export {}", self.path.display())
    }
}

/// Hosted database queried over its PostgREST interface.
pub struct RestCatalog {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RestCatalog {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Build from settings, reading the API key from the configured env var.
    pub fn from_config(config: &DestinationConfig, client: Client) -> Result<Self> {
        let base = config
            .rest_url
            .as_deref()
            .ok_or_else(|| AppError::config("destination.rest_url is not set"))?;
        let endpoint = format!(
            "{}/rest/v1/{}?select={}&order=id.asc",
            base.trim_end_matches('/'),
            config.table,
            config.select
        );
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            log::warn!(
                "{} is not set; querying the destination without credentials",
                config.api_key_env
            );
        }
        Ok(Self::new(client, endpoint, api_key))
    }
}

#[async_trait]
impl DestinationCatalog for RestCatalog {
    async fn load(&self) -> Result<Vec<DestinationCourse>> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::destination(format!(
                "query failed with HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let courses: Vec<DestinationCourse> = response.json().await?;
        Ok(courses.into_iter().map(DestinationCourse::prepare).collect())
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;
    use crate::utils::test_server::{ok, serve, status};

    const EXPORT: &str = r#"[
        {"id": 1, "title": "Widgets 101", "modules": [
            {"id": 10, "title": "Intro", "lessons": [
                {"id": 100, "title": "Welcome", "video_url": "https://youtu.be/AAAAAAAAAAA"},
                {"id": 101, "title": "Reading", "video_url": null}
            ]}
        ]},
        {"id": 2, "title": "Empty", "modules": []}
    ]"#;

    #[tokio::test]
    async fn test_json_export_loads_and_derives_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        std::fs::write(&path, EXPORT).unwrap();

        let courses = JsonExportCatalog::new(&path).load().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].video_ids(), vec!["AAAAAAAAAAA"]);
        assert!(courses[1].video_ids().is_empty());
    }

    #[tokio::test]
    async fn test_json_export_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonExportCatalog::new(dir.path().join("nope.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Destination(_)));
    }

    #[tokio::test]
    async fn test_rest_catalog_loads() {
        let server = serve(vec![("/rest/v1/courses", ok(EXPORT))]);
        let base = server.base();
        let config = DestinationConfig {
            kind: DestinationKind::Rest,
            rest_url: Some(format!("{base}/")),
            ..DestinationConfig::default()
        };
        let client = create_client(&HttpConfig::default()).unwrap();

        let catalog = from_config(&config, &client).unwrap();
        assert!(catalog.describe().starts_with(&format!("{base}/rest/v1/courses?select=")));

        let courses = catalog.load().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].title, "Widgets 101");
        assert_eq!(
            courses[0].modules[0].lessons[0].video_id.as_deref(),
            Some("AAAAAAAAAAA")
        );
    }

    #[tokio::test]
    async fn test_rest_catalog_error_status_is_fatal() {
        let server = serve(vec![("/rest/v1/courses", status(401))]);
        let base = server.base();
        let client = create_client(&HttpConfig::default()).unwrap();
        let catalog = RestCatalog::new(client, format!("{base}/rest/v1/courses"), None);

        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, AppError::Destination(msg) if msg.contains("401")));
    }
}
