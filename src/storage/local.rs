//! Local filesystem storage implementation.
//!
//! ```text
//! {root}/
//! └── integrity-report.json   # or whatever `output.report_file` names
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{IntegrityReport, OutputConfig};
use crate::storage::ReportStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    report_key: String,
}

impl LocalStorage {
    /// Create a LocalStorage writing `report_key` under `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, report_key: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            report_key: report_key.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.dir, &config.report_file)
    }

    /// Full path of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.path(&self.report_key)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ReportStorage for LocalStorage {
    async fn write_report(&self, report: &IntegrityReport) -> Result<String> {
        let path = self.write_json(&self.report_key, report).await?;
        log::info!(
            "Report with {} courses written to {}",
            report.courses.len(),
            path.display()
        );
        Ok(path.display().to_string())
    }

    async fn load_report(&self) -> Result<Option<IntegrityReport>> {
        let report = self.read_json(&self.report_key).await?;
        if report.is_none() {
            log::warn!("No report found at {}", self.report_path().display());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseReport, MatchStatus, ReportSummary};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_report() -> IntegrityReport {
        let mut summary = ReportSummary::default();
        summary.bump(MatchStatus::WrongTitle);
        IntegrityReport {
            timestamp: Utc::now(),
            summary,
            courses: vec![CourseReport {
                destination_id: 7,
                destination_title: "Widgets 1O1".into(),
                status: MatchStatus::WrongTitle,
                matched_source_title: Some("Widgets 101".into()),
                correct_title: Some("Widgets 101".into()),
                confidence_percent: 100,
                matching_video_count: 2,
                total_video_count: 2,
                recommendation: Some("rename to \"Widgets 101\"".into()),
            }],
            duplicates: Vec::new(),
            orphans: Vec::new(),
            failed_sources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "x.txt");

        storage.write_bytes("nested/test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("nested/test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!tmp.path().join("nested/test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "report.json");

        assert!(storage.read_bytes("nope.txt").await.unwrap().is_none());
        assert!(storage.load_report().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_report_round_trip_uses_camel_case() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "reports/integrity-report.json");
        let report = sample_report();

        let location = storage.write_report(&report).await.unwrap();
        assert!(location.ends_with("integrity-report.json"));

        let raw = std::fs::read_to_string(storage.report_path()).unwrap();
        assert!(raw.contains("\"destinationId\": 7"));
        assert!(raw.contains("\"WRONG_TITLE\""));

        let loaded = storage.load_report().await.unwrap().unwrap();
        assert_eq!(loaded, report);
    }

    #[tokio::test]
    async fn test_corrupt_report_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("report.json"), "{not json").unwrap();
        let storage = LocalStorage::new(tmp.path(), "report.json");

        assert!(matches!(
            storage.load_report().await,
            Err(AppError::Json(_))
        ));
    }
}
