//! Report persistence.
//!
//! A run produces exactly one `IntegrityReport`, written once at the end and
//! never touched again.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::IntegrityReport;

pub use local::LocalStorage;

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Persist `report`, returning where it was written.
    async fn write_report(&self, report: &IntegrityReport) -> Result<String>;

    /// Load the previously written report, if any.
    async fn load_report(&self) -> Result<Option<IntegrityReport>>;
}
