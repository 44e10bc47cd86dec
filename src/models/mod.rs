// src/models/mod.rs

//! Domain models for the cross-reference engine.
//!
//! Source-side and destination-side catalogs, the report types, and the
//! TOML configuration.

mod config;
mod destination;
mod report;
mod source;

// Re-export all public types
pub use config::{
    CatalogConfig, Config, DestinationConfig, DestinationKind, HttpConfig, OutputConfig,
    SourceConfig,
};
pub use destination::{DestinationCourse, Lesson, Module};
pub use report::{
    CourseReport, DuplicateGroup, IntegrityReport, MatchStatus, OrphanSummary, ReportSummary,
};
pub use source::{FailedSource, SourceCatalog, SourceCourse};
