//! Service layer for the cross-reference engine.
//!
//! This module contains the business logic for:
//! - Directory page parsing (`CatalogParser`)
//! - Course page video extraction (`ContentParser`)
//! - Source CMS crawling (`SourceCrawler`)
//! - Destination catalog loading (`DestinationCatalog`)

mod catalog;
mod content;
pub mod destination;
mod source;

pub use catalog::{CatalogEntry, CatalogPage, CatalogParser};
pub use content::ContentParser;
pub use destination::{DestinationCatalog, JsonExportCatalog, RestCatalog};
pub use source::{SourceCrawlOutcome, SourceCrawler};
