// src/lib.rs

//! Course cross-reference library.
//!
//! Crawls the source CMS course directory, loads the destination course tree,
//! and classifies every destination course by the videos it shares with the
//! source catalog.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
