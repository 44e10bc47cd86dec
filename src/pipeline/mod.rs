//! Cross-reference pipeline.
//!
//! - `index`: video ID → source courses
//! - `vote`: per-course classification by shared videos
//! - `duplicates`: keeper selection among courses matching one source
//! - `report`: report assembly and console summary
//! - `xref`: end-to-end run

mod duplicates;
mod index;
mod report;
mod vote;
mod xref;

pub use duplicates::detect_duplicates;
pub use index::VideoIndex;
pub use report::{assemble, print_summary};
pub use vote::{
    MAX_VOTE_GAP, MIXED_CONFIDENCE_THRESHOLD, NO_SOURCE_MATCH, NO_VIDEOS, confidence_percent,
    cross_reference, cross_reference_all,
};
pub use xref::{reconcile, run_xref};
