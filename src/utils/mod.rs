//! Utility functions and helpers.

pub mod console;
pub mod http;
pub mod title;
pub mod video;

#[cfg(test)]
pub(crate) mod test_server;
