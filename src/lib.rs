//! Aggregate disk-usage statistics (folders, files, bytes, images) for a
//! path, computed sequentially, in parallel, or both for comparison.

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod models;

pub use crate::core::scanner::{ScanResults, Scanner};
pub use crate::error::DuError;
pub use crate::models::result::{DuResult, FileCountResult, ImageCountResult, Mode, TaggedResult};
