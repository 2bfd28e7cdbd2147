use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::result::TaggedResult;

/// Everything one invocation measured, in export form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub path: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<TaggedResult>,
}

impl UsageReport {
    pub fn new(path: PathBuf, results: &[TaggedResult]) -> Self {
        Self {
            path,
            generated_at: Utc::now(),
            results: results.to_vec(),
        }
    }
}

pub fn export_json(report: &UsageReport, output_path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
