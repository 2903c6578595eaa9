// ==========================================
// GPL Cart - import job
// ==========================================
// A job is resumed across runs from (offset, line):
// - offset: byte position where the next chunk starts
// - line: records consumed so far (header included)
// ==========================================

use crate::domain::types::{null_default, JobStatus};
use serde::{Deserialize, Serialize};

/// Per-job import options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Allow rows that carry an existing id to update that record
    #[serde(default)]
    pub update: bool,
    /// Store used when a row has no store_id
    #[serde(default)]
    pub store_id: Option<i64>,
    /// Rows per step (None: configured import_limit)
    #[serde(default)]
    pub limit_rows: Option<usize>,
    /// Bytes per step (None: configured import_limit_bytes)
    #[serde(default)]
    pub limit_bytes: Option<u64>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            update: true,
            store_id: None,
            limit_rows: None,
            limit_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub handler_id: String,
    pub status: JobStatus,
    pub file: String,
    /// File size in bytes
    pub total: u64,
    pub offset: u64,
    pub line: u64,
    pub inserted: u64,
    pub updated: u64,
    pub errors: u64,
    pub log_file: String,
    #[serde(default, deserialize_with = "null_default")]
    pub options: ImportOptions,
    pub message: String,
    pub created: i64,
    pub modified: i64,
}

impl Job {
    /// Bytes done, in percent (100 for an empty file)
    pub fn progress(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.offset.min(self.total) * 100 / self.total;
        pct as u8
    }

    pub fn is_done(&self) -> bool {
        !self.status.is_active()
    }
}
