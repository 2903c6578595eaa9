// ==========================================
// GPL Cart - import error log
// ==========================================
// CSV file with header `line,message`, one record per message.
// Appended after every job step.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One logged message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append entries, writing the header when the file is new or empty
    pub fn append(&self, entries: &[ErrorLogEntry]) -> ImportResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        let write_err = |e: csv::Error| ImportError::CsvWriteError(e.to_string());
        if needs_header {
            writer.write_record(["line", "message"]).map_err(write_err)?;
        }
        for entry in entries {
            writer
                .write_record([entry.line.to_string(), entry.message.clone()])
                .map_err(write_err)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Every entry written so far (empty when the log does not exist)
    pub fn read_all(&self) -> ImportResult<Vec<ErrorLogEntry>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            entries.push(ErrorLogEntry {
                line: record.get(0).and_then(|v| v.parse().ok()).unwrap_or(0),
                message: record.get(1).unwrap_or("").to_string(),
            });
        }
        Ok(entries)
    }
}
