// ==========================================
// GPL Cart - resumable CSV reader
// ==========================================
// Reads a CSV file in chunks. Each chunk reports the absolute byte
// offset where the next read resumes, so a job can stop after any chunk
// and continue later from the persisted offset.
// ==========================================
// Quoting follows RFC 4180 (csv crate): embedded delimiters, newlines
// and doubled quotes inside quoted fields.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::trace;

const BOM: char = '\u{feff}';

/// One data record
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// Absolute record number in the file (header = 1)
    pub line: u64,
    pub values: HashMap<String, String>,
}

impl CsvRow {
    /// Trimmed value, empty string when the column is absent
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value, None when absent or empty
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Result of one `parse()` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvChunk {
    pub rows: Vec<CsvRow>,
    /// Absolute byte offset to resume from
    pub offset: u64,
    /// Records consumed by this call (header and blank rows included)
    pub lines: u64,
    pub eof: bool,
}

#[derive(Debug, Clone)]
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
    header: Option<Vec<String>>,
    skip_header: bool,
    offset: u64,
    limit: u64,
    max_rows: usize,
    start_line: u64,
}

impl CsvReader {
    /// Reader over an existing file
    ///
    /// # Errors
    /// - FileNotFound: the path does not exist or is not a file
    pub fn open(path: impl AsRef<Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b',',
            header: None,
            skip_header: true,
            offset: 0,
            limit: 0,
            max_rows: 0,
            start_line: 0,
        })
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Column index -> key mapping
    pub fn header(mut self, keys: Vec<String>) -> Self {
        self.header = Some(keys);
        self
    }

    /// Whether the first record is a header line (only relevant at offset 0)
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Byte budget per call (0 = unlimited)
    ///
    /// The record that crosses the budget is still returned whole.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Data rows per call (0 = unlimited)
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Records already consumed before `offset`
    pub fn start_line(mut self, line: u64) -> Self {
        self.start_line = line;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes
    pub fn total(&self) -> ImportResult<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter);
        builder
    }

    /// First record of the file, trimmed, BOM removed
    ///
    /// An empty file yields an empty header.
    pub fn read_header(&self) -> ImportResult<Vec<String>> {
        let file = File::open(&self.path)?;
        let mut reader = self.builder().from_reader(file);
        let mut record = StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Ok(Vec::new());
        }
        Ok(normalize_header(&record))
    }

    /// Read the next chunk starting at `offset`
    pub fn parse(&self) -> ImportResult<CsvChunk> {
        let total = self.total()?;
        if self.offset >= total {
            return Ok(CsvChunk {
                rows: Vec::new(),
                offset: self.offset,
                lines: 0,
                eof: true,
            });
        }

        let at_start = self.offset == 0;
        let keys = match (&self.header, at_start) {
            (Some(keys), _) => keys.clone(),
            (None, true) => Vec::new(),
            (None, false) => self.read_header()?,
        };

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut reader = self.builder().from_reader(file);

        let mut chunk = CsvChunk {
            offset: self.offset,
            ..CsvChunk::default()
        };
        let mut keys = keys;
        let mut record = StringRecord::new();

        if at_start && (self.header.is_none() || self.skip_header) {
            if !reader.read_record(&mut record)? {
                chunk.eof = true;
                return Ok(chunk);
            }
            chunk.lines += 1;
            if self.header.is_none() {
                keys = normalize_header(&record);
            }
        }

        loop {
            let consumed = reader.position().byte();
            if self.limit > 0 && consumed >= self.limit && !chunk.rows.is_empty() {
                break;
            }
            if self.max_rows > 0 && chunk.rows.len() >= self.max_rows {
                break;
            }

            if !reader.read_record(&mut record)? {
                chunk.eof = true;
                break;
            }
            chunk.lines += 1;

            let line = self.start_line + chunk.lines;
            if record.iter().all(|v| v.trim().is_empty()) {
                trace!(line, "skipping blank row");
                continue;
            }

            let values = keys
                .iter()
                .enumerate()
                .filter(|(_, key)| !key.is_empty())
                .map(|(idx, key)| {
                    let value = record.get(idx).unwrap_or("").trim().to_string();
                    (key.clone(), value)
                })
                .collect();
            chunk.rows.push(CsvRow { line, values });
        }

        chunk.offset = self.offset + reader.position().byte();
        if chunk.offset >= total {
            chunk.eof = true;
        }
        Ok(chunk)
    }
}

fn normalize_header(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .map(|v| v.trim_start_matches(BOM).trim().to_string())
        .collect()
}
