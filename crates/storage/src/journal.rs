// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only route journal.
//!
//! One JSON-encoded [`JournalEntry`] per line, sequence numbers ascending
//! from 1. A torn final line (crash mid-write) is dropped on open; damage
//! anywhere earlier is corruption and fails the open.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use lr_core::RouteEvent;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt journal entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One journaled event with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub event: RouteEvent,
}

/// Append-only event journal backed by a single file.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    writer: BufWriter<File>,
    write_seq: u64,
}

impl Journal {
    /// Open (or create) the journal, returning it along with every entry
    /// already on disk, in order.
    pub fn open(path: &Path) -> Result<(Self, Vec<JournalEntry>), StorageError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let (entries, valid_len) = read_entries(&mut file)?;
        let file_len = file.metadata()?.len();
        if valid_len < file_len {
            // Torn write from a crash; drop the partial tail.
            warn!(
                path = %path.display(),
                dropped_bytes = file_len - valid_len,
                "truncating torn journal tail"
            );
            file.set_len(valid_len)?;
        }
        file.seek(SeekFrom::End(0))?;

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        Ok((
            Self {
                path: path.to_path_buf(),
                writer: BufWriter::new(file),
                write_seq,
            },
            entries,
        ))
    }

    /// Append an event, returning its sequence number. Not durable until
    /// [`flush`](Self::flush).
    pub fn append(&mut self, event: &RouteEvent) -> Result<u64, StorageError> {
        let seq = self.write_seq + 1;
        let entry = JournalEntry {
            seq,
            event: event.clone(),
        };
        let line = serde_json::to_string(&entry).map_err(StorageError::Encode)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.write_seq = seq;
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(())
    }

    /// Highest sequence number written so far (0 when empty).
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read entries from the start of the file. Returns the entries plus the
/// byte length of the valid prefix.
fn read_entries(file: &mut File) -> Result<(Vec<JournalEntry>, u64), StorageError> {
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut valid_len: u64 = 0;
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if line.trim().is_empty() {
            valid_len += read as u64;
            continue;
        }
        match serde_json::from_str::<JournalEntry>(line.trim_end()) {
            Ok(entry) => {
                entries.push(entry);
                valid_len += read as u64;
            }
            Err(source) => {
                // Only the final line may be torn; anything else is corruption.
                let at_eof = reader.fill_buf()?.is_empty();
                if at_eof && !line.ends_with('\n') {
                    return Ok((entries, valid_len));
                }
                return Err(StorageError::Corrupt { line: line_no, source });
            }
        }
    }

    Ok((entries, valid_len))
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
