// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! One JSON object per line, `{"seq": n, "op": ...}`, with `seq` counting up
//! from 1 without gaps.

use cis_core::Operation;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("WAL entry out of order: expected seq {expected}, found {found}")]
    Sequence { expected: u64, found: u64 },
}

/// Append-only operation log
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create the log at `path`.
    ///
    /// Returns the log positioned after its last entry, together with every
    /// operation it already holds, in order.
    pub fn open(path: &Path) -> Result<(Self, Vec<Operation>), WalError> {
        let entries = read_entries(path)?;
        let sequence = entries.last().map_or(0, |entry| entry.seq);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let ops = entries.into_iter().map(|entry| entry.op).collect();
        Ok((Self { file, sequence }, ops))
    }

    /// Append an operation and sync it to disk.
    ///
    /// On failure the file is cut back to its previous length, so a failed
    /// append never shows up on replay.
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        let seq = self.sequence + 1;
        let mut line = serde_json::to_vec(&EntryRef { seq, op })?;
        line.push(b'\n');

        let len = self.file.metadata()?.len();
        let written = self
            .file
            .write_all(&line)
            .and_then(|()| self.file.sync_all());
        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(len) {
                tracing::error!(seq, error = %rollback, "failed to roll back WAL entry");
            }
            return Err(e.into());
        }

        self.sequence = seq;
        Ok(seq)
    }

    /// Sequence number of the last entry, 0 for an empty log
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    seq: u64,
    op: &'a Operation,
}

#[derive(Deserialize)]
struct Entry {
    seq: u64,
    op: Operation,
}

/// Read every entry, checking that sequence numbers run 1, 2, 3, ...
fn read_entries(path: &Path) -> Result<Vec<Entry>, WalError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut entries: Vec<Entry> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let entry: Entry = serde_json::from_str(&line)?;
        let expected = entries.last().map_or(1, |last| last.seq + 1);
        if entry.seq != expected {
            return Err(WalError::Sequence {
                expected,
                found: entry.seq,
            });
        }
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
