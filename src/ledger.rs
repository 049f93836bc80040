/*!
 * Append-only progress ledger.
 *
 * The ledger records every translated (or degraded) segment using the same
 * block layout as the input file. On startup it is re-parsed to find which
 * indices were already handled; at the end of a run it is re-parsed again to
 * build the final translation map.
 *
 * - Bytes already in the file are never rewritten.
 * - One batch is one append, so a crash loses at most the batch in flight.
 * - When an index appears several times, the last occurrence wins.
 * - A trailing block without its blank-line terminator was cut off by a crash
 *   and is ignored. The next append starts on a fresh block.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::errors::PersistenceError;
use crate::file_utils::FileManager;
use crate::segment_store::{write_block, Segment, SegmentStore};

/// Translation outcome for one segment, as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub index: String,
    pub start: String,
    pub end: String,
    pub translated_text: String,
}

impl LedgerEntry {
    /// Pair a source segment with its translated text
    pub fn from_segment(segment: &Segment, translated_text: impl Into<String>) -> Self {
        Self {
            index: segment.index.clone(),
            start: segment.start.clone(),
            end: segment.end.clone(),
            translated_text: translated_text.into(),
        }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_block(f, &self.index, &self.start, &self.end, &self.translated_text)
    }
}

/// Durable record of finished segments
#[derive(Debug)]
pub struct ProgressLedger {
    /// Location of the ledger file
    path: PathBuf,

    /// Every index present in the file when the ledger was opened
    resume_set: HashSet<String>,

    /// Serializes appends when batches complete concurrently
    append_lock: Mutex<()>,
}

impl ProgressLedger {
    /// Open the ledger at `path`, scanning existing content for the resume set
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let entries = Self::read_entries(&path)?;
        let resume_set: HashSet<String> = entries.into_iter().map(|e| e.index).collect();

        if !resume_set.is_empty() {
            info!("Resuming from ledger {:?}: {} segments already done", path, resume_set.len());
        }

        Ok(Self {
            path,
            resume_set,
            append_lock: Mutex::new(()),
        })
    }

    /// Path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Indices found in the ledger at open time
    pub fn resume_set(&self) -> &HashSet<String> {
        &self.resume_set
    }

    /// Append one batch worth of entries
    pub fn append(&self, entries: &[LedgerEntry]) -> Result<(), PersistenceError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut block = String::new();
        for entry in entries {
            // Writing into a String cannot fail
            let _ = write_block(
                &mut block,
                &entry.index,
                &entry.start,
                &entry.end,
                &entry.translated_text,
            );
        }

        let _guard = self.append_lock.lock();
        let append_error = |source| PersistenceError::LedgerAppend {
            path: self.path.clone(),
            source,
        };

        let tail = FileManager::read_tail(&self.path, 2).map_err(append_error)?;
        let separator = separator_after(&tail);
        if !separator.is_empty() {
            warn!("Ledger {:?} ends inside a block, closing it before appending", self.path);
            block.insert_str(0, separator);
        }

        FileManager::append_to_file(&self.path, &block).map_err(append_error)?;

        debug!("Appended {} entries to ledger {:?}", entries.len(), self.path);
        Ok(())
    }

    /// Re-scan the file and build `index -> translated text`, last occurrence winning
    pub fn translation_map(&self) -> Result<HashMap<String, String>, PersistenceError> {
        let _guard = self.append_lock.lock();
        let entries = Self::read_entries(&self.path)?;

        let mut translations = HashMap::with_capacity(entries.len());
        for entry in entries {
            translations.insert(entry.index, entry.translated_text);
        }
        Ok(translations)
    }

    fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>, PersistenceError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::LedgerRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let complete = complete_blocks(&content);
        if complete.len() < content.len() {
            warn!(
                "Ignoring incomplete trailing block in ledger {:?} ({} bytes)",
                path,
                content.len() - complete.len()
            );
        }

        Ok(SegmentStore::parse_srt_string(complete)
            .into_iter()
            .map(|segment| LedgerEntry {
                index: segment.index,
                start: segment.start,
                end: segment.end,
                translated_text: segment.text,
            })
            .collect())
    }
}

/// Content up to the end of the last blank line
///
/// Anything after it is a block whose append never finished.
fn complete_blocks(content: &str) -> &str {
    let mut end = 0;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if line.ends_with('\n') && line.trim().is_empty() {
            end = offset;
        }
    }
    &content[..end]
}

/// Bytes needed so the next block starts after a blank line
fn separator_after(tail: &[u8]) -> &'static str {
    match tail {
        [] | [.., b'\n', b'\n'] => "",
        [.., b'\n'] => "\n",
        _ => "\n\n",
    }
}
