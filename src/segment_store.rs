use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::errors::ParseError;

// @module: Subtitle block parsing shared by input, ledger and output

// @const: SRT time range line, timestamps captured verbatim
static TIMERANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})\s*$").unwrap()
});

// @struct: One original timestamped text record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    // @field: Original numbering, kept as text
    pub index: String,

    // @field: Start timestamp, never reformatted
    pub start: String,

    // @field: End timestamp, never reformatted
    pub end: String,

    // @field: Text lines joined with single spaces
    pub text: String,
}

impl Segment {
    /// Creates a new segment
    pub fn new(
        index: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Segment {
            index: index.into(),
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_block(f, &self.index, &self.start, &self.end, &self.text)
    }
}

/// Write one `index / range / text / blank` block
///
/// Input, ledger and output files all share this layout, which is what lets
/// the ledger be re-read with the same parser as the input.
pub fn write_block(
    out: &mut impl fmt::Write,
    index: &str,
    start: &str,
    end: &str,
    text: &str,
) -> fmt::Result {
    writeln!(out, "{}", index)?;
    writeln!(out, "{} --> {}", start, end)?;
    writeln!(out, "{}", text)?;
    writeln!(out)
}

// @struct: Header seen, collecting text lines
struct PendingBlock {
    index: String,
    start: String,
    end: String,
    text_lines: Vec<String>,
}

impl PendingBlock {
    fn finish(self, segments: &mut Vec<Segment>) {
        if self.text_lines.is_empty() {
            warn!("Skipping subtitle block {} without text", self.index);
            return;
        }
        segments.push(Segment {
            index: self.index,
            start: self.start,
            end: self.end,
            text: self.text_lines.join(" "),
        });
    }
}

fn is_index_line(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Ordered segments parsed from one file
#[derive(Debug, Clone)]
pub struct SegmentStore {
    /// File the segments were read from
    pub source_file: PathBuf,

    /// Segments in file order
    pub segments: Vec<Segment>,
}

impl SegmentStore {
    /// Load and validate the primary input file
    ///
    /// Blank input is a legitimately empty store. Non-blank input that yields no
    /// block at all, or that repeats an index, is rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let segments = Self::parse_srt_string(&content);

        if segments.is_empty() && !content.trim().is_empty() {
            return Err(ParseError::NoSegments { path: path.to_path_buf() });
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for segment in &segments {
            if !seen.insert(segment.index.as_str()) {
                return Err(ParseError::DuplicateIndex {
                    index: segment.index.clone(),
                    path: path.to_path_buf(),
                });
            }
        }

        debug!("Parsed {} segments from {:?}", segments.len(), path);

        Ok(SegmentStore {
            source_file: path.to_path_buf(),
            segments,
        })
    }

    /// Parse block-formatted text into segments, in file order
    ///
    /// Never fails: lines outside a block are skipped and content without any
    /// block gives an empty vector. A block ends at a blank line, at end of
    /// input, or where an index line directly followed by a time range starts
    /// the next block.
    pub fn parse_srt_string(content: &str) -> Vec<Segment> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut segments = Vec::new();
        let mut lines = content.lines().peekable();
        let mut pending: Option<PendingBlock> = None;

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            let next_line = lines.peek().copied();
            let starts_block = is_index_line(trimmed)
                && next_line.is_some_and(|next| TIMERANGE_REGEX.is_match(next.trim()));

            if let Some(block) = pending.as_mut() {
                if trimmed.is_empty() {
                    if let Some(done) = pending.take() {
                        done.finish(&mut segments);
                    }
                    continue;
                }
                if !starts_block {
                    block.text_lines.push(trimmed.to_string());
                    continue;
                }
                if let Some(done) = pending.take() {
                    done.finish(&mut segments);
                }
            }

            if starts_block {
                if let Some(caps) = next_line.and_then(|next| TIMERANGE_REGEX.captures(next.trim())) {
                    pending = Some(PendingBlock {
                        index: trimmed.to_string(),
                        start: caps[1].to_string(),
                        end: caps[2].to_string(),
                        text_lines: Vec::new(),
                    });
                    lines.next();
                    continue;
                }
            }

            if !trimmed.is_empty() {
                debug!("Ignoring line outside of a subtitle block: {}", trimmed);
            }
        }

        if let Some(done) = pending.take() {
            done.finish(&mut segments);
        }

        segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
