/*!
 * Tests for the append-only progress ledger
 */

use anyhow::Result;
use std::sync::Arc;
use std::thread;

use srtbatch::ledger::{LedgerEntry, ProgressLedger};
use srtbatch::segment_store::{Segment, SegmentStore};
use crate::common;

fn entries(range: std::ops::RangeInclusive<usize>, prefix: &str) -> Vec<LedgerEntry> {
    range
        .map(|i| {
            let segment = Segment::new(i.to_string(), "00:00:01,000", "00:00:02,000", "src");
            LedgerEntry::from_segment(&segment, format!("{} {}", prefix, i))
        })
        .collect()
}

/// Test that a ledger cut off in the middle of a block keeps every complete block
#[test]
fn test_open_withTruncatedTail_shouldIgnoreIncompleteBlock() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:02,000\nuno\n\n2\n00:00:03,000 --> 00:00:04,000\ndos\n\n3\n00:00:05,0";
    let path = common::create_test_file(temp_dir.path(), "ledger.srt", content)?;

    let ledger = ProgressLedger::open(&path)?;

    assert_eq!(ledger.resume_set().len(), 2);
    assert!(!ledger.resume_set().contains("3"));
    Ok(())
}

/// Test that the resume set is fixed at open time
#[test]
fn test_resume_set_withLaterAppends_shouldStayAsOpened() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("ledger.srt");

    let ledger = ProgressLedger::open(&path)?;
    ledger.append(&entries(1..=3, "t"))?;

    assert!(ledger.resume_set().is_empty());
    assert_eq!(ledger.translation_map()?.len(), 3);
    Ok(())
}

/// Test that appends from several threads never interleave inside a block
#[test]
fn test_append_withConcurrentWriters_shouldKeepBlocksIntact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("ledger.srt");
    let ledger = Arc::new(ProgressLedger::open(&path)?);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let start = worker * 10 + 1;
                ledger.append(&entries(start..=start + 9, "w")).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let content = std::fs::read_to_string(&path)?;
    let segments = SegmentStore::parse_srt_string(&content);
    assert_eq!(segments.len(), 80);
    assert!(segments.iter().all(|s| s.text == format!("w {}", s.index)));
    Ok(())
}

/// Test that the ledger file can be read back with the subtitle parser
#[test]
fn test_ledger_file_withAppendedEntries_shouldBeValidSubtitleFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("ledger.srt");

    let ledger = ProgressLedger::open(&path)?;
    ledger.append(&entries(1..=2, "hola"))?;

    let store = SegmentStore::load(&path)?;
    assert_eq!(store.len(), 2);
    assert_eq!(store.segments[1].text, "hola 2");
    Ok(())
}
