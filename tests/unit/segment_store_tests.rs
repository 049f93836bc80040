/*!
 * Tests for subtitle parsing into segments
 */

use anyhow::Result;

use srtbatch::errors::ParseError;
use srtbatch::segment_store::SegmentStore;
use crate::common;

/// Test loading a well-formed file
#[test]
fn test_load_withSampleSubtitle_shouldKeepOrderAndTimestamps() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let store = SegmentStore::load(&path)?;

    assert_eq!(store.len(), 3);
    assert_eq!(store.source_file, path);
    assert_eq!(store.segments[0].text, "Esto es un subtítulo de prueba.");
    assert_eq!(store.segments[1].start, "00:00:05,000");
    assert_eq!(store.segments[2].end, "00:00:14,000");
    Ok(())
}

/// Test that blank input is a valid, empty store
#[test]
fn test_load_withBlankFile_shouldReturnEmptyStore() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "blank.srt", "\n  \n")?;

    let store = SegmentStore::load(&path)?;

    assert!(store.is_empty());
    Ok(())
}

/// Test that prose without any block is distinguishable from empty input
#[test]
fn test_load_withNoBlocks_shouldFailWithNoSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "notes.srt", "meeting notes\nnothing else")?;

    let result = SegmentStore::load(&path);

    assert!(matches!(result, Err(ParseError::NoSegments { .. })));
    Ok(())
}

/// Test that a repeated index is rejected
#[test]
fn test_load_withDuplicateIndex_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n1\n00:00:03,000 --> 00:00:04,000\nB\n";
    let path = common::create_test_file(temp_dir.path(), "dup.srt", content)?;

    match SegmentStore::load(&path) {
        Err(ParseError::DuplicateIndex { index, .. }) => assert_eq!(index, "1"),
        other => panic!("Expected duplicate index error, got {:?}", other),
    }
    Ok(())
}

/// Test that a missing file reports a read error
#[test]
fn test_load_withMissingFile_shouldFailWithReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = SegmentStore::load(temp_dir.path().join("absent.srt"));

    assert!(matches!(result, Err(ParseError::Read { .. })));
    Ok(())
}

/// Test that rendering parsed segments and parsing again is lossless
#[test]
fn test_parse_withRenderedSegments_shouldPreserveCountAndOrder() {
    let content = common::sample_srt(25);
    let segments = SegmentStore::parse_srt_string(&content);
    let rendered: String = segments.iter().map(|s| s.to_string()).collect();

    assert_eq!(segments.len(), 25);
    assert_eq!(SegmentStore::parse_srt_string(&rendered), segments);
}
