/*!
 * Integration tests for complete translation runs
 */

use anyhow::Result;
use std::sync::Arc;

use srtbatch::errors::{ParseError, PipelineError};
use srtbatch::segment_store::SegmentStore;
use srtbatch::translation::{TranslationPipeline, MISSING, TRANSLATION_FAILED};
use crate::common::{self, MockClient, MockReply};

/// Test the three segment scenario with a failing second batch
#[tokio::test]
async fn test_run_withFailingSecondBatch_shouldWriteSentinelForThirdSegment() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "talk.srt")?;
    let options = common::options_for(&input, 2);
    let mock = MockClient::scripted(vec![
        MockReply::Text("1. This is a test subtitle.\n2. It has several entries.".into()),
        MockReply::Fail("quota exceeded".into()),
    ]);

    let report = TranslationPipeline::new(Arc::new(mock.clone()), options.clone())
        .run(&input)
        .await?;

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].len(), 2);
    assert_eq!(requests[1].texts, vec!["Para hacer pruebas."]);

    let output = SegmentStore::load(&options.output_path)?;
    let texts: Vec<&str> = output.segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["This is a test subtitle.", "It has several entries.", TRANSLATION_FAILED]
    );
    assert_eq!((report.translated, report.failed, report.missing), (2, 1, 0));
    Ok(())
}

/// Test that output preserves count, order and timestamps of the input
#[tokio::test]
async fn test_run_withManySegments_shouldPreserveStructure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "long.srt", &common::sample_srt(47))?;
    let options = common::options_for(&input, 20);

    let report = TranslationPipeline::new(Arc::new(MockClient::working()), options.clone())
        .run(&input)
        .await?;

    let source = SegmentStore::load(&input)?;
    let output = SegmentStore::load(&options.output_path)?;
    assert_eq!(output.len(), source.len());
    for (src, out) in source.segments.iter().zip(output.segments.iter()) {
        assert_eq!(src.index, out.index);
        assert_eq!(src.start, out.start);
        assert_eq!(src.end, out.end);
        assert_eq!(out.text, MockClient::translated(&src.text));
    }
    assert_eq!(report.batches_sent, 3);
    assert!(report.is_complete());
    Ok(())
}

/// Test that unnumbered responses still get aligned line by line
#[tokio::test]
async fn test_run_withUnnumberedBackend_shouldAlignByLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "plain.srt", &common::sample_srt(4))?;
    let options = common::options_for(&input, 3);

    let report = TranslationPipeline::new(Arc::new(MockClient::unnumbered()), options.clone())
        .run(&input)
        .await?;

    let output = SegmentStore::load(&options.output_path)?;
    assert_eq!(output.segments[3].text, "[T] Line number 4");
    assert!(report.is_complete());
    Ok(())
}

/// Test that an entirely failing backend degrades every batch but still writes output
#[tokio::test]
async fn test_run_withBackendDown_shouldStillWriteEveryEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "down.srt", &common::sample_srt(5))?;
    let options = common::options_for(&input, 2).with_concurrency(2);

    let report = TranslationPipeline::new(Arc::new(MockClient::failing()), options.clone())
        .run(&input)
        .await?;

    let output = SegmentStore::load(&options.output_path)?;
    assert_eq!(output.len(), 5);
    assert!(output.segments.iter().all(|s| s.text == TRANSLATION_FAILED));
    assert!(output.segments.iter().all(|s| s.text != MISSING));
    assert_eq!(report.failed, 5);
    assert_eq!(report.completeness_ratio(), 0.0);
    Ok(())
}

/// Test that a malformed input aborts without touching ledger or output
#[tokio::test]
async fn test_run_withMalformedInput_shouldAbortWithParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bad.srt", "WEBVTT\n\nnot srt at all\n")?;
    let options = common::options_for(&input, 2);
    let mock = MockClient::working();

    let result = TranslationPipeline::new(Arc::new(mock.clone()), options.clone())
        .run(&input)
        .await;

    assert!(matches!(result, Err(PipelineError::Parse(ParseError::NoSegments { .. }))));
    assert_eq!(mock.call_count(), 0);
    assert!(!options.ledger_path.exists());
    assert!(!options.output_path.exists());
    Ok(())
}
