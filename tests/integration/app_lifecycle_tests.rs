/*!
 * Integration tests for the application controller lifecycle
 */

use anyhow::Result;
use std::sync::Arc;

use srtbatch::app_config::Config;
use srtbatch::app_controller::{Controller, RunFlags};
use srtbatch::segment_store::SegmentStore;
use crate::common::{self, MockClient};

fn controller_with(mock: &MockClient) -> Controller {
    Controller::with_client(Config::default(), Arc::new(mock.clone()))
}

/// Test controller creation from the default configuration
#[test]
fn test_controller_withDefaultConfig_shouldBuildService() {
    let controller = Controller::with_config(Config::default());
    assert!(controller.is_ok());
}

/// Test a full run writes output and ledger next to the input
#[tokio::test]
async fn test_run_withSubtitleFile_shouldWriteTranslatedFile() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let mock = MockClient::working();

    let report = controller_with(&mock)
        .run(input.clone(), None, RunFlags::default())
        .await?
        .expect("run should not be skipped");

    let output = temp_dir.path().join("movie_zh.srt");
    assert!(output.exists());
    assert!(temp_dir.path().join("movie_temp_progress.srt").exists());
    assert_eq!(SegmentStore::load(&output)?.len(), 3);
    assert_eq!(report.total, 3);
    assert!(mock.requests()[0].prompt_template.contains("Spanish"));
    Ok(())
}

/// Test that an existing translation is kept unless forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_zh.srt", "keep me")?;
    let mock = MockClient::working();
    let controller = controller_with(&mock);

    let skipped = controller.run(input.clone(), None, RunFlags::default()).await?;
    assert!(skipped.is_none());
    assert_eq!(std::fs::read_to_string(temp_dir.path().join("movie_zh.srt"))?, "keep me");
    assert_eq!(mock.call_count(), 0);

    let flags = RunFlags {
        force_overwrite: true,
        ..RunFlags::default()
    };
    let forced = controller.run(input, None, flags).await?;
    assert!(forced.is_some());
    assert_eq!(mock.call_count(), 1);
    Ok(())
}

/// Test that --fresh discards previous progress
#[tokio::test]
async fn test_run_withFreshFlag_shouldRetranslateEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let out_dir = temp_dir.path().join("out");
    let mock = MockClient::working();
    let controller = controller_with(&mock);

    controller.run(input.clone(), Some(out_dir.clone()), RunFlags::default()).await?;
    assert!(out_dir.join("movie_temp_progress.srt").exists());

    let flags = RunFlags {
        force_overwrite: true,
        fresh: true,
    };
    let report = controller
        .run(input, Some(out_dir), flags)
        .await?
        .expect("forced run should not be skipped");

    assert_eq!(report.resumed, 0);
    assert_eq!(mock.call_count(), 2);
    Ok(())
}

/// Test that a missing input file is reported as an error
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with(&MockClient::working());

    let result = controller
        .run(temp_dir.path().join("nope.srt"), None, RunFlags::default())
        .await;

    assert!(result.is_err());
    Ok(())
}
