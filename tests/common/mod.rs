/*!
 * Common test utilities for the srtbatch test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

use srtbatch::translation::PipelineOptions;

// Scripted client shared with the library unit tests
pub use srtbatch::providers::mock::{MockClient, MockReply};

static INIT_LOGGER: Once = Once::new();

/// Route library logs through env_logger, once per test binary
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// SRT content with `count` single-line subtitles, numbered from 1
pub fn sample_srt(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                "{}\n00:00:{:02},000 --> 00:00:{:02},500\nLine number {}\n\n",
                i,
                i % 60,
                i % 60,
                i
            )
        })
        .collect()
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
Esto es un subtítulo
de prueba.

2
00:00:05,000 --> 00:00:09,000
Contiene varias entradas.

3
00:00:10,000 --> 00:00:14,000
Para hacer pruebas.
"#;
    create_test_file(dir, filename, content)
}

/// Pipeline options writing the ledger and output next to `input`
pub fn options_for(input: &Path, batch_size: usize) -> PipelineOptions {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    PipelineOptions::new(
        dir.join(format!("{}_temp_progress.srt", stem)),
        dir.join(format!("{}_zh.srt", stem)),
        "Translate the numbered lines.",
    )
    .with_batch_size(batch_size)
}
