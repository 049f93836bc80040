use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::TranslationClient;
use crate::translation::{PipelineOptions, RunReport, TranslationPipeline, TranslationService};

// @module: Application controller for subtitle translation runs

/// Flags that change how a single run treats existing files
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunFlags {
    /// Translate even when the output already exists
    pub force_overwrite: bool,

    /// Discard the progress ledger before starting
    pub fresh: bool,
}

/// Files a run reads and writes
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub ledger: PathBuf,
    pub output: PathBuf,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Backend handed to every pipeline
    client: Arc<dyn TranslationClient>,
}

impl Controller {
    // @method: Create a controller whose backend is built from the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.translation)
            .context("Failed to create translation service")?;
        Ok(Self::with_client(config, Arc::new(service)))
    }

    /// Create a controller around an existing client
    pub fn with_client(config: Config, client: Arc<dyn TranslationClient>) -> Self {
        Self { config, client }
    }

    /// Work out ledger and output locations for `input_file`
    ///
    /// Both live in `output_dir`, which defaults to the configured output
    /// directory and then to the input's own directory.
    pub fn resolve_paths(&self, input_file: &Path, output_dir: Option<&Path>) -> RunPaths {
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.pipeline.output_dir.clone())
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let ledger = FileManager::derive_path(input_file, &dir, &self.config.pipeline.ledger_suffix, "srt");
        let output = FileManager::derive_path(
            input_file,
            &dir,
            &format!("_{}", self.config.target_language),
            "srt",
        );

        RunPaths {
            input: input_file.to_path_buf(),
            ledger,
            output,
        }
    }

    /// Translate one subtitle file
    ///
    /// Returns `None` when the run was skipped because the output already exists.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: Option<PathBuf>,
        flags: RunFlags,
    ) -> Result<Option<RunReport>> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let paths = self.resolve_paths(&input_file, output_dir.as_deref());
        if let Some(parent) = paths.output.parent() {
            FileManager::ensure_dir(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }

        if paths.output.exists() && !flags.force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists at {:?} (use -f to force overwrite)",
                input_file, paths.output
            );
            return Ok(None);
        }

        if flags.fresh
            && FileManager::remove_if_exists(&paths.ledger)
                .with_context(|| format!("Failed to remove ledger {:?}", paths.ledger))?
        {
            info!("Discarded previous progress in {:?}", paths.ledger);
        }

        let prompt = self.config.render_prompt()?;
        debug!("Prompt template:\n{}", prompt);

        let options = PipelineOptions::new(&paths.ledger, &paths.output, prompt)
            .with_batch_size(self.config.pipeline.batch_size)
            .with_concurrency(self.config.pipeline.concurrent_batches);
        let pipeline = TranslationPipeline::new(Arc::clone(&self.client), options);

        info!(
            "Translating {:?} from {} to {} with {}",
            input_file,
            self.config.source_language,
            self.config.target_language,
            self.client.name()
        );
        let report = pipeline
            .run(&paths.input)
            .await
            .with_context(|| format!("Translation of {:?} aborted", input_file))?;

        if report.is_complete() {
            info!("Wrote {:?}", paths.output);
        } else {
            warn!(
                "Wrote {:?} with {} failed and {} missing segments; {}",
                paths.output,
                report.failed,
                report.missing,
                Self::retry_hint(&report)
            );
        }
        info!("Finished in {}", Self::format_duration(start_time.elapsed()));

        Ok(Some(report))
    }

    // Failed entries stay in the ledger and count as done on the next run
    fn retry_hint(report: &RunReport) -> &'static str {
        if report.failed > 0 {
            "rerun with --fresh --force to translate the whole file again"
        } else {
            "run again to translate the missing segments"
        }
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
