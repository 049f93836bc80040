/*!
 * Resumable batch translation run.
 *
 * A run moves through these phases:
 *
 * `INIT -> PARSE -> RESUME_SCAN -> {TRANSLATE_BATCH -> ALIGN -> APPEND_LEDGER}* -> MERGE -> WRITE -> DONE`
 *
 * Parse and persistence failures abort the run. A failing or misbehaving
 * backend only degrades its own batch to sentinel values.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{PersistenceError, PipelineError};
use crate::ledger::{LedgerEntry, ProgressLedger};
use crate::providers::TranslationClient;
use crate::segment_store::SegmentStore;

use super::alignment::{AlignmentResolver, ResolvedBatch};
use super::batch::{plan_batches, Batch};
use super::merge::merge;
use super::writer::write_output;

/// Phases of a run, logged as they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Parse,
    ResumeScan,
    TranslateBatch,
    Align,
    AppendLedger,
    Merge,
    Write,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "INIT",
            RunPhase::Parse => "PARSE",
            RunPhase::ResumeScan => "RESUME_SCAN",
            RunPhase::TranslateBatch => "TRANSLATE_BATCH",
            RunPhase::Align => "ALIGN",
            RunPhase::AppendLedger => "APPEND_LEDGER",
            RunPhase::Merge => "MERGE",
            RunPhase::Write => "WRITE",
            RunPhase::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}

/// Everything a run needs besides the client
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Append-only progress file
    pub ledger_path: PathBuf,

    /// Final output, rewritten wholesale
    pub output_path: PathBuf,

    /// Segments per request
    pub batch_size: usize,

    /// System prompt sent with every batch
    pub prompt_template: String,

    /// Batches in flight at once; 1 means strictly sequential
    pub concurrent_batches: usize,
}

impl PipelineOptions {
    pub fn new(
        ledger_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            output_path: output_path.into(),
            batch_size: 20,
            prompt_template: prompt_template.into(),
            concurrent_batches: 1,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_concurrency(mut self, concurrent_batches: usize) -> Self {
        self.concurrent_batches = concurrent_batches;
        self
    }
}

/// Caller-visible summary of a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Segments in the input
    pub total: usize,

    /// Segments with a real translation in the output
    pub translated: usize,

    /// Segments holding the failure sentinel
    pub failed: usize,

    /// Segments never attempted
    pub missing: usize,

    /// Requests issued during this run
    pub batches_sent: usize,

    /// Segments skipped because the ledger already had them
    pub resumed: usize,

    /// Batches that came back with fewer usable lines than requested
    pub shortfall_batches: usize,

    /// Positions padded with the failure sentinel during this run
    pub padded_positions: usize,
}

impl RunReport {
    /// Share of segments with a real translation; an empty input counts as complete
    pub fn completeness_ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.translated as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.translated == self.total
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} translated ({:.1}%), {} failed, {} missing, {} batches sent, {} resumed",
            self.translated,
            self.total,
            self.completeness_ratio() * 100.0,
            self.failed,
            self.missing,
            self.batches_sent,
            self.resumed
        )
    }
}

// @struct: What one batch contributed to the report
#[derive(Debug, Clone, Copy)]
struct BatchOutcome {
    padded: usize,
    shortfall: bool,
}

/// Drives one input file through the phases above
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    /// Backend, injected by the caller
    client: Arc<dyn TranslationClient>,

    /// Paths and batching settings
    options: PipelineOptions,
}

impl TranslationPipeline {
    pub fn new(client: Arc<dyn TranslationClient>, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    fn enter(phase: RunPhase) {
        debug!("Run phase: {}", phase);
    }

    /// Translate `input_path`, resuming from the ledger when it exists
    pub async fn run<P: AsRef<Path>>(&self, input_path: P) -> Result<RunReport, PipelineError> {
        Self::enter(RunPhase::Init);
        if self.options.batch_size == 0 {
            return Err(PipelineError::InvalidBatchSize(0));
        }

        Self::enter(RunPhase::Parse);
        let store = SegmentStore::load(input_path.as_ref())?;
        info!("Parsed {} segments from {:?}", store.len(), store.source_file);

        Self::enter(RunPhase::ResumeScan);
        let ledger = ProgressLedger::open(&self.options.ledger_path)?;
        let resumed = store
            .segments
            .iter()
            .filter(|segment| ledger.resume_set().contains(&segment.index))
            .count();
        let batches = plan_batches(&store.segments, ledger.resume_set(), self.options.batch_size)?;
        let total_batches = batches.len();
        info!(
            "{} segments pending in {} batches ({} already in ledger)",
            store.len() - resumed,
            total_batches,
            resumed
        );

        let mut report = RunReport {
            total: store.len(),
            resumed,
            ..RunReport::default()
        };

        {
            let concurrency = self.options.concurrent_batches.max(1);
            let mut outcomes = stream::iter(batches)
                .map(|batch| self.process_batch(&ledger, batch, total_batches))
                .buffer_unordered(concurrency);

            while let Some(outcome) = outcomes.next().await {
                // Dropping the stream on error abandons batches still in flight
                let outcome = outcome?;
                report.batches_sent += 1;
                report.padded_positions += outcome.padded;
                if outcome.shortfall {
                    report.shortfall_batches += 1;
                }
            }
        }

        Self::enter(RunPhase::Merge);
        let translations = ledger.translation_map()?;
        let merged = merge(&store.segments, &translations);
        report.translated = merged.translated;
        report.failed = merged.failed;
        report.missing = merged.missing;

        Self::enter(RunPhase::Write);
        write_output(&self.options.output_path, &merged.entries)?;

        Self::enter(RunPhase::Done);
        info!("Run finished: {}", report);
        Ok(report)
    }

    async fn process_batch(
        &self,
        ledger: &ProgressLedger,
        batch: Batch,
        total_batches: usize,
    ) -> Result<BatchOutcome, PersistenceError> {
        Self::enter(RunPhase::TranslateBatch);
        debug!(
            "Sending batch {}/{} ({} segments) to {}",
            batch.number,
            total_batches,
            batch.len(),
            self.client.name()
        );
        let request = batch.to_request(&self.options.prompt_template);
        let response = self.client.translate(&request).await;

        Self::enter(RunPhase::Align);
        let resolved = match response {
            Ok(raw) => {
                let resolved = AlignmentResolver::resolve(&raw, batch.len());
                if resolved.is_shortfall() {
                    warn!(
                        "Batch {}/{}: {} of {} lines usable, padding the rest",
                        batch.number,
                        total_batches,
                        resolved.extracted,
                        batch.len()
                    );
                } else if resolved.used_fallback {
                    warn!(
                        "Batch {}/{}: response was not numbered, aligned by line",
                        batch.number, total_batches
                    );
                }
                if resolved.discarded > 0 {
                    debug!(
                        "Batch {}/{}: discarded {} extra lines",
                        batch.number, total_batches, resolved.discarded
                    );
                }
                resolved
            }
            Err(e) => {
                warn!(
                    "Batch {}/{} failed, marking {} segments as failed: {}",
                    batch.number,
                    total_batches,
                    batch.len(),
                    e
                );
                ResolvedBatch::failed(batch.len())
            }
        };

        Self::enter(RunPhase::AppendLedger);
        let entries: Vec<LedgerEntry> = batch
            .segments
            .iter()
            .zip(resolved.texts.iter())
            .map(|(segment, text)| LedgerEntry::from_segment(segment, text.as_str()))
            .collect();
        ledger.append(&entries)?;

        Ok(BatchOutcome {
            padded: resolved.padded,
            shortfall: resolved.is_shortfall(),
        })
    }
}
