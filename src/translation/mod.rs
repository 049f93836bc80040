/*!
 * Batch translation of subtitle segments.
 *
 * - `core`: retrying, timeout-bounded service around a provider
 * - `batch`: splitting pending segments into requests
 * - `alignment`: mapping free-text responses back to batch positions
 * - `merge`: combining source segments with ledger results
 * - `writer`: output serialization
 * - `pipeline`: the resumable run itself
 */

pub mod alignment;
pub mod batch;
pub mod core;
pub mod merge;
pub mod pipeline;
pub mod writer;

// Re-export main types for easier usage
pub use self::alignment::{AlignmentResolver, ResolvedBatch};
pub use self::batch::{plan_batches, Batch};
pub use self::core::{RetryPolicy, TranslationService};
pub use self::merge::{merge, MergeOutcome};
pub use self::pipeline::{PipelineOptions, RunPhase, RunReport, TranslationPipeline};

/// Written for every position of a batch the backend did not answer usably
pub const TRANSLATION_FAILED: &str = "[TRANSLATION_FAILED]";

/// Written for segments whose batch never reached the ledger
pub const MISSING: &str = "[MISSING]";
