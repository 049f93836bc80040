/*!
 * Batch planning.
 *
 * Segments already recorded in the progress ledger are skipped, the rest are
 * cut into consecutive groups of at most `batch_size` in source order.
 */

use std::collections::HashSet;

use crate::errors::PipelineError;
use crate::providers::BatchRequest;
use crate::segment_store::Segment;

/// A group of pending segments translated with one request
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// 1-based position in the plan, used in logs
    pub number: usize,

    /// Segments in source order
    pub segments: Vec<Segment>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Build the request for this batch
    pub fn to_request(&self, prompt_template: &str) -> BatchRequest {
        BatchRequest::new(
            prompt_template,
            self.segments.iter().map(|s| s.text.clone()).collect(),
        )
    }
}

/// Split the segments not in `resume_set` into batches of at most `batch_size`
///
/// Every batch but the last holds exactly `batch_size` segments. Nothing is
/// produced when every segment is already resolved.
pub fn plan_batches(
    segments: &[Segment],
    resume_set: &HashSet<String>,
    batch_size: usize,
) -> Result<Vec<Batch>, PipelineError> {
    if batch_size == 0 {
        return Err(PipelineError::InvalidBatchSize(batch_size));
    }

    let pending: Vec<Segment> = segments
        .iter()
        .filter(|segment| !resume_set.contains(&segment.index))
        .cloned()
        .collect();

    Ok(pending
        .chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            number: i + 1,
            segments: chunk.to_vec(),
        })
        .collect())
}
