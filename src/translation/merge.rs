/*!
 * Merging of source segments with ledger results.
 */

use std::collections::HashMap;

use crate::ledger::LedgerEntry;
use crate::segment_store::Segment;

use super::{MISSING, TRANSLATION_FAILED};

/// Final ordered sequence plus how each entry was resolved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    /// One entry per source segment, in source order
    pub entries: Vec<LedgerEntry>,

    /// Entries with a real translation
    pub translated: usize,

    /// Entries holding the failure sentinel
    pub failed: usize,

    /// Entries never attempted
    pub missing: usize,
}

/// Look up every segment in `translations`, substituting the missing sentinel
///
/// Order and timestamps come from `segments`; only the text comes from the map.
pub fn merge(segments: &[Segment], translations: &HashMap<String, String>) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        entries: Vec::with_capacity(segments.len()),
        ..MergeOutcome::default()
    };

    for segment in segments {
        let text = match translations.get(&segment.index) {
            Some(text) if text == TRANSLATION_FAILED => {
                outcome.failed += 1;
                text.as_str()
            }
            Some(text) => {
                outcome.translated += 1;
                text.as_str()
            }
            None => {
                outcome.missing += 1;
                MISSING
            }
        };
        outcome.entries.push(LedgerEntry::from_segment(segment, text));
    }

    outcome
}
