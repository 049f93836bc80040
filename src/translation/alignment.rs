/*!
 * Alignment of free-text backend responses to batch positions.
 *
 * The backend is asked for `"{n}. {translation}"` lines but is not trusted to
 * comply. Payloads are collected in order of appearance; the ordinals are
 * ignored. A dropped line therefore shifts every later mapping in the batch.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::TRANSLATION_FAILED;

/// Leading ordinal, a separator, then the payload
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s*[.)、:：]\s*(\S.*?)\s*$").unwrap()
});

/// Result of aligning one response to a batch of `N` segments
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBatch {
    /// Exactly `N` strings, `texts[i]` belongs to the i-th segment of the batch
    pub texts: Vec<String>,

    /// Payloads that made it into `texts`
    pub extracted: usize,

    /// Positions filled with the failure sentinel
    pub padded: usize,

    /// Whether numbered extraction found nothing and plain lines were used
    pub used_fallback: bool,

    /// Payloads beyond `N` that were dropped
    pub discarded: usize,
}

impl ResolvedBatch {
    /// Every position is the failure sentinel; used when the client call failed
    pub fn failed(size: usize) -> Self {
        Self {
            texts: vec![TRANSLATION_FAILED.to_string(); size],
            extracted: 0,
            padded: size,
            used_fallback: false,
            discarded: 0,
        }
    }

    /// Fewer usable payloads than segments
    pub fn is_shortfall(&self) -> bool {
        self.padded > 0
    }
}

/// Maps raw backend text onto batch positions
pub struct AlignmentResolver;

impl AlignmentResolver {
    /// Payloads of every numbered line, in order of appearance
    pub fn extract_numbered(raw: &str) -> Vec<String> {
        raw.lines()
            .filter_map(|line| NUMBERED_LINE.captures(line))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Every non-blank line, trimmed
    pub fn extract_lines(raw: &str) -> Vec<String> {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Align `raw` to a batch of `size` segments
    pub fn resolve(raw: &str, size: usize) -> ResolvedBatch {
        let mut payloads = Self::extract_numbered(raw);
        let used_fallback = payloads.is_empty();
        if used_fallback {
            payloads = Self::extract_lines(raw);
        }

        let discarded = payloads.len().saturating_sub(size);
        payloads.truncate(size);

        let extracted = payloads.len();
        let padded = size - extracted;
        payloads.resize(size, TRANSLATION_FAILED.to_string());

        ResolvedBatch {
            texts: payloads,
            extracted,
            padded,
            used_fallback,
            discarded,
        }
    }
}
