/*!
 * Tests for aligning backend responses to batch positions
 */

use srtbatch::translation::{AlignmentResolver, TRANSLATION_FAILED};

/// Test a typical chat model answer with a preamble
#[test]
fn test_resolve_withPreambleAndNumberedLines_shouldUseOnlyNumberedLines() {
    let raw = "Here are the translations:\n\n1. 你好\n2. 世界\n3. 再见";
    let resolved = AlignmentResolver::resolve(raw, 3);

    assert_eq!(resolved.texts, vec!["你好", "世界", "再见"]);
    assert!(!resolved.used_fallback);
}

/// Test that a dropped middle line shifts later positions
#[test]
fn test_resolve_withDroppedMiddleLine_shouldShiftAndPadTail() {
    let raw = "1. uno\n3. tres";
    let resolved = AlignmentResolver::resolve(raw, 3);

    assert_eq!(resolved.texts, vec!["uno", "tres", TRANSLATION_FAILED]);
    assert_eq!(resolved.padded, 1);
}

/// Test that unnumbered output falls back to one payload per line
#[test]
fn test_resolve_withUnnumberedOutput_shouldFallBackToLines() {
    let raw = "Bonjour\nAu revoir\nMerci";
    let resolved = AlignmentResolver::resolve(raw, 2);

    assert_eq!(resolved.texts, vec!["Bonjour", "Au revoir"]);
    assert!(resolved.used_fallback);
    assert_eq!(resolved.discarded, 1);
}

/// Test that the result always has exactly the batch size
#[test]
fn test_resolve_withAnyResponse_shouldReturnExactlyBatchSize() {
    let responses = ["", "1. a", "a\nb\nc\nd\ne", "1) x\n2) y\n3) z", "\n\n\n"];
    for raw in responses {
        for size in 1..5 {
            assert_eq!(AlignmentResolver::resolve(raw, size).texts.len(), size);
        }
    }
}
