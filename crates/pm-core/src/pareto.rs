//! Pareto reduction of the variant set.

use crate::types::Coverage;
use crate::variant::Variant;

/// Keeps the shortest frequency-descending prefix covering `target` of cases.
///
/// Variants are sorted by frequency, highest first; equal frequencies keep
/// their incoming order. The variant whose share crosses the threshold is
/// included and nothing after it. A non-empty input always yields a
/// non-empty output.
#[allow(clippy::cast_precision_loss)]
pub fn pareto_reduce(mut variants: Vec<Variant>, target: Coverage) -> Vec<Variant> {
    let total: u64 = variants.iter().map(|v| v.frequency).sum();
    variants.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    let mut covered = 0;
    let mut keep = 0;
    for variant in &variants {
        covered += variant.frequency;
        keep += 1;
        if covered as f64 / total as f64 >= target.value() {
            break;
        }
    }
    let dropped = variants.len() - keep;
    variants.truncate(keep);

    tracing::debug!(kept = keep, dropped, target = %target, "reduced variants");
    variants
}
