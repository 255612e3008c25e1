//! Position-binned coverage and mean MAPQ along each reference.
//!
//! Window `i` holds coordinates `[i * window_size, (i + 1) * window_size - 1]`,
//! so a reference of length `L` needs `L / window_size + 1` windows.
//!
//! A span adds to each window it touches the fraction of the window it
//! covers: `overlap_bases / window_size`. Windows fully inside a span receive
//! 1.0, and the coverage of a reference sums to
//! `sum(end - start + 1) / window_size` over its spans.
//!
//! Mean quality is the plain mean of the MAPQ of every span touching a
//! window, not weighted by overlap. Windows no span touches report 0.0.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::core::record::{ExtractedRecords, Span, UNPLACED};
use crate::core::reference::ReferenceLengths;
use crate::utils::validation::round_to;

/// Default window size in bases
pub const DEFAULT_WINDOW_SIZE: u64 = 1000;

/// Binned coverage and quality along one reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowProfile {
    pub reference: String,
    pub length: u64,
    pub window_size: u64,
    /// Fractional read coverage per window, 3 decimals
    pub coverage: Vec<f64>,
    /// Mean MAPQ per window, 3 decimals, 0.0 for empty windows
    pub mean_quality: Vec<f64>,
}

impl WindowProfile {
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.coverage.len()
    }

    /// First coordinate of window `index`
    #[must_use]
    pub fn window_start(&self, index: usize) -> u64 {
        index as u64 * self.window_size
    }

    /// Mean quality rescaled to `[0, 1]` across this reference's windows,
    /// 0.5 everywhere when all windows share one value
    #[must_use]
    pub fn normalized_quality(&self) -> Vec<f64> {
        let min = self.mean_quality.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .mean_quality
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        if (max - min).abs() < f64::EPSILON {
            return vec![0.5; self.mean_quality.len()];
        }
        self.mean_quality
            .iter()
            .map(|q| (q - min) / (max - min))
            .collect()
    }
}

/// Number of windows needed to cover `length` bases
#[must_use]
pub fn window_count(length: u64, window_size: u64) -> usize {
    usize::try_from(length / window_size + 1).unwrap_or(usize::MAX)
}

/// Fraction of window `index` covered by `span`
#[must_use]
pub fn window_weight(span: &Span, index: i64, window_size: i64) -> f64 {
    let window_start = index * window_size;
    let window_end = window_start + window_size - 1;
    let overlap = span.end.min(window_end) - span.start.max(window_start) + 1;

    #[allow(clippy::cast_precision_loss)]
    let weight = overlap.max(0) as f64 / window_size as f64;
    weight
}

/// Bin `spans` along a reference of `length` bases.
///
/// Spans starting past the last window are skipped; spans running past it
/// are truncated. Both are logged.
#[must_use]
pub fn compute_windows(
    reference: &str,
    length: u64,
    spans: &[Span],
    window_size: u64,
) -> WindowProfile {
    let count = window_count(length, window_size);
    let mut coverage = vec![0.0; count];
    let mut quality_sum = vec![0u64; count];
    let mut quality_n = vec![0u64; count];

    let size = i64::try_from(window_size).unwrap_or(i64::MAX);
    let last_index = i64::try_from(count).unwrap_or(i64::MAX) - 1;

    for span in spans {
        let first = span.start.div_euclid(size);
        // A span consuming no reference bases still lands in its start window
        let mut last = span.end.div_euclid(size).max(first);

        if first > last_index || first < 0 {
            warn!(
                reference,
                start = span.start,
                end = span.end,
                length,
                "alignment starts outside the reference, skipping"
            );
            continue;
        }
        if last > last_index {
            warn!(
                reference,
                start = span.start,
                end = span.end,
                length,
                "alignment runs past the reference end, truncating"
            );
            last = last_index;
        }

        for index in first..=last {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let slot = index as usize;
            coverage[slot] += window_weight(span, index, size);
            quality_sum[slot] += u64::from(span.quality);
            quality_n[slot] += 1;
        }
    }

    let coverage = coverage.into_iter().map(|c| round_to(c, 3)).collect();
    let mean_quality = quality_sum
        .into_iter()
        .zip(quality_n)
        .map(|(sum, n)| {
            if n == 0 {
                0.0
            } else {
                #[allow(clippy::cast_precision_loss)]
                let mean = sum as f64 / n as f64;
                round_to(mean, 3)
            }
        })
        .collect();

    WindowProfile {
        reference: reference.to_string(),
        length,
        window_size,
        coverage,
        mean_quality,
    }
}

/// Spans of mapped records per placed reference, in bucket order.
/// The unplaced bucket is left out.
#[must_use]
pub fn spans_per_reference(extracted: &ExtractedRecords) -> IndexMap<String, Vec<Span>> {
    extracted
        .buckets()
        .filter(|(name, _)| *name != UNPLACED)
        .map(|(name, records)| {
            let spans = records.iter().filter_map(|r| r.span()).collect();
            (name.to_string(), spans)
        })
        .collect()
}

/// One profile per declared reference, in header order. Mapped records on
/// references missing from the header have no length to bin against and are
/// reported and skipped.
#[must_use]
pub fn window_profiles(
    extracted: &ExtractedRecords,
    lengths: &ReferenceLengths,
    window_size: u64,
) -> Vec<WindowProfile> {
    let spans = spans_per_reference(extracted);

    for (name, reference_spans) in &spans {
        if !lengths.contains(name) && !reference_spans.is_empty() {
            warn!(
                reference = %name,
                alignments = reference_spans.len(),
                "reference not declared in header, skipping windows"
            );
        }
    }

    lengths
        .iter()
        .map(|(name, length)| {
            let reference_spans = spans.get(name).map_or(&[][..], Vec::as_slice);
            compute_windows(name, length, reference_spans, window_size)
        })
        .collect()
}
