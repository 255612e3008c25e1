use indexmap::IndexMap;
use serde::Serialize;

use crate::core::record::{AlignmentRecord, ExtractedRecords};
use crate::utils::validation::{count_to_f64, ratio, round_to};

/// Default upper bound (exclusive) for a short alignment
pub const DEFAULT_SHORT_LENGTH: u64 = 80;
/// Default lower bound (inclusive) for a long alignment
pub const DEFAULT_LONG_LENGTH: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthThresholds {
    /// Lengths strictly below this are short
    pub short: u64,
    /// Lengths at or above this are long
    pub long: u64,
}

impl Default for LengthThresholds {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_LENGTH,
            long: DEFAULT_LONG_LENGTH,
        }
    }
}

/// Distribution of reference-consumed alignment lengths.
///
/// Only records with an alignment shape are measured. An empty set reports
/// zero for every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LengthStats {
    pub count: usize,
    pub short: usize,
    pub long: usize,
    /// Mean length, 3 decimals
    pub mean: f64,
    pub min: u64,
    pub max: u64,
}

impl LengthStats {
    #[must_use]
    pub fn intermediate(&self) -> usize {
        self.count.saturating_sub(self.short + self.long)
    }

    #[must_use]
    pub fn pct_short(&self) -> f64 {
        round_to(100.0 * ratio(self.short, self.count), 2)
    }

    #[must_use]
    pub fn pct_long(&self) -> f64 {
        round_to(100.0 * ratio(self.long, self.count), 2)
    }

    /// Remainder after short and long, 0.0 for an empty set
    #[must_use]
    pub fn pct_intermediate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round_to(100.0 - self.pct_short() - self.pct_long(), 2)
    }
}

#[must_use]
pub fn length_stats<'a>(
    records: impl IntoIterator<Item = &'a AlignmentRecord>,
    thresholds: LengthThresholds,
) -> LengthStats {
    let lengths: Vec<u64> = records
        .into_iter()
        .filter_map(|r| r.shape.reference_len())
        .collect();

    let (Some(&min), Some(&max)) = (lengths.iter().min(), lengths.iter().max()) else {
        return LengthStats::default();
    };

    let sum: u128 = lengths.iter().map(|&l| u128::from(l)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = round_to(sum as f64 / count_to_f64(lengths.len()), 3);

    LengthStats {
        count: lengths.len(),
        short: lengths.iter().filter(|&&l| l < thresholds.short).count(),
        long: lengths.iter().filter(|&&l| l >= thresholds.long).count(),
        mean,
        min,
        max,
    }
}

#[must_use]
pub fn length_stats_per_reference(
    extracted: &ExtractedRecords,
    thresholds: LengthThresholds,
) -> IndexMap<String, LengthStats> {
    extracted
        .buckets()
        .map(|(name, records)| (name.to_string(), length_stats(records, thresholds)))
        .collect()
}

/// Share of records carrying at least one inserted or deleted base
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndelStats {
    pub records: usize,
    pub with_indel: usize,
    /// `with_indel / records`, 2 decimals, 0.0 when there are no records
    pub rate: f64,
}

#[must_use]
pub fn indel_stats<'a>(records: impl IntoIterator<Item = &'a AlignmentRecord>) -> IndelStats {
    let mut total = 0;
    let mut with_indel = 0;
    for record in records {
        total += 1;
        if record.shape.has_indel() {
            with_indel += 1;
        }
    }

    IndelStats {
        records: total,
        with_indel,
        rate: round_to(ratio(with_indel, total), 2),
    }
}

#[must_use]
pub fn indel_stats_per_reference(extracted: &ExtractedRecords) -> IndexMap<String, IndelStats> {
    extracted
        .buckets()
        .map(|(name, records)| (name.to_string(), indel_stats(records)))
        .collect()
}
