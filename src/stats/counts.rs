use indexmap::IndexMap;
use serde::Serialize;

use crate::core::record::{AlignmentRecord, ExtractedRecords};

/// Mapped vs unmapped record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingCounts {
    pub mapped: usize,
    pub unmapped: usize,
}

impl MappingCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AlignmentRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            if record.is_unmapped() {
                counts.unmapped += 1;
            } else {
                counts.mapped += 1;
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.mapped + self.unmapped
    }
}

/// Records split on a MAPQ threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MapqSplit {
    /// MAPQ >= threshold
    pub at_or_above: usize,
    /// MAPQ < threshold
    pub below: usize,
}

impl MapqSplit {
    #[must_use]
    pub fn from_records(records: &[AlignmentRecord], threshold: u8) -> Self {
        let at_or_above = records.iter().filter(|r| r.mapq >= threshold).count();
        Self {
            at_or_above,
            below: records.len() - at_or_above,
        }
    }
}

/// Mapped/unmapped/total over every bucket
#[must_use]
pub fn mapping_totals(extracted: &ExtractedRecords) -> MappingCounts {
    MappingCounts::from_records(extracted.records())
}

/// Mapped/unmapped per reference bucket, in bucket order
#[must_use]
pub fn mapping_per_reference(extracted: &ExtractedRecords) -> IndexMap<String, MappingCounts> {
    extracted
        .buckets()
        .map(|(name, records)| (name.to_string(), MappingCounts::from_records(records)))
        .collect()
}

/// MAPQ split per reference bucket, in bucket order
#[must_use]
pub fn mapq_split_per_reference(
    extracted: &ExtractedRecords,
    threshold: u8,
) -> IndexMap<String, MapqSplit> {
    extracted
        .buckets()
        .map(|(name, records)| (name.to_string(), MapqSplit::from_records(records, threshold)))
        .collect()
}
