use indexmap::IndexMap;

use crate::core::cigar::AlignmentShape;
use crate::core::flags::{is_fully_mapped, SamFlags};

/// RNAME used by records that are not placed on any reference
pub const UNPLACED: &str = "*";

/// The fields of one alignment line needed by the statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub query_name: String,
    pub flags: SamFlags,
    pub reference_name: String,
    /// 1-based leftmost position, 0 when unplaced
    pub position: u64,
    pub mapq: u8,
    pub shape: AlignmentShape,
}

impl AlignmentRecord {
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
    }

    #[must_use]
    pub fn is_fully_mapped(&self) -> bool {
        is_fully_mapped(self.flags, &self.shape)
    }

    /// Reference interval covered by a mapped record.
    ///
    /// Unmapped records, records without a shape and records whose end does
    /// not fit in an `i64` have no span.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        if self.is_unmapped() {
            return None;
        }
        let consumed = i64::try_from(self.shape.reference_len()?).ok()?;
        let start = i64::try_from(self.position).ok()?;
        let end = start.checked_add(consumed - 1)?;
        Some(Span {
            start,
            end,
            quality: self.mapq,
        })
    }
}

/// Inclusive reference interval of a mapped record plus its MAPQ.
///
/// `end = start + consumed - 1`, so a shape consuming no reference bases gives
/// `end == start - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
    pub quality: u8,
}

impl Span {
    #[must_use]
    pub fn new(start: i64, end: i64, quality: u8) -> Self {
        Self {
            start,
            end,
            quality,
        }
    }

    /// Reference bases covered, 0 for an empty span
    #[must_use]
    pub fn len(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1).max(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records grouped by RNAME.
///
/// Declared references come first in header order, followed by any bucket
/// first seen in the data (including [`UNPLACED`]).
#[derive(Debug, Clone, Default)]
pub struct ExtractedRecords {
    buckets: IndexMap<String, Vec<AlignmentRecord>>,
}

impl ExtractedRecords {
    /// Start with one empty bucket per declared reference
    pub fn with_references<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let buckets = names
            .into_iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Self { buckets }
    }

    pub fn push(&mut self, record: AlignmentRecord) {
        self.buckets
            .entry(record.reference_name.clone())
            .or_default()
            .push(record);
    }

    #[must_use]
    pub fn get(&self, reference: &str) -> Option<&[AlignmentRecord]> {
        self.buckets.get(reference).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.buckets.contains_key(reference)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[AlignmentRecord])> {
        self.buckets
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn records(&self) -> impl Iterator<Item = &AlignmentRecord> {
        self.buckets.values().flatten()
    }

    /// Number of buckets, empty ones included
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of records across all buckets
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
pub(crate) fn record(
    qname: &str,
    flag: u16,
    rname: &str,
    pos: u64,
    mapq: u8,
    cigar: &str,
) -> AlignmentRecord {
    AlignmentRecord {
        query_name: qname.to_string(),
        flags: SamFlags::new(flag),
        reference_name: rname.to_string(),
        position: pos,
        mapq,
        shape: cigar.parse().unwrap(),
    }
}
