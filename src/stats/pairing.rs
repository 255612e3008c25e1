use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::flags::{classify_pair, SamFlags};
use crate::core::record::{AlignmentRecord, ExtractedRecords};
use crate::utils::validation::{ratio, round_to};

/// Pairing and orientation counts over a set of records.
///
/// Every distinct query name counts toward the denominator; only names with
/// exactly two records can count as properly paired or oriented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PairingStats {
    pub query_names: usize,
    pub two_record_names: usize,
    pub properly_paired: usize,
    pub properly_oriented: usize,
}

impl PairingStats {
    /// Percentage of query names that are properly paired, 2 decimals
    #[must_use]
    pub fn pct_properly_paired(&self) -> f64 {
        round_to(100.0 * ratio(self.properly_paired, self.query_names), 2)
    }

    /// Percentage of query names that are properly oriented, 2 decimals
    #[must_use]
    pub fn pct_properly_oriented(&self) -> f64 {
        round_to(100.0 * ratio(self.properly_oriented, self.query_names), 2)
    }
}

#[must_use]
pub fn pairing_stats<'a>(records: impl IntoIterator<Item = &'a AlignmentRecord>) -> PairingStats {
    let mut by_name: HashMap<&str, Vec<SamFlags>> = HashMap::new();
    for record in records {
        by_name
            .entry(record.query_name.as_str())
            .or_default()
            .push(record.flags);
    }

    let mut stats = PairingStats {
        query_names: by_name.len(),
        ..PairingStats::default()
    };

    for flags in by_name.values() {
        let [f1, f2] = flags.as_slice() else {
            continue;
        };
        stats.two_record_names += 1;

        let pair = classify_pair(*f1, *f2);
        if pair.properly_paired {
            stats.properly_paired += 1;
        }
        if pair.properly_oriented {
            stats.properly_oriented += 1;
        }
    }

    stats
}

/// Pairing statistics for each reference bucket
#[must_use]
pub fn pairing_per_reference(extracted: &ExtractedRecords) -> IndexMap<String, PairingStats> {
    extracted
        .buckets()
        .map(|(name, records)| (name.to_string(), pairing_stats(records)))
        .collect()
}
