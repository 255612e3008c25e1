use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::core::cigar::AlignmentShape;
use crate::core::flags::SamFlags;
use crate::core::record::{AlignmentRecord, ExtractedRecords};
use crate::core::reference::ReferenceLengths;
use crate::parsing::ParseError;

/// Which records survive extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionFilter {
    /// Drop records with MAPQ below this value
    pub min_mapq: Option<u8>,
    /// Drop records that are not fully mapped (see [`crate::core::flags::is_fully_mapped`])
    pub fully_mapped_only: bool,
}

impl ExtractionFilter {
    /// Keep everything
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keeps(&self, record: &AlignmentRecord) -> bool {
        if self.fully_mapped_only && !record.is_fully_mapped() {
            return false;
        }
        match self.min_mapq {
            Some(min) => record.mapq >= min,
            None => true,
        }
    }
}

/// Stream the alignment lines of a SAM file into per-reference buckets
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a line is too short or a numeric field does
/// not parse.
pub fn extract_records(
    path: &Path,
    lengths: &ReferenceLengths,
    filter: &ExtractionFilter,
) -> Result<ExtractedRecords, ParseError> {
    let reader = File::open(path).map(BufReader::new)?;
    extract_from_reader(reader, lengths, filter)
}

/// Like [`extract_records`] for any buffered reader
///
/// # Errors
///
/// See [`extract_records`].
pub fn extract_from_reader<R: BufRead>(
    reader: R,
    lengths: &ReferenceLengths,
    filter: &ExtractionFilter,
) -> Result<ExtractedRecords, ParseError> {
    let mut extracted = ExtractedRecords::with_references(lengths.names());
    let mut dropped = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('@') {
            continue;
        }

        let record = parse_record(&line, i + 1)?;
        if filter.keeps(&record) {
            extracted.push(record);
        } else {
            dropped += 1;
        }
    }

    debug!(
        kept = extracted.record_count(),
        dropped,
        buckets = extracted.bucket_count(),
        "extracted records"
    );
    Ok(extracted)
}

/// Parse QNAME, FLAG, RNAME, POS, MAPQ and CIGAR from one alignment line
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` naming the line and column at fault.
pub fn parse_record(line: &str, line_num: usize) -> Result<AlignmentRecord, ParseError> {
    let columns: Vec<&str> = line.trim().split('\t').collect();
    if columns.len() < 6 {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has fewer than 6 fields"
        )));
    }

    Ok(AlignmentRecord {
        query_name: columns[0].to_string(),
        flags: SamFlags::new(parse_column(columns[1], "FLAG", line_num)?),
        reference_name: columns[2].to_string(),
        position: parse_column(columns[3], "POS", line_num)?,
        mapq: parse_column(columns[4], "MAPQ", line_num)?,
        shape: parse_column::<AlignmentShape>(columns[5], "CIGAR", line_num)?,
    })
}

fn parse_column<T: FromStr>(value: &str, name: &str, line_num: usize) -> Result<T, ParseError> {
    value.parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid {name} on line {line_num}: '{value}'"))
    })
}
