use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::record::ExtractedRecords;
use crate::core::reference::ReferenceLengths;
use crate::parsing::header::parse_header_file;
use crate::parsing::records::{extract_records, ExtractionFilter};
use crate::parsing::validate::{validate_file, ValidationOutcome};
use crate::parsing::ParseError;
use crate::stats::counts::{mapping_totals, MappingCounts, MapqSplit};
use crate::stats::length::{indel_stats, length_stats, LengthThresholds, DEFAULT_LONG_LENGTH, DEFAULT_SHORT_LENGTH};
use crate::stats::pairing::pairing_stats;
use crate::stats::window::{window_profiles, WindowProfile, DEFAULT_WINDOW_SIZE};
use crate::utils::validation::{
    validate_length_thresholds, validate_min_mapq, validate_window_size, ConfigError,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Invalid(ValidationOutcome),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// User-supplied thresholds for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisConfig {
    /// Drop records below this MAPQ; also the MAPQ split threshold
    pub min_mapq: Option<u8>,
    /// Keep only fully mapped records
    pub fully_mapped_only: bool,
    pub window_size: u64,
    pub short_length: u64,
    pub long_length: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_mapq: None,
            fully_mapped_only: false,
            window_size: DEFAULT_WINDOW_SIZE,
            short_length: DEFAULT_SHORT_LENGTH,
            long_length: DEFAULT_LONG_LENGTH,
        }
    }
}

impl AnalysisConfig {
    /// Check ranges; the window size is checked against `lengths`
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self, lengths: &ReferenceLengths) -> Result<(), ConfigError> {
        validate_min_mapq(self.min_mapq)?;
        validate_window_size(self.window_size, lengths)?;
        validate_length_thresholds(self.short_length, self.long_length)?;
        Ok(())
    }

    #[must_use]
    pub fn filter(&self) -> ExtractionFilter {
        ExtractionFilter {
            min_mapq: self.min_mapq,
            fully_mapped_only: self.fully_mapped_only,
        }
    }

    /// MAPQ threshold for the per-reference split, 0 when no filter is set
    #[must_use]
    pub fn mapq_threshold(&self) -> u8 {
        self.min_mapq.unwrap_or(0)
    }

    #[must_use]
    pub fn length_thresholds(&self) -> LengthThresholds {
        LengthThresholds {
            short: self.short_length,
            long: self.long_length,
        }
    }
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub name: String,
    /// Declared length, `None` for buckets absent from the header
    pub length: Option<u64>,
    pub total: usize,
    pub mapped: usize,
    pub unmapped: usize,
    pub mapq_below: usize,
    pub mapq_at_or_above: usize,
    pub pct_properly_paired: f64,
    pub pct_properly_oriented: f64,
    pub pct_short: f64,
    pub pct_intermediate: f64,
    pub pct_long: f64,
    pub mean_length: f64,
    pub min_length: u64,
    pub max_length: u64,
    /// Fraction of records with an indel, 2 decimals
    pub indel_rate: f64,
}

/// Everything the report renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub config: AnalysisConfig,
    /// Counts before any filter
    pub raw: MappingCounts,
    /// Counts after filtering
    pub filtered: MappingCounts,
    pub references: Vec<ReferenceSummary>,
}

impl Summary {
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<&ReferenceSummary> {
        self.references.iter().find(|r| r.name == name)
    }
}

/// Output of a full run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub summary: Summary,
    pub windows: Vec<WindowProfile>,
}

/// Build the per-reference table from filtered records, with `raw` holding
/// the unfiltered totals
#[must_use]
pub fn summarize(
    extracted: &ExtractedRecords,
    lengths: &ReferenceLengths,
    raw: MappingCounts,
    config: &AnalysisConfig,
) -> Summary {
    let threshold = config.mapq_threshold();
    let thresholds = config.length_thresholds();

    let references = extracted
        .buckets()
        .map(|(name, records)| {
            let counts = MappingCounts::from_records(records);
            let split = MapqSplit::from_records(records, threshold);
            let pairing = pairing_stats(records);
            let lengths_stats = length_stats(records, thresholds);
            let indels = indel_stats(records);

            ReferenceSummary {
                name: name.to_string(),
                length: lengths.get(name),
                total: counts.total(),
                mapped: counts.mapped,
                unmapped: counts.unmapped,
                mapq_below: split.below,
                mapq_at_or_above: split.at_or_above,
                pct_properly_paired: pairing.pct_properly_paired(),
                pct_properly_oriented: pairing.pct_properly_oriented(),
                pct_short: lengths_stats.pct_short(),
                pct_intermediate: lengths_stats.pct_intermediate(),
                pct_long: lengths_stats.pct_long(),
                mean_length: lengths_stats.mean,
                min_length: lengths_stats.min,
                max_length: lengths_stats.max,
                indel_rate: indels.rate,
            }
        })
        .collect();

    Summary {
        config: *config,
        raw,
        filtered: mapping_totals(extracted),
        references,
    }
}

/// Validate `path`, then compute the summary and window profiles.
///
/// Nothing is computed for a file that fails validation.
///
/// # Errors
///
/// Returns `AnalysisError::Invalid` when validation fails,
/// `AnalysisError::Config` for out-of-range thresholds, or
/// `AnalysisError::Parse` if the file cannot be read.
pub fn analyze(path: &Path, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    let outcome = validate_file(path)?;
    if !outcome.is_valid() {
        return Err(AnalysisError::Invalid(outcome));
    }
    info!("{outcome}");

    let lengths = parse_header_file(path)?;
    config.validate(&lengths)?;

    let filter = config.filter();
    let extracted = extract_records(path, &lengths, &filter)?;
    let raw = if filter == ExtractionFilter::none() {
        mapping_totals(&extracted)
    } else {
        debug!(?filter, "second pass for unfiltered totals");
        mapping_totals(&extract_records(path, &lengths, &ExtractionFilter::none())?)
    };

    let summary = summarize(&extracted, &lengths, raw, config);
    let windows = window_profiles(&extracted, &lengths, config.window_size);

    Ok(Analysis { summary, windows })
}
