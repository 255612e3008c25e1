//! # sam-qc
//!
//! A library for validating SAM alignment files and reporting alignment statistics.
//!
//! Before trusting the output of an aligner it helps to know that the file is
//! well formed and what the alignments look like: how many reads mapped, how
//! confidently, whether mates paired up, how long the alignments are, and how
//! coverage is spread along each reference.
//!
//! `sam-qc` runs a fixed pipeline over a single SAM text file:
//!
//! 1. **Validation**: every line is checked against the format grammar, stopping
//!    at the first violation
//! 2. **Header parsing**: `@SQ` lines give the name and length of each reference
//! 3. **Record extraction**: alignment lines are bucketed by reference, optionally
//!    filtered by MAPQ and to fully mapped records
//! 4. **Statistics**: per-reference counts, pairing, lengths and indel rate
//! 5. **Windowing**: coverage and mean MAPQ over fixed-size windows
//!
//! ## Example
//!
//! ```rust,no_run
//! use sam_qc::{analyze, AnalysisConfig};
//! use std::path::Path;
//!
//! let config = AnalysisConfig {
//!     min_mapq: Some(20),
//!     ..AnalysisConfig::default()
//! };
//! let analysis = analyze(Path::new("sample.sam"), &config).unwrap();
//!
//! for r in &analysis.summary.references {
//!     println!("{}: {} mapped, {:.2}% properly paired", r.name, r.mapped, r.pct_properly_paired);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Flags, CIGAR shapes, records and reference lengths
//! - [`parsing`]: Grammar validation, header parsing and record extraction
//! - [`stats`]: Counts, pairing, lengths, windows and the per-reference summary
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod stats;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::flags::SamFlags;
pub use core::record::{AlignmentRecord, ExtractedRecords};
pub use core::reference::{ReferenceLengths, ReferenceSequence};
pub use parsing::validate::{validate_file, ValidationOutcome};
pub use stats::summary::{analyze, Analysis, AnalysisConfig, AnalysisError, Summary};
pub use stats::window::WindowProfile;
