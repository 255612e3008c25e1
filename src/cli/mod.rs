//! Command-line interface for sam-qc.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **validate**: Check a SAM file against the format grammar
//! - **summary**: Per-reference mapping, pairing, length and indel statistics
//! - **windows**: Per-window coverage and mean MAPQ along each reference
//!
//! ## Usage
//!
//! ```text
//! # Stop at the first malformed line
//! sam-qc validate sample.sam
//!
//! # Report on records with MAPQ >= 20 that align end to end
//! sam-qc summary sample.sam --min-mapq 20 --fully-mapped-only
//!
//! # Write the report to a file
//! sam-qc summary sample.sam --output report.txt
//!
//! # Window profiles as TSV for plotting
//! sam-qc windows sample.sam --window-size 10000 --format tsv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::stats::length::{DEFAULT_LONG_LENGTH, DEFAULT_SHORT_LENGTH};
use crate::stats::summary::AnalysisConfig;
use crate::stats::window::DEFAULT_WINDOW_SIZE;
use crate::utils::validation::MAX_MAPQ_FILTER;

pub mod summary;
pub mod validate;
pub mod windows;

#[derive(Parser)]
#[command(name = "sam-qc")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Validate SAM files and report alignment statistics")]
#[command(
    long_about = "sam-qc checks that a SAM text file follows the format grammar and, if it does, reports per-reference statistics:\n- Mapped, unmapped and MAPQ-split record counts\n- Properly paired and properly oriented query names\n- Short, intermediate and long alignment lengths\n- Indel rate\n- Coverage and mean MAPQ along fixed-size windows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a SAM file against the format grammar
    Validate(validate::ValidateArgs),

    /// Report per-reference statistics
    Summary(summary::SummaryArgs),

    /// Report coverage and mean MAPQ per window
    Windows(windows::WindowsArgs),
}

/// Thresholds shared by `summary` and `windows`
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Input SAM file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Keep only records with MAPQ at or above this value (0-60)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_MAPQ_FILTER)))]
    pub min_mapq: Option<u8>,

    /// Keep only mapped records whose CIGAR has no clipping, insertion or padding
    #[arg(long)]
    pub fully_mapped_only: bool,

    /// Window size in bases (at most half the longest reference)
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: u64,

    /// Alignments shorter than this are short
    #[arg(long, default_value_t = DEFAULT_SHORT_LENGTH)]
    pub short_length: u64,

    /// Alignments at least this long are long
    #[arg(long, default_value_t = DEFAULT_LONG_LENGTH)]
    pub long_length: u64,

    /// Write output here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl AnalysisArgs {
    #[must_use]
    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_mapq: self.min_mapq,
            fully_mapped_only: self.fully_mapped_only,
            window_size: self.window_size,
            short_length: self.short_length,
            long_length: self.long_length,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Buffered writer over `path`, or stdout when `None`
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
