use std::io::Write;
use std::path::Path;

use clap::Args;

use crate::cli::{open_output, AnalysisArgs, OutputFormat};
use crate::stats::summary::{analyze, AnalysisConfig, ReferenceSummary, Summary};

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Table header; the length classes are labelled with their thresholds
fn columns(config: &AnalysisConfig) -> Vec<String> {
    let short = format!("<{}BP%", config.short_length);
    let long = format!(">{}BP%", config.long_length);
    [
        "CHR_NAME", "TOT_READS", "MAP", "UMAP", "MAPQ-", "MAPQ+", "PAIR%", "RF%", short.as_str(),
        "INT%", long.as_str(), "MEANL", "MINL", "MAXL", "INDEL%",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Execute summary subcommand
///
/// # Errors
///
/// Returns an error if the file fails validation, a threshold is out of range,
/// or the report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SummaryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let args = args.analysis;
    let config = args.config();
    let analysis = analyze(&args.input, &config)?;
    let summary = &analysis.summary;

    if verbose {
        eprintln!(
            "Kept {} of {} records across {} references",
            summary.filtered.total(),
            summary.raw.total(),
            summary.references.len()
        );
    }

    let generated = chrono::Utc::now().to_rfc3339();
    let mut out = open_output(args.output.as_deref())?;
    match format {
        OutputFormat::Text => write_text_report(&mut out, &args.input, summary, &generated)?,
        OutputFormat::Json => write_json_report(&mut out, &args.input, summary, &generated)?,
        OutputFormat::Tsv => write_tsv_report(&mut out, summary)?,
    }
    out.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}

fn filter_description(summary: &Summary) -> String {
    let mut filters = Vec::new();
    if let Some(q) = summary.config.min_mapq {
        filters.push(format!("MAPQ >= {q}"));
    }
    if summary.config.fully_mapped_only {
        filters.push("fully mapped only".to_string());
    }
    if filters.is_empty() {
        "none".to_string()
    } else {
        filters.join(", ")
    }
}

fn write_text_report(
    out: &mut dyn Write,
    input: &Path,
    summary: &Summary,
    generated: &str,
) -> anyhow::Result<()> {
    let config = &summary.config;

    writeln!(out, "SAM QC Report")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "Generated: {generated}")?;
    writeln!(out, "Input: {}", input.display())?;
    writeln!(out, "Filters: {}", filter_description(summary))?;
    writeln!(
        out,
        "Thresholds: short < {}, long >= {}, MAPQ split at {}",
        config.short_length,
        config.long_length,
        config.mapq_threshold()
    )?;

    writeln!(out, "\nRecords before filtering:")?;
    writeln!(out, "  Total: {}", summary.raw.total())?;
    writeln!(out, "  Mapped: {}", summary.raw.mapped)?;
    writeln!(out, "  Unmapped: {}", summary.raw.unmapped)?;
    writeln!(out, "\nRecords after filtering:")?;
    writeln!(out, "  Total: {}", summary.filtered.total())?;
    writeln!(out, "  Mapped: {}", summary.filtered.mapped)?;
    writeln!(out, "  Unmapped: {}", summary.filtered.unmapped)?;
    writeln!(out)?;

    let columns = columns(config);
    let name_width = summary
        .references
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once(columns[0].len()))
        .max()
        .unwrap_or(columns[0].len());

    write!(out, "{:<name_width$}", columns[0])?;
    for column in &columns[1..] {
        write!(out, " {column:>9}")?;
    }
    writeln!(out)?;

    for r in &summary.references {
        writeln!(
            out,
            "{:<name_width$} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9} {:>9} {:>9.2}",
            r.name,
            r.total,
            r.mapped,
            r.unmapped,
            r.mapq_below,
            r.mapq_at_or_above,
            r.pct_properly_paired,
            r.pct_properly_oriented,
            r.pct_short,
            r.pct_intermediate,
            r.pct_long,
            r.mean_length,
            r.min_length,
            r.max_length,
            r.indel_rate * 100.0,
        )?;
    }

    let threshold = config.mapq_threshold();
    writeln!(out, "\nLegend:")?;
    writeln!(out, "  CHR_NAME   reference sequence name (* for unplaced records)")?;
    writeln!(out, "  TOT_READS  records on the reference")?;
    writeln!(out, "  MAP        mapped records")?;
    writeln!(out, "  UMAP       unmapped records")?;
    writeln!(out, "  MAPQ-      records with MAPQ below {threshold}")?;
    writeln!(out, "  MAPQ+      records with MAPQ at or above {threshold}")?;
    writeln!(out, "  PAIR%      query names that are properly paired")?;
    writeln!(out, "  RF%        query names whose mates lie on opposite strands")?;
    writeln!(
        out,
        "  {:<10} alignments shorter than {} bp",
        columns[8], config.short_length
    )?;
    writeln!(
        out,
        "  INT%       alignments between {} and {} bp",
        config.short_length, config.long_length
    )?;
    writeln!(
        out,
        "  {:<10} alignments of at least {} bp",
        columns[10], config.long_length
    )?;
    writeln!(out, "  MEANL      mean alignment length on the reference")?;
    writeln!(out, "  MINL       shortest alignment length")?;
    writeln!(out, "  MAXL       longest alignment length")?;
    writeln!(out, "  INDEL%     records with an insertion or deletion")?;

    Ok(())
}

fn write_json_report(
    out: &mut dyn Write,
    input: &Path,
    summary: &Summary,
    generated: &str,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": input.display().to_string(),
        "generated": generated,
        "summary": summary,
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn write_tsv_report(out: &mut dyn Write, summary: &Summary) -> anyhow::Result<()> {
    writeln!(
        out,
        "reference\tlength\ttotal\tmapped\tunmapped\tmapq_below\tmapq_at_or_above\tpct_properly_paired\tpct_properly_oriented\tpct_short\tpct_intermediate\tpct_long\tmean_length\tmin_length\tmax_length\tindel_rate"
    )?;
    for r in &summary.references {
        write_tsv_row(out, r)?;
    }
    Ok(())
}

fn write_tsv_row(out: &mut dyn Write, r: &ReferenceSummary) -> anyhow::Result<()> {
    let length = r.length.map(|l| l.to_string()).unwrap_or_default();
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.3}\t{}\t{}\t{:.2}",
        r.name,
        length,
        r.total,
        r.mapped,
        r.unmapped,
        r.mapq_below,
        r.mapq_at_or_above,
        r.pct_properly_paired,
        r.pct_properly_oriented,
        r.pct_short,
        r.pct_intermediate,
        r.pct_long,
        r.mean_length,
        r.min_length,
        r.max_length,
        r.indel_rate,
    )?;
    Ok(())
}
