use std::io::Write;

use clap::Args;

use crate::cli::{open_output, AnalysisArgs, OutputFormat};
use crate::stats::summary::analyze;
use crate::stats::window::WindowProfile;

#[derive(Args)]
pub struct WindowsArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Only report these references (repeatable)
    #[arg(short, long = "reference")]
    pub references: Vec<String>,
}

/// Execute windows subcommand
///
/// # Errors
///
/// Returns an error if the file fails validation, a threshold is out of range,
/// a requested reference is not declared, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: WindowsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let analysis = analyze(&args.analysis.input, &args.analysis.config())?;

    let profiles: Vec<&WindowProfile> = if args.references.is_empty() {
        analysis.windows.iter().collect()
    } else {
        args.references
            .iter()
            .map(|name| {
                analysis
                    .windows
                    .iter()
                    .find(|p| &p.reference == name)
                    .ok_or_else(|| anyhow::anyhow!("Reference '{name}' not declared in header"))
            })
            .collect::<anyhow::Result<_>>()?
    };

    if verbose {
        let windows: usize = profiles.iter().map(|p| p.window_count()).sum();
        eprintln!(
            "{} windows of {} bp across {} references",
            windows,
            args.analysis.window_size,
            profiles.len()
        );
    }

    let mut out = open_output(args.analysis.output.as_deref())?;
    match format {
        OutputFormat::Text => write_text_windows(&mut out, &profiles)?,
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&profiles)?)?;
        }
        OutputFormat::Tsv => write_tsv_windows(&mut out, &profiles)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text_windows(out: &mut dyn Write, profiles: &[&WindowProfile]) -> anyhow::Result<()> {
    for profile in profiles {
        writeln!(
            out,
            "{} (length {}, {} windows of {} bp)",
            profile.reference,
            profile.length,
            profile.window_count(),
            profile.window_size
        )?;
        writeln!(out, "{}", "─".repeat(60))?;
        writeln!(
            out,
            "{:>12} {:>10} {:>10} {:>10}",
            "start", "coverage", "mean_mapq", "quality"
        )?;

        let normalized = profile.normalized_quality();
        for (i, norm) in normalized.iter().enumerate() {
            writeln!(
                out,
                "{:>12} {:>10.3} {:>10.3} {:>10.3}",
                profile.window_start(i),
                profile.coverage[i],
                profile.mean_quality[i],
                norm
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_tsv_windows(out: &mut dyn Write, profiles: &[&WindowProfile]) -> anyhow::Result<()> {
    writeln!(
        out,
        "reference\twindow\tstart\tcoverage\tmean_mapq\tnormalized_quality"
    )?;
    for profile in profiles {
        let normalized = profile.normalized_quality();
        for (i, norm) in normalized.iter().enumerate() {
            writeln!(
                out,
                "{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}",
                profile.reference,
                i,
                profile.window_start(i),
                profile.coverage[i],
                profile.mean_quality[i],
                norm
            )?;
        }
    }
    Ok(())
}
