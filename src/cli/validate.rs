use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::validate::{validate_file, ValidationOutcome};

#[derive(Args)]
pub struct ValidateArgs {
    /// Input SAM file
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not validate.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        eprintln!("Validating {}", args.input.display());
    }

    let outcome = validate_file(&args.input)?;

    match format {
        // A failure is reported once, on stderr, by the error below
        OutputFormat::Text if outcome.is_valid() => println!("{outcome}"),
        OutputFormat::Text => {}
        OutputFormat::Json => print_json_outcome(&args, &outcome)?,
        OutputFormat::Tsv => print_tsv_outcome(&outcome),
    }

    if !outcome.is_valid() {
        anyhow::bail!("{outcome}");
    }
    Ok(())
}

fn print_json_outcome(args: &ValidateArgs, outcome: &ValidationOutcome) -> anyhow::Result<()> {
    let mut output = serde_json::json!({
        "path": args.input.display().to_string(),
        "valid": outcome.is_valid(),
        "message": outcome.to_string(),
    });

    match outcome {
        ValidationOutcome::Valid {
            header_lines,
            alignment_lines,
        } => {
            output["header_lines"] = (*header_lines).into();
            output["alignment_lines"] = (*alignment_lines).into();
        }
        ValidationOutcome::GrammarViolation { line, violation } => {
            output["line"] = (*line).into();
            output["field"] = violation.field().map(|f| f.name()).into();
            output["violation"] = violation.to_string().into();
        }
        ValidationOutcome::InvalidPath(_) | ValidationOutcome::InvalidExtension(_) => {}
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_outcome(outcome: &ValidationOutcome) {
    let (line, field) = match outcome {
        ValidationOutcome::GrammarViolation { line, violation } => (
            line.to_string(),
            violation.field().map_or("", |f| f.name()).to_string(),
        ),
        _ => (String::new(), String::new()),
    };

    println!("valid\tline\tfield\tmessage");
    println!("{}\t{}\t{}\t{}", outcome.is_valid(), line, field, outcome);
}
