//! End-to-end tests of the sam-qc binary on temporary SAM files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:1000
@SQ\tSN:chr2\tLN:500
@PG\tID:bwa\tPN:bwa
p1\t99\tchr1\t100\t60\t50M\t=\t300\t250\tACGTACGT\tIIIIIIII
p1\t147\tchr1\t300\t60\t50M\t=\t100\t-250\tACGTACGT\tIIIIIIII
s1\t0\tchr1\t500\t40\t100M\t*\t0\t0\tACGT\tIIII
s2\t16\tchr2\t10\t3\t30M2D30M\t*\t0\t0\tACGT\tIIII
u1\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII
";

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    temp.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    temp.flush().expect("Failed to flush temp file");
    temp
}

fn sam_qc() -> Command {
    Command::cargo_bin("sam-qc").expect("binary should build")
}

#[test]
fn test_validate_accepts_well_formed_file() {
    let temp = write_temp(SAM, ".sam");

    sam_qc()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "File is valid (4 header lines, 5 alignment lines)",
        ));
}

#[test]
fn test_validate_reports_line_and_field() {
    let bad = SAM.replace("s1\t0\t", "s1\tabc\t");
    let temp = write_temp(&bad, ".sam");

    sam_qc()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Format error at line 7: FLAG must be an integer",
        ))
        .stderr(predicate::function(|err: &str| {
            err.matches("Format error at line 7").count() == 1
        }));
}

#[test]
fn test_validate_json_names_the_field() {
    let bad = SAM.replace("\t40\t100M", "\t256\t100M");
    let temp = write_temp(&bad, ".sam");

    let output = sam_qc()
        .args(["validate", "--format", "json"])
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");
    assert!(!output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["line"], 7);
    assert_eq!(json["field"], "MAPQ");
}

#[test]
fn test_validate_missing_file() {
    sam_qc()
        .args(["validate", "/nonexistent/reads.sam"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No file found"));
}

#[test]
fn test_validate_wrong_extension() {
    let temp = write_temp(SAM, ".txt");

    sam_qc()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("File must be in .sam format"));
}

#[test]
fn test_validate_header_without_length() {
    let bad = SAM.replace("@SQ\tSN:chr2\tLN:500", "@SQ\tSN:chr2");
    let temp = write_temp(&bad, ".sam");

    sam_qc()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Format error at line 3: @SQ must contain SN: and LN:",
        ));
}

#[test]
fn test_summary_text_report() {
    let temp = write_temp(SAM, ".sam");

    sam_qc()
        .args(["summary", "--window-size", "100"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated:"))
        .stdout(predicate::str::contains("CHR_NAME"))
        .stdout(predicate::str::contains("INDEL%"))
        .stdout(predicate::str::contains("Legend:"))
        .stdout(predicate::str::is_match(r"(?m)^chr1\s+3\s+3\s+0\s").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^chr2\s+1\s+1\s+0\s").unwrap());
}

#[test]
fn test_summary_columns_name_length_thresholds() {
    let temp = write_temp(SAM, ".sam");

    sam_qc()
        .args(["summary", "-w", "100"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("<80BP%"))
        .stdout(predicate::str::contains(">200BP%"))
        .stdout(predicate::str::contains("SBP%").not());

    sam_qc()
        .args(["summary", "-w", "100", "--short-length", "50", "--long-length", "150"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^CHR_NAME.*<50BP%\s+INT%\s+>150BP%").unwrap())
        .stdout(predicate::str::contains("  <50BP%     alignments shorter than 50 bp"));
}

#[test]
fn test_summary_json_with_filters() {
    let temp = write_temp(SAM, ".sam");

    let output = sam_qc()
        .args(["summary", "--format", "json", "--min-mapq", "20", "-w", "100"])
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let summary = &json["summary"];
    assert_eq!(summary["raw"]["mapped"], 4);
    assert_eq!(summary["raw"]["unmapped"], 1);
    assert_eq!(summary["filtered"]["mapped"], 3);
    assert_eq!(summary["filtered"]["unmapped"], 0);

    let references = summary["references"].as_array().unwrap();
    assert_eq!(references.len(), 2);
    assert_eq!(references[0]["name"], "chr1");
    assert_eq!(references[0]["length"], 1000);
    assert_eq!(references[1]["name"], "chr2");
    assert_eq!(references[1]["total"], 0);
}

#[test]
fn test_summary_tsv() {
    let temp = write_temp(SAM, ".sam");

    sam_qc()
        .args(["summary", "--format", "tsv", "-w", "100"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("reference\tlength\ttotal"))
        .stdout(predicate::str::contains("chr2\t500\t1\t1\t0\t"))
        .stdout(predicate::str::contains("*\t\t1\t0\t1\t"));
}

#[test]
fn test_summary_writes_output_file() {
    let temp = write_temp(SAM, ".sam");
    let report = NamedTempFile::with_suffix(".txt").expect("Failed to create temp file");

    sam_qc()
        .args(["summary", "-w", "100", "--output"])
        .arg(report.path())
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));

    let content = std::fs::read_to_string(report.path()).expect("report should exist");
    assert!(content.contains("CHR_NAME"));
    assert!(content.contains("Legend:"));
}

#[test]
fn test_summary_rejects_bad_thresholds() {
    let temp = write_temp(SAM, ".sam");

    // Window larger than half the longest reference
    sam_qc()
        .arg("summary")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Window size must not exceed 500"));

    sam_qc()
        .args(["summary", "--min-mapq", "61"])
        .arg(temp.path())
        .assert()
        .failure();

    sam_qc()
        .args(["summary", "-w", "100", "--short-length", "300"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Short read threshold"));
}

#[test]
fn test_summary_refuses_invalid_file() {
    let bad = SAM.replace("\t0\t0\tACGT\tIIII\n", "\t0\t0\tACGT\n");
    let temp = write_temp(&bad, ".sam");

    sam_qc()
        .args(["summary", "-w", "100"])
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("CHR_NAME").not())
        .stderr(predicate::str::contains("less than 11 fields"));
}

#[test]
fn test_summary_rejects_oversized_cigar() {
    let bad = SAM.replace(
        "\t40\t100M\t",
        "\t40\t18446744073709551615M18446744073709551615M\t",
    );
    let temp = write_temp(&bad, ".sam");

    sam_qc()
        .args(["summary", "-w", "100"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Format error at line 7: CIGAR incorrect"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_validate_rejects_oversized_reference_length() {
    let bad = SAM.replace("LN:1000", "LN:2147483648");
    let temp = write_temp(&bad, ".sam");

    sam_qc()
        .arg("validate")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Format error at line 2: @SQ LN: must be an integer in [1, 2147483647]",
        ));
}

#[test]
fn test_windows_tsv() {
    let temp = write_temp(SAM, ".sam");

    let output = sam_qc()
        .args(["windows", "--format", "tsv", "-w", "200"])
        .arg(temp.path())
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "reference\twindow\tstart\tcoverage\tmean_mapq\tnormalized_quality"
    );
    // chr1: 1000/200 + 1 windows, chr2: 500/200 + 1 windows
    assert_eq!(lines.len(), 1 + 6 + 3);
    // s1 covers 500..599, half of window 2; chr1 window MAPQs span 0..60
    assert!(lines.contains(&"chr1\t2\t400\t0.500\t40.000\t0.667"));
}

#[test]
fn test_windows_selected_reference() {
    let temp = write_temp(SAM, ".sam");

    sam_qc()
        .args(["windows", "-w", "200", "-r", "chr2"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("chr2 (length 500, 3 windows of 200 bp)"))
        .stdout(predicate::str::contains("chr1").not());

    sam_qc()
        .args(["windows", "-w", "200", "-r", "chrX"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reference 'chrX' not declared"));
}
