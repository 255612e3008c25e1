use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::cigar::parse_ops;
use crate::parsing::ParseError;

/// Number of mandatory tab-separated columns on an alignment line
pub const MANDATORY_FIELDS: usize = 11;

const MAX_QNAME_LEN: usize = 254;
const MAX_POSITION: i64 = (1 << 31) - 1;
const TLEN_RANGE: RangeInclusive<i64> = -MAX_POSITION..=MAX_POSITION;

/// The eleven mandatory columns of an alignment line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamField {
    Qname,
    Flag,
    Rname,
    Pos,
    Mapq,
    Cigar,
    Rnext,
    Pnext,
    Tlen,
    Seq,
    Qual,
}

impl SamField {
    pub const ALL: [Self; MANDATORY_FIELDS] = [
        Self::Qname,
        Self::Flag,
        Self::Rname,
        Self::Pos,
        Self::Mapq,
        Self::Cigar,
        Self::Rnext,
        Self::Pnext,
        Self::Tlen,
        Self::Seq,
        Self::Qual,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Qname => "QNAME",
            Self::Flag => "FLAG",
            Self::Rname => "RNAME",
            Self::Pos => "POS",
            Self::Mapq => "MAPQ",
            Self::Cigar => "CIGAR",
            Self::Rnext => "RNEXT",
            Self::Pnext => "PNEXT",
            Self::Tlen => "TLEN",
            Self::Seq => "SEQ",
            Self::Qual => "QUAL",
        }
    }
}

impl fmt::Display for SamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The rule a line broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("@SQ must contain SN: and LN:")]
    MissingSequenceTags,

    #[error("@SQ LN: must be an integer in [1, {MAX_POSITION}]")]
    InvalidSequenceLength,

    #[error("less than {MANDATORY_FIELDS} fields (found {0})")]
    TooFewFields(usize),

    #[error("mandatory field {0} is empty")]
    EmptyField(SamField),

    #[error("{0} must be an integer")]
    NotAnInteger(SamField),

    #[error("{0} out of range")]
    OutOfRange(SamField),

    #[error("{0} incorrect")]
    Malformed(SamField),
}

impl Violation {
    /// The column at fault, if the violation concerns a single field
    #[must_use]
    pub fn field(&self) -> Option<SamField> {
        match self {
            Self::EmptyField(f)
            | Self::NotAnInteger(f)
            | Self::OutOfRange(f)
            | Self::Malformed(f) => Some(*f),
            _ => None,
        }
    }
}

/// Result of validating a SAM file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every line conforms
    Valid {
        header_lines: usize,
        alignment_lines: usize,
    },
    /// The path does not exist
    InvalidPath(PathBuf),
    /// The file is not a `.sam` file
    InvalidExtension(PathBuf),
    /// First offending line (1-based) and the rule it broke
    GrammarViolation { line: usize, violation: Violation },
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid {
                header_lines,
                alignment_lines,
            } => write!(
                f,
                "File is valid ({header_lines} header lines, {alignment_lines} alignment lines)"
            ),
            Self::InvalidPath(path) => write!(f, "No file found: {}", path.display()),
            Self::InvalidExtension(path) => {
                write!(f, "File must be in .sam format: {}", path.display())
            }
            Self::GrammarViolation { line, violation } => {
                write!(f, "Format error at line {line}: {violation}")
            }
        }
    }
}

/// Check that `path` exists, ends in `.sam`, and that every line follows the
/// SAM grammar. Stops at the first violation.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file exists but cannot be read. Problems
/// with the content are reported through the returned [`ValidationOutcome`].
pub fn validate_file(path: &Path) -> Result<ValidationOutcome, ParseError> {
    if !path.exists() {
        return Ok(ValidationOutcome::InvalidPath(path.to_path_buf()));
    }
    if !has_sam_extension(path) {
        return Ok(ValidationOutcome::InvalidExtension(path.to_path_buf()));
    }

    let reader = File::open(path).map(BufReader::new)?;
    validate_reader(reader)
}

/// Validate SAM text from any buffered reader
///
/// # Errors
///
/// Returns `ParseError::Io` if reading fails or the text is not valid UTF-8.
pub fn validate_reader<R: BufRead>(reader: R) -> Result<ValidationOutcome, ParseError> {
    let mut header_lines = 0;
    let mut alignment_lines = 0;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = i + 1;

        let result = if line.starts_with('@') {
            header_lines += 1;
            validate_header_line(&line)
        } else {
            alignment_lines += 1;
            validate_alignment_line(&line)
        };

        if let Err(violation) = result {
            debug!(line = line_num, %violation, "grammar violation");
            return Ok(ValidationOutcome::GrammarViolation {
                line: line_num,
                violation,
            });
        }
    }

    debug!(header_lines, alignment_lines, "validation passed");
    Ok(ValidationOutcome::Valid {
        header_lines,
        alignment_lines,
    })
}

fn has_sam_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sam"))
}

/// Header lines other than `@SQ` are accepted as-is
///
/// # Errors
///
/// Returns the violation if an `@SQ` line lacks `SN:`/`LN:` or has a
/// non-numeric length.
pub fn validate_header_line(line: &str) -> Result<(), Violation> {
    if !line.starts_with("@SQ") {
        return Ok(());
    }

    let mut name = None;
    let mut length = None;
    for field in line.trim().split('\t').skip(1) {
        if let Some(value) = field.strip_prefix("SN:") {
            name = Some(value);
        } else if let Some(value) = field.strip_prefix("LN:") {
            length = Some(value);
        }
    }

    match (name, length) {
        (Some(_), Some(length)) => match length.parse::<i64>() {
            Ok(n) if (1..=MAX_POSITION).contains(&n) => Ok(()),
            _ => Err(Violation::InvalidSequenceLength),
        },
        _ => Err(Violation::MissingSequenceTags),
    }
}

/// Check the eleven mandatory columns of one alignment line.
/// Columns past the eleventh are ignored.
///
/// # Errors
///
/// Returns the first violation found, checking columns left to right.
pub fn validate_alignment_line(line: &str) -> Result<(), Violation> {
    let columns: Vec<&str> = line.trim().split('\t').collect();
    if columns.len() < MANDATORY_FIELDS {
        return Err(Violation::TooFewFields(columns.len()));
    }

    let columns = &columns[..MANDATORY_FIELDS];
    if let Some(i) = columns.iter().position(|c| c.is_empty()) {
        return Err(Violation::EmptyField(SamField::ALL[i]));
    }

    for (field, value) in SamField::ALL.into_iter().zip(columns) {
        validate_field(field, value)?;
    }

    Ok(())
}

/// Check a single non-empty column against its rule
///
/// # Errors
///
/// Returns the violation when `value` does not satisfy the rule for `field`.
pub fn validate_field(field: SamField, value: &str) -> Result<(), Violation> {
    let ok = match field {
        SamField::Qname => is_valid_qname(value),
        SamField::Flag => return check_integer(field, value, 0..=i64::from(u16::MAX)),
        SamField::Rname => value == "*" || is_reference_token(value),
        SamField::Pos | SamField::Pnext => return check_integer(field, value, 0..=MAX_POSITION),
        SamField::Mapq => return check_integer(field, value, 0..=i64::from(u8::MAX)),
        SamField::Cigar => value == "*" || parse_ops(value).is_ok(),
        SamField::Rnext => value == "*" || value == "=" || is_reference_token(value),
        SamField::Tlen => return check_integer(field, value, TLEN_RANGE),
        SamField::Seq => {
            value == "*"
                || value
                    .bytes()
                    .all(|b| b.is_ascii_alphabetic() || b == b'=' || b == b'.')
        }
        SamField::Qual => value.bytes().all(|b| (b'!'..=b'~').contains(&b)),
    };

    if ok && !value.is_empty() {
        Ok(())
    } else {
        Err(Violation::Malformed(field))
    }
}

fn check_integer(field: SamField, value: &str, range: RangeInclusive<i64>) -> Result<(), Violation> {
    let n: i64 = value.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Violation::OutOfRange(field),
        _ => Violation::NotAnInteger(field),
    })?;

    if range.contains(&n) {
        Ok(())
    } else {
        Err(Violation::OutOfRange(field))
    }
}

/// `[!-?A-~]{1,254}`: printable ASCII without `@`
fn is_valid_qname(value: &str) -> bool {
    (1..=MAX_QNAME_LEN).contains(&value.len())
        && value
            .bytes()
            .all(|b| (b'!'..=b'?').contains(&b) || (b'A'..=b'~').contains(&b))
}

/// `[0-9A-Za-z!#$%&+./:;?@^_|~-][0-9A-Za-z!#$%&*+./:;=?@^_|~-]*`
fn is_reference_token(value: &str) -> bool {
    let mut bytes = value.bytes();
    match bytes.next() {
        Some(first) if is_token_start(first) => {
            bytes.all(|b| is_token_start(b) || b == b'*' || b == b'=')
        }
        _ => false,
    }
}

fn is_token_start(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&+./:;?@^_|~-".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    const HEADER: &str = "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:1000\n";
    const RECORD: &str = "read1\t99\tchr1\t500\t40\t100M\t=\t700\t300\tACGT\tIIII";

    fn outcome(text: &str) -> ValidationOutcome {
        validate_reader(Cursor::new(text.to_string())).unwrap()
    }

    fn with_column(index: usize, value: &str) -> String {
        let mut columns: Vec<&str> = RECORD.split('\t').collect();
        columns[index] = value;
        columns.join("\t")
    }

    #[test]
    fn test_valid_file() {
        let text = format!("{HEADER}{RECORD}\n{RECORD}\tNM:i:0\tMD:Z:100\n");
        assert_eq!(
            outcome(&text),
            ValidationOutcome::Valid {
                header_lines: 2,
                alignment_lines: 2
            }
        );
    }

    #[test]
    fn test_flag_not_integer_reports_line() {
        let text = format!("{HEADER}{RECORD}\n{}\n", with_column(1, "abc"));
        let result = outcome(&text);
        assert_eq!(
            result,
            ValidationOutcome::GrammarViolation {
                line: 4,
                violation: Violation::NotAnInteger(SamField::Flag)
            }
        );
        assert_eq!(
            result.to_string(),
            "Format error at line 4: FLAG must be an integer"
        );
    }

    #[test]
    fn test_first_violation_on_line_wins() {
        // Both FLAG and MAPQ are bad; only FLAG is reported
        let line = with_column(1, "abc").replace("\t40\t", "\t999\t");
        assert_eq!(
            validate_alignment_line(&line),
            Err(Violation::NotAnInteger(SamField::Flag))
        );
    }

    #[test]
    fn test_sq_without_tags() {
        let text = "@SQ\tSN:chr1\n";
        assert_eq!(
            outcome(text),
            ValidationOutcome::GrammarViolation {
                line: 1,
                violation: Violation::MissingSequenceTags
            }
        );
        assert_eq!(
            validate_header_line("@SQ\tSN:chr1\tLN:abc"),
            Err(Violation::InvalidSequenceLength)
        );
        assert_eq!(validate_header_line("@PG\tID:bwa"), Ok(()));
    }

    #[test]
    fn test_sq_length_range() {
        assert_eq!(validate_header_line("@SQ\tSN:chr1\tLN:2147483647"), Ok(()));
        for length in ["0", "-5", "2147483648", "18446744073709551615"] {
            assert_eq!(
                validate_header_line(&format!("@SQ\tSN:chr1\tLN:{length}")),
                Err(Violation::InvalidSequenceLength),
                "LN:{length}"
            );
        }
        assert_eq!(
            Violation::InvalidSequenceLength.to_string(),
            "@SQ LN: must be an integer in [1, 2147483647]"
        );
    }

    #[test]
    fn test_cigar_operation_too_long() {
        for cigar in ["18446744073709551615M18446744073709551615M", "268435456M"] {
            assert_eq!(
                validate_alignment_line(&with_column(5, cigar)),
                Err(Violation::Malformed(SamField::Cigar)),
                "{cigar}"
            );
        }
        assert!(validate_alignment_line(&with_column(5, "268435455M")).is_ok());
    }

    #[test]
    fn test_too_few_and_empty_fields() {
        assert_eq!(
            validate_alignment_line("read1\t0\tchr1"),
            Err(Violation::TooFewFields(3))
        );
        assert_eq!(
            validate_alignment_line(""),
            Err(Violation::TooFewFields(1))
        );
        assert_eq!(
            validate_alignment_line(&with_column(2, "")),
            Err(Violation::EmptyField(SamField::Rname))
        );
    }

    #[test]
    fn test_numeric_ranges() {
        assert_eq!(
            validate_alignment_line(&with_column(1, "65536")),
            Err(Violation::OutOfRange(SamField::Flag))
        );
        assert!(validate_alignment_line(&with_column(1, "65535")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(1, "-1")),
            Err(Violation::OutOfRange(SamField::Flag))
        );
        assert_eq!(
            validate_alignment_line(&with_column(3, "2147483648")),
            Err(Violation::OutOfRange(SamField::Pos))
        );
        assert_eq!(
            validate_alignment_line(&with_column(4, "256")),
            Err(Violation::OutOfRange(SamField::Mapq))
        );
        assert_eq!(
            validate_alignment_line(&with_column(4, "4x")),
            Err(Violation::NotAnInteger(SamField::Mapq))
        );
        assert_eq!(
            validate_alignment_line(&with_column(7, "99999999999999999999")),
            Err(Violation::OutOfRange(SamField::Pnext))
        );
        assert!(validate_alignment_line(&with_column(8, "-2147483647")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(8, "-2147483648")),
            Err(Violation::OutOfRange(SamField::Tlen))
        );
    }

    #[test]
    fn test_text_fields() {
        assert_eq!(
            validate_alignment_line(&with_column(0, "@read")),
            Err(Violation::Malformed(SamField::Qname))
        );
        assert_eq!(
            validate_alignment_line(&with_column(0, &"r".repeat(255))),
            Err(Violation::Malformed(SamField::Qname))
        );
        assert!(validate_alignment_line(&with_column(0, &"r".repeat(254))).is_ok());

        assert!(validate_alignment_line(&with_column(2, "*")).is_ok());
        assert!(validate_alignment_line(&with_column(2, "HLA-A*01:01")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(2, "=chr1")),
            Err(Violation::Malformed(SamField::Rname))
        );
        assert_eq!(
            validate_alignment_line(&with_column(2, "=")),
            Err(Violation::Malformed(SamField::Rname))
        );

        assert!(validate_alignment_line(&with_column(5, "*")).is_ok());
        assert!(validate_alignment_line(&with_column(5, "5S90M2I3D")).is_ok());
        // '=' without a length
        assert!(validate_alignment_line(&with_column(5, "5S90M2I3D=")).is_err());
        assert_eq!(
            validate_alignment_line(&with_column(5, "10Z")),
            Err(Violation::Malformed(SamField::Cigar))
        );

        assert!(validate_alignment_line(&with_column(6, "*")).is_ok());
        assert!(validate_alignment_line(&with_column(6, "chr2")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(6, "*chr2")),
            Err(Violation::Malformed(SamField::Rnext))
        );

        assert!(validate_alignment_line(&with_column(9, "*")).is_ok());
        assert!(validate_alignment_line(&with_column(9, "acgtN=.")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(9, "ACG1")),
            Err(Violation::Malformed(SamField::Seq))
        );

        assert!(validate_alignment_line(&with_column(10, "*")).is_ok());
        assert_eq!(
            validate_alignment_line(&with_column(10, "II I")),
            Err(Violation::Malformed(SamField::Qual))
        );
    }

    #[test]
    fn test_missing_path_and_extension() {
        let missing = Path::new("/definitely/not/here.sam");
        assert_eq!(
            validate_file(missing).unwrap(),
            ValidationOutcome::InvalidPath(missing.to_path_buf())
        );

        let mut temp = NamedTempFile::with_suffix(".bam").unwrap();
        temp.write_all(HEADER.as_bytes()).unwrap();
        temp.flush().unwrap();
        assert!(matches!(
            validate_file(temp.path()).unwrap(),
            ValidationOutcome::InvalidExtension(_)
        ));
    }

    #[test]
    fn test_validate_file() {
        let mut temp = NamedTempFile::with_suffix(".SAM").unwrap();
        writeln!(temp, "{HEADER}{RECORD}").unwrap();
        temp.flush().unwrap();

        let result = validate_file(temp.path()).unwrap();
        assert!(result.is_valid(), "{result}");
    }

    #[test]
    fn test_violation_field() {
        assert_eq!(
            Violation::OutOfRange(SamField::Tlen).field(),
            Some(SamField::Tlen)
        );
        assert_eq!(Violation::MissingSequenceTags.field(), None);
    }
}
