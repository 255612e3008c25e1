use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::core::reference::{ReferenceLengths, ReferenceSequence};
use crate::parsing::ParseError;

/// Parse the `@SQ` declarations of a SAM file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if an `@SQ` line lacks `SN:`/`LN:` or has a
/// non-numeric length.
pub fn parse_header_file(path: &Path) -> Result<ReferenceLengths, ParseError> {
    let reader = File::open(path).map(BufReader::new)?;
    parse_header_reader(reader)
}

/// Parse header lines from a reader, stopping at the first alignment line
///
/// # Errors
///
/// See [`parse_header_file`].
pub fn parse_header_reader<R: BufRead>(reader: R) -> Result<ReferenceLengths, ParseError> {
    let mut references = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.starts_with('@') {
            break;
        }
        if let Some(reference) = parse_sq_line(&line, i + 1)? {
            references.push(reference);
        }
    }

    debug!(references = references.len(), "parsed header");
    Ok(ReferenceLengths::new(references))
}

/// Parse header from raw text
///
/// # Errors
///
/// See [`parse_header_file`].
pub fn parse_header_text(text: &str) -> Result<ReferenceLengths, ParseError> {
    parse_header_reader(text.as_bytes())
}

/// `None` for header lines that are not `@SQ`
fn parse_sq_line(line: &str, line_num: usize) -> Result<Option<ReferenceSequence>, ParseError> {
    if !line.starts_with("@SQ") {
        return Ok(None);
    }

    let mut name: Option<&str> = None;
    let mut length: Option<&str> = None;

    for field in line.trim().split('\t').skip(1) {
        if let Some((tag, value)) = field.split_once(':') {
            match tag {
                "SN" => name = Some(value),
                "LN" => length = Some(value),
                _ => {}
            }
        }
    }

    let (Some(name), Some(length)) = (name, length) else {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num}: @SQ must contain SN: and LN:"
        )));
    };

    let length: u64 = length.parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid length on line {line_num}: '{length}'"))
    })?;

    Ok(Some(ReferenceSequence::new(name, length)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_text() {
        let header = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:248956422\tM5:6aef897c3d6ff0c78aff06ac189178dd
@SQ\tSN:chr2\tLN:242193529
@SQ\tLN:16569\tSN:chrM
@RG\tID:sample1
";

        let lengths = parse_header_text(header).unwrap();
        assert_eq!(lengths.len(), 3);
        assert_eq!(lengths.get("chr1"), Some(248_956_422));
        assert_eq!(lengths.get("chrM"), Some(16569));
        assert_eq!(
            lengths.names().collect::<Vec<_>>(),
            vec!["chr1", "chr2", "chrM"]
        );
    }

    #[test]
    fn test_stops_at_first_alignment_line() {
        let text = "@SQ\tSN:chr1\tLN:1000
read1\t0\tchr1\t1\t60\t10M\t*\t0\t0\t*\t*
@SQ\tSN:chr2\tLN:2000
";
        let lengths = parse_header_text(text).unwrap();
        assert_eq!(lengths.len(), 1);
        assert!(!lengths.contains("chr2"));
    }

    #[test]
    fn test_name_with_colon() {
        let lengths = parse_header_text("@SQ\tSN:HLA-A*01:01:01:01\tLN:3503\n").unwrap();
        assert_eq!(lengths.get("HLA-A*01:01:01:01"), Some(3503));
    }

    #[test]
    fn test_no_sq_lines() {
        let lengths = parse_header_text("@HD\tVN:1.6\n@PG\tID:bwa\n").unwrap();
        assert!(lengths.is_empty());
    }

    #[test]
    fn test_missing_tags_and_bad_length() {
        let err = parse_header_text("@HD\tVN:1.6\n@SQ\tSN:chr1\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"));

        let err = parse_header_text("@SQ\tSN:chr1\tLN:big\n").unwrap_err();
        assert!(err.to_string().contains("'big'"));
    }
}
