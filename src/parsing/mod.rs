//! Readers for SAM text files.
//!
//! Three passes over the same file, each owning its own file handle:
//!
//! - [`validate`]: checks the path, the extension and the grammar of every line
//! - [`header`]: collects `@SQ` name/length declarations from the leading header block
//! - [`records`]: streams alignment lines into per-reference buckets, applying filters
//!
//! ## Example
//!
//! ```rust,no_run
//! use sam_qc::parsing::{header, records, validate};
//! use std::path::Path;
//!
//! let path = Path::new("sample.sam");
//! let outcome = validate::validate_file(path).unwrap();
//! assert!(outcome.is_valid(), "{outcome}");
//!
//! let lengths = header::parse_header_file(path).unwrap();
//! let extracted = records::extract_records(path, &lengths, &records::ExtractionFilter::default()).unwrap();
//! println!("{} records", extracted.record_count());
//! ```
//!
//! ## Mandatory fields
//!
//! | Col | Field | Rule |
//! |-----|-------|------|
//! | 1   | QNAME | 1-254 printable characters, no `@` |
//! | 2   | FLAG  | integer in `[0, 65535]` |
//! | 3   | RNAME | `*` or a reference name token |
//! | 4   | POS   | integer in `[0, 2^31-1]` |
//! | 5   | MAPQ  | integer in `[0, 255]` |
//! | 6   | CIGAR | `*` or `(<digits><op>)+` with op in `MIDNSHPX=` |
//! | 7   | RNEXT | `*`, `=` or a reference name token |
//! | 8   | PNEXT | integer in `[0, 2^31-1]` |
//! | 9   | TLEN  | integer in `[-2^31+1, 2^31-1]` |
//! | 10  | SEQ   | `*` or letters, `=` and `.` |
//! | 11  | QUAL  | `*` or printable characters |

use thiserror::Error;

pub mod header;
pub mod records;
pub mod validate;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SAM format: {0}")]
    InvalidFormat(String),
}
