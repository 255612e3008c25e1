//! Core data types for alignment records and reference sequences.
//!
//! - [`ReferenceSequence`](reference::ReferenceSequence) / [`ReferenceLengths`](reference::ReferenceLengths):
//!   the `@SQ` declarations of a SAM header
//! - [`AlignmentRecord`](record::AlignmentRecord): the per-line fields the statistics need
//! - [`ExtractedRecords`](record::ExtractedRecords): records bucketed by reference name
//! - [`SamFlags`](flags::SamFlags): named predicates over the FLAG bitmask
//! - [`AlignmentShape`](cigar::AlignmentShape): a parsed CIGAR string
//!
//! ## Flag bits
//!
//! | Bit   | Predicate            |
//! |-------|----------------------|
//! | 0x1   | `is_paired`          |
//! | 0x2   | `is_proper_pair`     |
//! | 0x4   | `is_unmapped`        |
//! | 0x8   | `is_mate_unmapped`   |
//! | 0x10  | `is_reverse`         |
//! | 0x20  | `is_mate_reverse`    |
//! | 0x40  | `is_first_in_pair`   |
//! | 0x80  | `is_last_in_pair`    |
//! | 0x100 | `is_secondary`       |
//! | 0x200 | `is_qc_fail`         |
//! | 0x400 | `is_duplicate`       |
//! | 0x800 | `is_supplementary`   |

pub mod cigar;
pub mod flags;
pub mod record;
pub mod reference;
