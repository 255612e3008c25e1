//! Statistics over extracted alignment records.
//!
//! All functions here are pure: they read [`ExtractedRecords`](crate::core::record::ExtractedRecords)
//! built by the record extractor and never touch the file system, except
//! [`summary::analyze`] which drives the whole pipeline.
//!
//! - [`counts`]: mapped/unmapped totals and the per-reference MAPQ split
//! - [`pairing`]: properly paired and properly oriented query names
//! - [`length`]: reference-consumed alignment lengths and indel rate
//! - [`window`]: fixed-size coverage and mean MAPQ windows
//! - [`summary`]: one row per reference, plus [`summary::analyze`]
//!
//! Empty buckets never divide by zero: percentages, rates and means come back
//! as `0.0`, minimum and maximum lengths as `0`.

pub mod counts;
pub mod length;
pub mod pairing;
pub mod summary;
pub mod window;
