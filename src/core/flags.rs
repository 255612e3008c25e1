use noodles::sam::alignment::record::Flags;
use serde::{Serialize, Serializer};

use crate::core::cigar::AlignmentShape;

/// The 16-bit FLAG field of an alignment record.
///
/// Callers ask named questions (`is_unmapped`, `is_reverse`, ...) instead of
/// testing bit positions themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamFlags(Flags);

impl SamFlags {
    #[must_use]
    pub fn new(bits: u16) -> Self {
        Self(Flags::from(bits))
    }

    #[must_use]
    pub fn bits(self) -> u16 {
        u16::from(self.0)
    }

    /// Template has multiple segments (0x1)
    #[must_use]
    pub fn is_paired(self) -> bool {
        self.0.contains(Flags::SEGMENTED)
    }

    /// Each segment properly aligned according to the aligner (0x2)
    #[must_use]
    pub fn is_proper_pair(self) -> bool {
        self.0.contains(Flags::PROPERLY_SEGMENTED)
    }

    /// Segment unmapped (0x4)
    #[must_use]
    pub fn is_unmapped(self) -> bool {
        self.0.contains(Flags::UNMAPPED)
    }

    /// Next segment in the template unmapped (0x8)
    #[must_use]
    pub fn is_mate_unmapped(self) -> bool {
        self.0.contains(Flags::MATE_UNMAPPED)
    }

    /// SEQ is reverse complemented (0x10)
    #[must_use]
    pub fn is_reverse(self) -> bool {
        self.0.contains(Flags::REVERSE_COMPLEMENTED)
    }

    /// SEQ of the next segment is reverse complemented (0x20)
    #[must_use]
    pub fn is_mate_reverse(self) -> bool {
        self.0.contains(Flags::MATE_REVERSE_COMPLEMENTED)
    }

    /// First segment in the template (0x40)
    #[must_use]
    pub fn is_first_in_pair(self) -> bool {
        self.0.contains(Flags::FIRST_SEGMENT)
    }

    /// Last segment in the template (0x80)
    #[must_use]
    pub fn is_last_in_pair(self) -> bool {
        self.0.contains(Flags::LAST_SEGMENT)
    }

    /// Secondary alignment (0x100)
    #[must_use]
    pub fn is_secondary(self) -> bool {
        self.0.contains(Flags::SECONDARY)
    }

    /// Not passing quality controls (0x200)
    #[must_use]
    pub fn is_qc_fail(self) -> bool {
        self.0.contains(Flags::QC_FAIL)
    }

    /// PCR or optical duplicate (0x400)
    #[must_use]
    pub fn is_duplicate(self) -> bool {
        self.0.contains(Flags::DUPLICATE)
    }

    /// Supplementary alignment (0x800)
    #[must_use]
    pub fn is_supplementary(self) -> bool {
        self.0.contains(Flags::SUPPLEMENTARY)
    }
}

impl From<u16> for SamFlags {
    fn from(bits: u16) -> Self {
        Self::new(bits)
    }
}

impl Serialize for SamFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

/// A record is fully mapped when it is not flagged unmapped, carries an
/// alignment shape, and every operation consumes the reference as an aligned
/// base (M, D, N, X or =). Any clipping or insertion disqualifies it.
#[must_use]
pub fn is_fully_mapped(flags: SamFlags, shape: &AlignmentShape) -> bool {
    if flags.is_unmapped() {
        return false;
    }

    match shape {
        AlignmentShape::Unavailable => false,
        AlignmentShape::Ops(ops) => {
            !ops.is_empty() && ops.iter().all(|op| op.kind.is_reference_aligned())
        }
    }
}

/// Pairing verdict for the two records sharing a query name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairClass {
    /// One record is first in pair, the other last, and both carry 0x2
    pub properly_paired: bool,
    /// Exactly one of the two records is on the reverse strand
    pub properly_oriented: bool,
}

/// Classify a two-record flag group.
///
/// Orientation only inspects the reverse-strand bits; reference identity of
/// the two records is not considered.
#[must_use]
pub fn classify_pair(f1: SamFlags, f2: SamFlags) -> PairClass {
    let mates = (f1.is_last_in_pair() && f2.is_first_in_pair())
        || (f2.is_last_in_pair() && f1.is_first_in_pair());
    let properly_paired = mates && f1.is_proper_pair() && f2.is_proper_pair();
    let properly_oriented = f1.is_reverse() != f2.is_reverse();

    PairClass {
        properly_paired,
        properly_oriented,
    }
}
