use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest operation length a SAM CIGAR can encode
pub const MAX_OP_LEN: u64 = (1 << 28) - 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CigarError {
    #[error("no alignment shape ('*')")]
    Unavailable,

    #[error("empty CIGAR string")]
    Empty,

    #[error("operation '{0}' has no length")]
    MissingLength(char),

    #[error("invalid CIGAR operation '{0}'")]
    InvalidOperation(char),

    #[error("CIGAR ends with a dangling length")]
    DanglingLength,

    #[error("operation length exceeds {MAX_OP_LEN}")]
    LengthOverflow,
}

/// A single CIGAR operation code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// M: alignment match (sequence match or mismatch)
    Match,
    /// I: insertion to the reference
    Insertion,
    /// D: deletion from the reference
    Deletion,
    /// N: skipped region from the reference
    Skip,
    /// S: soft clip
    SoftClip,
    /// H: hard clip
    HardClip,
    /// P: padding
    Pad,
    /// =: sequence match
    SequenceMatch,
    /// X: sequence mismatch
    SequenceMismatch,
}

impl OpKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(Self::Match),
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            'N' => Some(Self::Skip),
            'S' => Some(Self::SoftClip),
            'H' => Some(Self::HardClip),
            'P' => Some(Self::Pad),
            '=' => Some(Self::SequenceMatch),
            'X' => Some(Self::SequenceMismatch),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Pad => 'P',
            Self::SequenceMatch => '=',
            Self::SequenceMismatch => 'X',
        }
    }

    /// M, D, N, = and X advance along the reference
    #[must_use]
    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Self::Match | Self::Deletion | Self::Skip | Self::SequenceMatch | Self::SequenceMismatch
        )
    }

    /// Operations allowed in a fully mapped alignment.
    /// Same set as [`Self::consumes_reference`].
    #[must_use]
    pub fn is_reference_aligned(self) -> bool {
        self.consumes_reference()
    }

    #[must_use]
    pub fn is_clip(self) -> bool {
        matches!(self, Self::SoftClip | Self::HardClip)
    }

    #[must_use]
    pub fn is_indel(self) -> bool {
        matches!(self, Self::Insertion | Self::Deletion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub len: u64,
    pub kind: OpKind,
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.as_char())
    }
}

/// Parse a run of `<digits><op>` pairs. `*` is rejected: callers that accept
/// a missing shape go through [`AlignmentShape`].
///
/// # Errors
///
/// Returns a [`CigarError`] describing the first offending character.
pub fn parse_ops(s: &str) -> Result<Vec<CigarOp>, CigarError> {
    if s == "*" {
        return Err(CigarError::Unavailable);
    }
    if s.is_empty() {
        return Err(CigarError::Empty);
    }

    let mut ops = Vec::new();
    let mut len: Option<u64> = None;

    for c in s.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = len.unwrap_or(0);
            let next = current
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .filter(|&v| v <= MAX_OP_LEN)
                .ok_or(CigarError::LengthOverflow)?;
            len = Some(next);
            continue;
        }

        let kind = OpKind::from_char(c).ok_or(CigarError::InvalidOperation(c))?;
        let len = len.take().ok_or(CigarError::MissingLength(c))?;
        ops.push(CigarOp { len, kind });
    }

    if len.is_some() {
        return Err(CigarError::DanglingLength);
    }

    Ok(ops)
}

/// The CIGAR column of a record: either `*` or a list of operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentShape {
    Unavailable,
    Ops(Vec<CigarOp>),
}

impl AlignmentShape {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Number of reference bases covered by the alignment, or `None` when the
    /// record has no shape or the total does not fit in a `u64`.
    #[must_use]
    pub fn reference_len(&self) -> Option<u64> {
        match self {
            Self::Unavailable => None,
            Self::Ops(ops) => ops
                .iter()
                .filter(|op| op.kind.consumes_reference())
                .try_fold(0u64, |total, op| total.checked_add(op.len)),
        }
    }

    /// Total inserted plus deleted bases, saturating at `u64::MAX`
    #[must_use]
    pub fn indel_bases(&self) -> u64 {
        match self {
            Self::Unavailable => 0,
            Self::Ops(ops) => ops
                .iter()
                .filter(|op| op.kind.is_indel())
                .fold(0u64, |total, op| total.saturating_add(op.len)),
        }
    }

    #[must_use]
    pub fn has_indel(&self) -> bool {
        self.indel_bases() > 0
    }

    #[must_use]
    pub fn has_clipping(&self) -> bool {
        match self {
            Self::Unavailable => false,
            Self::Ops(ops) => ops.iter().any(|op| op.kind.is_clip()),
        }
    }
}

impl FromStr for AlignmentShape {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_ops(s) {
            Ok(ops) => Ok(Self::Ops(ops)),
            Err(CigarError::Unavailable) => Ok(Self::Unavailable),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for AlignmentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "*"),
            Self::Ops(ops) => ops.iter().try_for_each(|op| write!(f, "{op}")),
        }
    }
}
