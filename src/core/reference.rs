use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A reference sequence declared by an `@SQ` header line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSequence {
    /// Sequence name (SN tag)
    pub name: String,

    /// Sequence length in bases (LN tag)
    pub length: u64,
}

impl ReferenceSequence {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Reference name to length mapping, in header declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceLengths {
    lengths: IndexMap<String, u64>,
}

impl ReferenceLengths {
    #[must_use]
    pub fn new(references: Vec<ReferenceSequence>) -> Self {
        let lengths = references
            .into_iter()
            .map(|reference| (reference.name, reference.length))
            .collect();
        Self { lengths }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.lengths.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lengths.contains_key(name)
    }

    /// Reference names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lengths.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.lengths.iter().map(|(name, len)| (name.as_str(), *len))
    }

    /// Length of the longest declared reference
    #[must_use]
    pub fn longest(&self) -> Option<u64> {
        self.lengths.values().copied().max()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_keep_declaration_order() {
        let lengths = ReferenceLengths::new(vec![
            ReferenceSequence::new("chr2", 500),
            ReferenceSequence::new("chr1", 1000),
            ReferenceSequence::new("chrM", 16569),
        ]);

        assert_eq!(lengths.names().collect::<Vec<_>>(), vec!["chr2", "chr1", "chrM"]);
        assert_eq!(lengths.get("chr1"), Some(1000));
        assert_eq!(lengths.get("chr3"), None);
        assert_eq!(lengths.longest(), Some(16569));
        assert_eq!(lengths.len(), 3);
    }

    #[test]
    fn test_duplicate_name_keeps_last_length() {
        let lengths = ReferenceLengths::new(vec![
            ReferenceSequence::new("chr1", 10),
            ReferenceSequence::new("chr1", 20),
        ]);
        assert_eq!(lengths.len(), 1);
        assert_eq!(lengths.get("chr1"), Some(20));
    }

    #[test]
    fn test_empty() {
        let lengths = ReferenceLengths::default();
        assert!(lengths.is_empty());
        assert_eq!(lengths.longest(), None);
    }
}
