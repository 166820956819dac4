//! Two-way partition as a ±1 sign vector.

use crate::error::{Error, Result};

/// Bipartition `s` over `{+1, -1}`, indexed like the graph's nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    signs: Vec<i8>,
}

impl Partition {
    /// Single-community partition (`s[i] = +1` for all `i`).
    pub fn trivial(n: usize) -> Self {
        Self { signs: vec![1; n] }
    }

    /// Build from explicit signs; every entry must be `+1` or `-1`.
    pub fn from_signs(signs: Vec<i8>) -> Result<Self> {
        if signs.iter().any(|&s| s != 1 && s != -1) {
            return Err(Error::InvalidParameter {
                name: "signs",
                message: "partition entries must be +1 or -1",
            });
        }
        Ok(Self { signs })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    /// True if the partition covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Sign of node `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn sign(&self, i: usize) -> i8 {
        self.signs[i]
    }

    /// Move node `i` to the other side.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn flip(&mut self, i: usize) {
        self.signs[i] = -self.signs[i];
    }

    /// Global sign flip (same communities, swapped labels).
    pub fn negated(&self) -> Self {
        Self {
            signs: self.signs.iter().map(|&s| -s).collect(),
        }
    }

    /// True if every node is on the same side.
    pub fn is_trivial(&self) -> bool {
        self.signs.windows(2).all(|w| w[0] == w[1])
    }

    /// Raw signs.
    pub fn as_slice(&self) -> &[i8] {
        &self.signs
    }

    /// Community ids: `+1 -> 0`, `-1 -> 1`.
    pub fn labels(&self) -> Vec<usize> {
        self.signs.iter().map(|&s| usize::from(s < 0)).collect()
    }

    /// Sizes of the `+1` and `-1` sides.
    pub fn sizes(&self) -> (usize, usize) {
        let negative = self.signs.iter().filter(|&&s| s < 0).count();
        (self.signs.len() - negative, negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signs_rejects_zero() {
        assert!(Partition::from_signs(vec![1, 0, -1]).is_err());
        assert!(Partition::from_signs(vec![1, -1, -1]).is_ok());
    }

    #[test]
    fn test_flip_and_negate() {
        let mut p = Partition::from_signs(vec![1, 1, -1]).unwrap();
        p.flip(0);
        assert_eq!(p.as_slice(), &[-1, 1, -1]);
        assert_eq!(p.negated().as_slice(), &[1, -1, 1]);
        assert_eq!(p.labels(), vec![1, 0, 1]);
        assert_eq!(p.sizes(), (1, 2));
    }

    #[test]
    fn test_trivial() {
        assert!(Partition::trivial(4).is_trivial());
        assert!(Partition::trivial(0).is_trivial());
        assert!(Partition::trivial(1).negated().is_trivial());
        assert!(!Partition::from_signs(vec![1, -1]).unwrap().is_trivial());
    }

    #[test]
    #[should_panic]
    fn test_flip_out_of_range_panics() {
        let mut p = Partition::trivial(2);
        p.flip(2);
    }
}
