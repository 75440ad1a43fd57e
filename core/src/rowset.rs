//! Sets of row identifiers.

use serde::Serialize;

/// Row ids in the order a select produced them.
///
/// Selects scan in position order, so a row set built by a select is
/// ascending and duplicate-free. Row sets produced by a join follow the pair
/// order and may repeat ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowSet(Vec<usize>);

impl RowSet {
    pub fn new(ids: Vec<usize>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for RowSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<usize>> for RowSet {
    fn from(ids: Vec<usize>) -> Self {
        Self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_keep_order() {
        let collected: RowSet = [4, 1, 4].into_iter().collect();
        assert_eq!(collected, RowSet::from(vec![4, 1, 4]));
        assert_eq!(collected.ids(), &[4, 1, 4]);
        assert_eq!(collected.iter().collect::<Vec<_>>(), vec![4, 1, 4]);
        assert!(RowSet::default().is_empty());
    }
}
