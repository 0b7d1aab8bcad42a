//! Dense insertion-ordered set with O(1) swap-and-pop removal.

use std::collections::HashMap;
use std::hash::Hash;

/// A dense array of unique elements plus an element → position side-map.
///
/// Removal moves the last element into the vacated slot and shrinks the
/// array by one. The resulting order is part of the observable state.
///
/// ```rust
/// use diamond_core::DenseSet;
///
/// let mut set: DenseSet<char> = ['a', 'b', 'c', 'd'].into_iter().collect();
/// assert_eq!(set.swap_remove(&'b'), Some(1));
/// assert_eq!(set.as_slice(), &['a', 'd', 'c']);
/// ```
#[derive(Debug, Clone)]
pub struct DenseSet<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T> Default for DenseSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> DenseSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    pub fn position(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Append `item` unless present. Returns whether it was appended.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }
        self.index.insert(item, self.items.len());
        self.items.push(item);
        true
    }

    /// Remove `item`, returning the position it occupied.
    pub fn swap_remove(&mut self, item: &T) -> Option<usize> {
        let pos = self.index.remove(item)?;
        self.items.swap_remove(pos);
        if let Some(moved) = self.items.get(pos) {
            self.index.insert(*moved, pos);
        }
        Some(pos)
    }

    /// Remove the element at `pos`, returning it.
    pub fn swap_remove_at(&mut self, pos: usize) -> Option<T> {
        let item = *self.items.get(pos)?;
        self.swap_remove(&item);
        Some(item)
    }

    /// First position whose side-map entry disagrees with the array.
    pub(crate) fn index_drift(&self) -> Option<usize> {
        if self.index.len() != self.items.len() {
            return Some(self.items.len().min(self.index.len()));
        }
        self.items
            .iter()
            .enumerate()
            .find(|(i, item)| self.index.get(*item) != Some(i))
            .map(|(i, _)| i)
    }
}

impl<T: PartialEq> PartialEq for DenseSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for DenseSet<T> {}

impl<T: Copy + Eq + Hash> FromIterator<T> for DenseSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = DenseSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a DenseSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
