//! Efficient world-set implementation for model evaluation.
//!
//! This module provides a simple, cache-efficient bit set over [`World`]
//! indices. Evaluation of a formula manipulates whole world sets at a time,
//! so the set algebra (union, intersection, difference) works word-wise.

use crate::types::World;

/// A set of worlds backed by a vector of u64 words.
///
/// Each bit corresponds to a world index. The set automatically grows as
/// needed when inserting worlds beyond the current capacity. Trailing zero
/// words are insignificant: two sets with the same members compare equal
/// regardless of how much storage they carry.
#[derive(Debug, Clone)]
pub struct WorldSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl WorldSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty set with the given capacity (in worlds).
    pub fn new(capacity: usize) -> Self {
        let num_words = (capacity + Self::BITS_PER_WORD - 1) / Self::BITS_PER_WORD;
        Self {
            words: vec![0; num_words],
            count: 0,
        }
    }

    /// Creates an empty set with no pre-allocated capacity.
    pub fn empty() -> Self {
        Self {
            words: Vec::new(),
            count: 0,
        }
    }

    /// Creates the full set over worlds `0..n`.
    pub fn full(n: usize) -> Self {
        let mut set = Self::new(n);
        for index in 0..n {
            set.insert(World::new(index as u32));
        }
        set
    }

    /// Returns the number of worlds in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Gets the word index and bit position for a given world index.
    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        let word = index / Self::BITS_PER_WORD;
        let bit = index % Self::BITS_PER_WORD;
        (word, bit)
    }

    /// Returns true if the given world is in the set.
    #[inline]
    pub fn contains(&self, world: World) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(world.index());
        if word_idx >= self.words.len() {
            return false;
        }
        let mask = 1u64 << bit_idx;
        (self.words[word_idx] & mask) != 0
    }

    /// Inserts a world. Returns true if it was not previously present.
    #[inline]
    pub fn insert(&mut self, world: World) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(world.index());

        // Grow if necessary
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;

        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }

        was_clear
    }

    /// Removes a world. Returns true if it was previously present.
    #[inline]
    pub fn remove(&mut self, world: World) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(world.index());

        if word_idx >= self.words.len() {
            return false;
        }

        let mask = 1u64 << bit_idx;
        let was_set = (self.words[word_idx] & mask) != 0;

        if was_set {
            self.words[word_idx] &= !mask;
            self.count -= 1;
        }

        was_set
    }

    /// Removes all worlds.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
        self.count = 0;
    }

    /// Returns the union of the two sets.
    pub fn union(&self, other: &WorldSet) -> WorldSet {
        let len = self.words.len().max(other.words.len());
        let words: Vec<u64> = (0..len)
            .map(|i| self.word(i) | other.word(i))
            .collect();
        Self::from_words(words)
    }

    /// Returns the intersection of the two sets.
    pub fn intersection(&self, other: &WorldSet) -> WorldSet {
        let len = self.words.len().min(other.words.len());
        let words: Vec<u64> = (0..len)
            .map(|i| self.word(i) & other.word(i))
            .collect();
        Self::from_words(words)
    }

    /// Returns the worlds of `self` that are not in `other`.
    pub fn difference(&self, other: &WorldSet) -> WorldSet {
        let words: Vec<u64> = (0..self.words.len())
            .map(|i| self.word(i) & !other.word(i))
            .collect();
        Self::from_words(words)
    }

    /// Returns true if every world of `self` is in `other`.
    pub fn is_subset(&self, other: &WorldSet) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, &word)| word & !other.word(i) == 0)
    }

    #[inline]
    fn word(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(0)
    }

    fn from_words(words: Vec<u64>) -> Self {
        let count = words.iter().map(|w| w.count_ones() as usize).sum();
        Self { words, count }
    }

    /// Returns an iterator over the worlds in the set, in index order.
    pub fn iter(&self) -> WorldSetIter<'_> {
        WorldSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl Default for WorldSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for WorldSet {
    fn eq(&self, other: &Self) -> bool {
        let len = self.words.len().max(other.words.len());
        (0..len).all(|i| self.word(i) == other.word(i))
    }
}

impl Eq for WorldSet {}

impl FromIterator<World> for WorldSet {
    fn from_iter<I: IntoIterator<Item = World>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}

impl Extend<World> for WorldSet {
    fn extend<I: IntoIterator<Item = World>>(&mut self, iter: I) {
        for world in iter {
            self.insert(world);
        }
    }
}

impl<'a> IntoIterator for &'a WorldSet {
    type Item = World;
    type IntoIter = WorldSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the worlds in a [`WorldSet`].
pub struct WorldSetIter<'a> {
    set: &'a WorldSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for WorldSetIter<'_> {
    type Item = World;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                let index = self.word_idx * WorldSet::BITS_PER_WORD + bit_idx;
                return Some(World::new(index as u32));
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(index: u32) -> World {
        World::new(index)
    }

    #[test]
    fn test_empty() {
        let set = WorldSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(w(0)));
        assert!(!set.contains(w(100)));
    }

    #[test]
    fn test_insert_contains() {
        let mut set = WorldSet::new(100);
        assert!(!set.contains(w(42)));
        assert!(set.insert(w(42)));
        assert!(set.contains(w(42)));
        assert!(!set.insert(w(42))); // Already present
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = WorldSet::new(100);
        set.insert(w(42));
        assert!(set.remove(w(42)));
        assert!(!set.contains(w(42)));
        assert!(!set.remove(w(42))); // Already removed
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_auto_grow() {
        let mut set = WorldSet::empty();
        set.insert(w(1000));
        assert!(set.contains(w(1000)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iter() {
        let mut set = WorldSet::new(100);
        set.insert(w(5));
        set.insert(w(10));
        set.insert(w(3));
        set.insert(w(64)); // Second word
        set.insert(w(65));

        let worlds: Vec<_> = set.iter().collect();
        assert_eq!(worlds, vec![w(3), w(5), w(10), w(64), w(65)]);
    }

    #[test]
    fn test_full() {
        let set = WorldSet::full(70);
        assert_eq!(set.len(), 70);
        assert!(set.contains(w(0)));
        assert!(set.contains(w(69)));
        assert!(!set.contains(w(70)));
    }

    #[test]
    fn test_eq_ignores_capacity() {
        let mut a = WorldSet::new(1000);
        let mut b = WorldSet::empty();
        a.insert(w(3));
        b.insert(w(3));
        assert_eq!(a, b);

        b.insert(w(900));
        b.remove(w(900));
        assert_eq!(a, b);
    }

    #[test]
    fn test_union() {
        let a: WorldSet = [w(1), w(2)].into_iter().collect();
        let b: WorldSet = [w(2), w(70)].into_iter().collect();
        let u = a.union(&b);
        assert_eq!(u, [w(1), w(2), w(70)].into_iter().collect());
        assert_eq!(u.len(), 3);
    }

    #[test]
    fn test_intersection() {
        let a: WorldSet = [w(1), w(2), w(70)].into_iter().collect();
        let b: WorldSet = [w(2), w(70), w(99)].into_iter().collect();
        let i = a.intersection(&b);
        assert_eq!(i, [w(2), w(70)].into_iter().collect());
    }

    #[test]
    fn test_difference() {
        let a: WorldSet = [w(1), w(2), w(70)].into_iter().collect();
        let b: WorldSet = [w(2)].into_iter().collect();
        let d = a.difference(&b);
        assert_eq!(d, [w(1), w(70)].into_iter().collect());
    }

    #[test]
    fn test_is_subset() {
        let a: WorldSet = [w(1), w(2)].into_iter().collect();
        let b: WorldSet = [w(1), w(2), w(3)].into_iter().collect();
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(WorldSet::empty().is_subset(&a));
        assert!(WorldSet::empty().is_subset(&WorldSet::empty()));

        // Subset check is robust to extra zero words on either side.
        let c: WorldSet = [w(200)].into_iter().collect();
        assert!(!c.is_subset(&a));
        assert!(a.is_subset(&a.union(&c)));
    }
}
