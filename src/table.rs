use std::cmp::min;
use std::ops::{Index, IndexMut};

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

impl<T> Entry<T> {
    /// Create a new cell with the given value.
    pub fn new(value: T) -> Self {
        Self { value, next: 0 }
    }
}

impl<T> Default for Entry<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Entry<T> {
    /// Get the reference to the value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Get the index of the next cell.
    pub fn next(&self) -> usize {
        self.next
    }
    /// Set the index of the next cell.
    pub fn set_next(&mut self, next: usize) {
        self.next = next;
    }
}

/// An append-only interning table with open hashing.
///
/// Values are stored in a growable arena and deduplicated through bucket
/// chains linked by `next` indices. Index 0 is a sentry, so valid indices
/// are always >= 1. Values are never removed.
pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with `2^bits` initial buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Table bits should be in the range 0..=31");

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;
        let buckets = vec![0; buckets_size];
        let bitmask = (buckets_size - 1) as u64;

        let mut data = Vec::with_capacity(buckets_size);
        data.push(Entry::default()); // 0th cell is the sentry.

        Self {
            data,
            buckets,
            bitmask,
        }
    }
}

impl<T> Table<T> {
    /// Get the current capacity of the underlying arena.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
    /// Get the number of stored values (excluding the sentry).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].value()
    }

    /// Get the index of the next cell.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next()
    }
    /// Set the index of the next cell.
    pub fn set_next(&mut self, index: usize, next: usize) {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].set_next(next);
    }

    /// Add a new value to the table and return its index.
    pub fn add(&mut self, value: T) -> usize {
        self.data.push(Entry::new(value));
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Double the number of buckets and redistribute all chains.
    fn grow_buckets(&mut self) {
        let buckets_size = self.buckets.len() * 2;
        self.buckets = vec![0; buckets_size];
        self.bitmask = (buckets_size - 1) as u64;

        // Rebuild chains via head insertion. Iterating in reverse keeps
        // each chain sorted by ascending index.
        for index in (1..self.data.len()).rev() {
            let bucket_index = (self.data[index].value.hash() & self.bitmask) as usize;
            self.data[index].next = self.buckets[bucket_index];
            self.buckets[bucket_index] = index;
        }
    }

    /// Put a value into the table and return its index.
    ///
    /// If an equal value is already stored, its existing index is returned.
    pub fn put(&mut self, value: T) -> usize
    where
        T: Eq,
    {
        if self.size() >= self.buckets.len() {
            self.grow_buckets();
        }

        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            // Create new node and put it into the bucket.
            let i = self.add(value);
            self.buckets[bucket_index] = i;
            return i;
        }

        loop {
            assert!(index > 0);

            if &value == self.value(index) {
                // The node already exists.
                return index;
            }

            let next = self.next(index);

            if next == 0 {
                // Create new node and append it to the bucket.
                let i = self.add(value);
                self.set_next(index, i);
                return i;
            } else {
                // Go to the next node in the bucket.
                index = next;
            }
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

impl<T> IndexMut<usize> for Table<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert_ne!(index, 0, "Index is 0");
        &mut self.data[index].value
    }
}
