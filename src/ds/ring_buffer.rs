#![allow(clippy::len_without_is_empty)]
use std::ops::Index;

/// A fixed-size ringbuffer
///
/// Fills up to `capacity`, then overwrites the oldest element on every push.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be non-zero");
        Self {
            buffer: Vec::<T>::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the number of stored elements
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Insert an element into the buffer, returning the element it overwrote, if any
    pub fn push(&mut self, item: T) -> Option<T> {
        let ix = self.ix;
        self.ix = (ix + 1) % self.capacity;
        if ix >= self.buffer.len() {
            self.buffer.push(item);
            None
        } else {
            Some(std::mem::replace(&mut self.buffer[ix], item))
        }
    }

    /// Iterate over the stored elements from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let split = if self.is_full() { self.ix } else { 0 };
        let (newer, older) = self.buffer.split_at(split);
        older.iter().chain(newer.iter())
    }

    /// The most recently pushed element
    pub fn latest(&self) -> Option<&T> {
        if self.buffer.is_empty() {
            return None;
        }
        let ix = (self.ix + self.capacity - 1) % self.capacity;
        self.buffer.get(ix)
    }

    /// Get a slice view of the internal buffer in storage order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buffer[index]
    }
}
