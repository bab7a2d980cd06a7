use super::{RingBuffer, RingError};

/// Write half of a [`RingBuffer`]. Owns `head`.
pub struct Producer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

/// Read half of a [`RingBuffer`]. Owns `tail`.
pub struct Consumer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<'a, const N: usize> Producer<'a, N> {
    pub(super) fn new(ring: &'a RingBuffer<N>) -> Self {
        Self { ring }
    }

    /// Stores `byte` at `head` and advances it, or fails with
    /// [`RingError::BufferFull`] leaving the ring untouched.
    #[inline]
    pub fn put(&mut self, byte: u8) -> Result<(), RingError> {
        // SAFETY: `split` hands out one producer per exclusive borrow.
        unsafe { self.ring.enqueue(byte) }
    }

    /// Counts a byte the caller chose to drop after `put` failed.
    #[inline]
    pub fn record_overrun(&mut self) {
        self.ring.record_overrun();
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<'a, const N: usize> Consumer<'a, N> {
    pub(super) fn new(ring: &'a RingBuffer<N>) -> Self {
        Self { ring }
    }

    /// Takes the byte at `tail` and advances it, or fails with
    /// [`RingError::BufferEmpty`] leaving the ring untouched.
    #[inline]
    pub fn get(&mut self) -> Result<u8, RingError> {
        // SAFETY: `split` hands out one consumer per exclusive borrow.
        unsafe { self.ring.dequeue() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn overruns(&self) -> usize {
        self.ring.overruns()
    }
}
