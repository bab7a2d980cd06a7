use super::{Consumer, Producer, RingError};
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity byte queue shared by one producer and one consumer.
///
/// `head` is the next slot to write and is only advanced by the producer.
/// `tail` is the next slot to read and is only advanced by the consumer.
/// One slot always stays unused so that `head == tail` means empty and
/// `head + 1 == tail` (mod `N`) means full, giving `N - 1` usable bytes.
///
/// Each index lives in an [`AtomicUsize`] and is advanced by a single store,
/// so neither side can observe a torn index.
pub struct RingBuffer<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    head: AtomicUsize,
    tail: AtomicUsize,
    overruns: AtomicUsize,
}

// The producer only touches `buf[head]` before publishing `head`, the consumer
// only touches `buf[tail]` before publishing `tail`. `split` hands out at most
// one of each.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const MIN_CAPACITY: () = assert!(N >= 2, "ring buffer needs at least two slots");

    pub const fn new() -> Self {
        let () = Self::MIN_CAPACITY;
        Self {
            buf: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overruns: AtomicUsize::new(0),
        }
    }

    /// Drops every unread byte and rewinds both indices to slot 0.
    ///
    /// Exclusive access guarantees no producer or consumer half is alive.
    pub fn init(&mut self) {
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
        *self.overruns.get_mut() = 0;
    }

    /// Hands out the single producer and the single consumer.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    #[inline]
    pub fn put(&mut self, byte: u8) -> Result<(), RingError> {
        // SAFETY: `&mut self` rules out any other producer.
        unsafe { self.enqueue(byte) }
    }

    #[inline]
    pub fn get(&mut self) -> Result<u8, RingError> {
        // SAFETY: `&mut self` rules out any other consumer.
        unsafe { self.dequeue() }
    }

    /// Usable slots, one less than the backing array.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail { head - tail } else { N - tail + head }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        Self::advance(self.head.load(Ordering::Acquire)) == self.tail.load(Ordering::Acquire)
    }

    /// Bytes dropped by the receive path since the last `init`.
    #[inline]
    pub fn overruns(&self) -> usize {
        self.overruns.load(Ordering::Relaxed)
    }

    #[inline(always)]
    const fn advance(index: usize) -> usize {
        if index + 1 == N { 0 } else { index + 1 }
    }

    /// # Safety
    /// The caller must be the only context enqueueing into this ring.
    #[inline]
    pub(super) unsafe fn enqueue(&self, byte: u8) -> Result<(), RingError> {
        let head = self.head.load(Ordering::Relaxed);
        let next = Self::advance(head);
        if next == self.tail.load(Ordering::Acquire) {
            return Err(RingError::BufferFull);
        }
        // The consumer never reads `buf[head]` until the store below publishes it.
        unsafe { self.buf.get().cast::<u8>().add(head).write(byte) };
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// # Safety
    /// The caller must be the only context dequeueing from this ring.
    #[inline]
    pub(super) unsafe fn dequeue(&self) -> Result<u8, RingError> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return Err(RingError::BufferEmpty);
        }
        // The producer never writes `buf[tail]` until the store below releases it.
        let byte = unsafe { self.buf.get().cast::<u8>().add(tail).read() };
        self.tail.store(Self::advance(tail), Ordering::Release);
        Ok(byte)
    }

    /// Only the producer side calls this.
    #[inline]
    pub(super) fn record_overrun(&self) {
        let dropped = self.overruns.load(Ordering::Relaxed);
        self.overruns.store(dropped.wrapping_add(1), Ordering::Relaxed);
    }
}
