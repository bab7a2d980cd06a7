use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Advancing `head` would collide with `tail`.
    #[error("ring buffer full")]
    BufferFull,
    /// `head == tail`, nothing to read.
    #[error("ring buffer empty")]
    BufferEmpty,
}
