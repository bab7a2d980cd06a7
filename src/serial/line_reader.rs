use crate::ring::Consumer;

/// Carriage return, the byte that ends a read.
pub const TERMINATOR: u8 = 0x0D;

/// What a terminator is handed back as.
pub const LINE_FEED: u8 = b'\n';

/// Non-blocking line-oriented drain of the receive ring.
pub struct LineReader<'a, const N: usize> {
    consumer: Consumer<'a, N>,
}

impl<'a, const N: usize> LineReader<'a, N> {
    pub fn new(consumer: Consumer<'a, N>) -> Self {
        Self { consumer }
    }

    /// Moves buffered bytes into `out` until it is full, the ring runs dry,
    /// or a carriage return arrives. The carriage return is stored as `\n`
    /// and counted. Returns the number of bytes written, possibly zero.
    #[inline]
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in out.iter_mut() {
            let Ok(byte) = self.consumer.get() else {
                break;
            };
            count += 1;
            if byte == TERMINATOR {
                *slot = LINE_FEED;
                break;
            }
            *slot = byte;
        }
        count
    }

    pub fn consumer(&self) -> &Consumer<'a, N> {
        &self.consumer
    }
}
