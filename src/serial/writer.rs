use super::TxRegister;

/// Unbuffered transmit path: one `transmit` call per byte, in order.
pub struct Writer<T> {
    tx: T,
}

impl<T: TxRegister> Writer<T> {
    pub fn new(tx: T) -> Self {
        Self { tx }
    }

    /// Always reports the whole buffer as written.
    #[inline]
    pub fn write(&mut self, buf: &[u8]) -> usize {
        for &byte in buf {
            self.tx.transmit(byte);
        }
        buf.len()
    }

    pub fn tx(&self) -> &T {
        &self.tx
    }

    pub fn into_inner(self) -> T {
        self.tx
    }
}
