//! Character stream adapter that routes `std::io` reads and writes onto the
//! debug UART.
//!
//! `Read` drains whatever the receive interrupt has buffered and returns
//! immediately. `Ok(0)` therefore means "nothing buffered yet", not end of
//! stream. `Write` transmits synchronously, byte by byte.
//!
//! The descriptor operations a generic stream carries (close, seek, stat,
//! terminal query) are stubs that fail unconditionally.

use super::{InterruptController, LineReader, ReceiveHandler, RxRegister, TxRegister, Writer};
use crate::config::RetargetConfig;
use crate::ring::RingBuffer;
use std::io;
use thiserror::Error;
use tracing::{info, trace, warn};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RetargetError {
    #[error("{op} is not supported on the retargeted UART stream")]
    Unsupported { op: &'static str },
}

impl From<RetargetError> for io::Error {
    fn from(err: RetargetError) -> Self {
        io::Error::new(io::ErrorKind::Unsupported, err)
    }
}

/// Stream metadata `fstat` would report. Never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
}

pub struct RetargetIo<'a, T, const N: usize> {
    reader: LineReader<'a, N>,
    writer: Writer<T>,
    seen_overruns: usize,
}

impl<'a, T: TxRegister, const N: usize> RetargetIo<'a, T, N> {
    /// Resets `ring`, arms the receive interrupt and splits the ring between
    /// the returned receive handler and stream.
    ///
    /// Call once, before the receive event can fire.
    pub fn init<R, I>(
        ring: &'a mut RingBuffer<N>,
        irq: &mut I,
        config: RetargetConfig,
        rx: R,
        tx: T,
    ) -> (ReceiveHandler<'a, R, N>, Self)
    where
        R: RxRegister,
        I: InterruptController + ?Sized,
    {
        ring.init();
        irq.set_priority(config.receive_irq, config.receive_priority);
        irq.enable(config.receive_irq);
        info!(
            irq = config.receive_irq.0,
            priority = config.receive_priority,
            capacity = ring.capacity(),
            "retarget io initialised"
        );

        let (producer, consumer) = ring.split();
        let handler = ReceiveHandler::new(rx, producer);
        let io = Self {
            reader: LineReader::new(consumer),
            writer: Writer::new(tx),
            seen_overruns: 0,
        };
        (handler, io)
    }

    /// Non-blocking read. See [`LineReader::read`].
    pub fn read_line(&mut self, buf: &mut [u8]) -> usize {
        self.report_overruns();
        let count = self.reader.read(buf);
        trace!(requested = buf.len(), count, "uart read");
        count
    }

    pub fn write_bytes(&mut self, buf: &[u8]) -> usize {
        self.writer.write(buf)
    }

    /// Bytes dropped by the receive handler since `init`.
    pub fn overruns(&self) -> usize {
        self.reader.consumer().overruns()
    }

    pub fn close(&mut self) -> Result<(), RetargetError> {
        Err(RetargetError::Unsupported { op: "close" })
    }

    pub fn fstat(&self) -> Result<FileStat, RetargetError> {
        Err(RetargetError::Unsupported { op: "fstat" })
    }

    pub fn is_terminal(&self) -> bool {
        false
    }

    pub fn tx(&self) -> &T {
        self.writer.tx()
    }

    fn report_overruns(&mut self) {
        let overruns = self.overruns();
        if overruns != self.seen_overruns {
            warn!(
                dropped = overruns.wrapping_sub(self.seen_overruns),
                total = overruns,
                "receive buffer overrun, bytes dropped"
            );
            self.seen_overruns = overruns;
        }
    }
}

impl<T: TxRegister, const N: usize> io::Read for RetargetIo<'_, T, N> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_line(buf))
    }
}

impl<T: TxRegister, const N: usize> io::Write for RetargetIo<'_, T, N> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: TxRegister, const N: usize> io::Seek for RetargetIo<'_, T, N> {
    fn seek(&mut self, _pos: io::SeekFrom) -> io::Result<u64> {
        Err(RetargetError::Unsupported { op: "seek" }.into())
    }
}
