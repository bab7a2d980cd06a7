use super::RxRegister;
use crate::ring::Producer;

/// Interrupt-context side of the receive path.
///
/// Invoked once per received byte by whatever dispatches the UART receive
/// event. A full ring drops the byte; the only trace left is the overrun
/// counter. Never blocks, allocates or logs.
pub struct ReceiveHandler<'a, R, const N: usize> {
    rx: R,
    producer: Producer<'a, N>,
}

impl<'a, R: RxRegister, const N: usize> ReceiveHandler<'a, R, N> {
    pub fn new(rx: R, producer: Producer<'a, N>) -> Self {
        Self { rx, producer }
    }

    /// Returns `false` when the byte was dropped.
    #[inline]
    pub fn on_receive_event(&mut self) -> bool {
        let byte = self.rx.received_data();
        if self.producer.put(byte).is_err() {
            self.producer.record_overrun();
            return false;
        }
        true
    }

    pub fn rx_mut(&mut self) -> &mut R {
        &mut self.rx
    }
}
