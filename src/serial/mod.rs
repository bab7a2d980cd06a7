pub mod line_reader;
pub mod retarget;
pub mod rx;
pub mod writer;

pub use line_reader::LineReader;
pub use retarget::{RetargetError, RetargetIo};
pub use rx::ReceiveHandler;
pub use writer::Writer;

/// Interrupt controller line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrqLine(pub u16);

/// Receive data register of the UART.
pub trait RxRegister {
    /// Returns the byte that raised the current receive event.
    fn received_data(&mut self) -> u8;
}

/// Transmit side of the UART. Blocks until the byte is on the wire.
pub trait TxRegister {
    fn transmit(&mut self, byte: u8);
}

/// The pieces of the interrupt controller needed to arm the receive event.
pub trait InterruptController {
    fn set_priority(&mut self, line: IrqLine, priority: u8);

    fn enable(&mut self, line: IrqLine);
}
