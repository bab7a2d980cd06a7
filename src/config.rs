use crate::serial::IrqLine;

/// Backing array size of the receive ring. Holds `SERIAL_BUFFER_SIZE - 1` bytes.
pub const SERIAL_BUFFER_SIZE: usize = 128;

/// Priority of the debug UART receive event interrupt.
pub const RECEIVE_EVENT_PRIORITY: u8 = 63;

/// Interrupt line the debug UART raises on every received byte.
pub const DEBUG_UART_RECEIVE_IRQ: IrqLine = IrqLine(84);

/// How the receive interrupt is armed during `RetargetIo::init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetargetConfig {
    pub receive_irq: IrqLine,
    pub receive_priority: u8,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            receive_irq: DEBUG_UART_RECEIVE_IRQ,
            receive_priority: RECEIVE_EVENT_PRIORITY,
        }
    }
}
