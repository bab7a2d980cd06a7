//! UART collaborators for a hosted build, backed by raw file descriptors.
//!
//! A dedicated thread stands in for the receive interrupt: [`HostRx::run`]
//! blocks on the descriptor and fires the receive handler once per byte.

use crate::serial::{InterruptController, IrqLine, ReceiveHandler, RxRegister, TxRegister};
use std::collections::HashMap;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxWait {
    /// A byte is latched and ready for `received_data`.
    Byte,
    Timeout,
    /// The descriptor hit end of file or hung up.
    Closed,
}

pub struct HostRx {
    fd: RawFd,
    latched: u8,
}

impl HostRx {
    pub fn new(fd: RawFd) -> Self {
        Self { fd, latched: 0 }
    }

    pub fn stdin() -> Self {
        Self::new(libc::STDIN_FILENO)
    }

    /// Waits up to `timeout` for one byte and latches it.
    pub fn wait(&mut self, timeout: Duration) -> io::Result<RxWait> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(RxWait::Timeout);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(RxWait::Timeout);
        }

        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast::<libc::c_void>(), 1) };
        match n {
            1 => {
                self.latched = byte;
                Ok(RxWait::Byte)
            }
            0 => Ok(RxWait::Closed),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(RxWait::Timeout),
                    _ => Err(err),
                }
            }
        }
    }

    /// Dispatches receive events to `handler` until the descriptor closes or
    /// `running` is cleared. Returns the number of events delivered.
    pub fn run<const N: usize>(
        handler: &mut ReceiveHandler<'_, HostRx, N>,
        running: &AtomicBool,
        poll_interval: Duration,
    ) -> io::Result<u64> {
        let mut events = 0u64;
        while running.load(Ordering::Relaxed) {
            match handler.rx_mut().wait(poll_interval)? {
                RxWait::Byte => {
                    handler.on_receive_event();
                    events += 1;
                }
                RxWait::Timeout => {}
                RxWait::Closed => {
                    debug!(fd = handler.rx_mut().fd, "receive descriptor closed");
                    break;
                }
            }
        }
        Ok(events)
    }
}

impl RxRegister for HostRx {
    fn received_data(&mut self) -> u8 {
        self.latched
    }
}

pub struct HostTx {
    fd: RawFd,
}

impl HostTx {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    pub fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }
}

impl TxRegister for HostTx {
    fn transmit(&mut self, byte: u8) {
        loop {
            let n = unsafe { libc::write(self.fd, (&byte as *const u8).cast::<libc::c_void>(), 1) };
            if n == 1 {
                return;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                warn!(fd = self.fd, error = %err, "transmit failed, byte dropped");
                return;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    pub priority: Option<u8>,
    pub enabled: bool,
}

/// Bookkeeping interrupt controller: nothing to arm on a host.
#[derive(Debug, Default)]
pub struct HostInterrupts {
    lines: HashMap<IrqLine, LineState>,
}

impl HostInterrupts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, line: IrqLine) -> LineState {
        self.lines.get(&line).copied().unwrap_or_default()
    }
}

impl InterruptController for HostInterrupts {
    fn set_priority(&mut self, line: IrqLine, priority: u8) {
        debug!(irq = line.0, priority, "set interrupt priority");
        self.lines.entry(line).or_default().priority = Some(priority);
    }

    fn enable(&mut self, line: IrqLine) {
        info!(irq = line.0, "interrupt enabled");
        self.lines.entry(line).or_default().enabled = true;
    }
}
