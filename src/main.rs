use anyhow::{Context, Result};
use clap::Parser;
use serial_retarget::config::{RetargetConfig, SERIAL_BUFFER_SIZE};
use serial_retarget::host::{HostInterrupts, HostRx, HostTx};
use serial_retarget::ring::RingBuffer;
use serial_retarget::serial::RetargetIo;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Line console over stdin/stdout driven the way the debug UART is: a
/// receive thread plays the interrupt, the main loop polls `read`.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Consumer poll interval in milliseconds.
    #[arg(long, default_value_t = 10)]
    poll_ms: u64,

    /// Do not echo received lines back to stdout.
    #[arg(long)]
    no_echo: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let mut ring = RingBuffer::<SERIAL_BUFFER_SIZE>::new();
    let mut irq = HostInterrupts::new();
    let (mut handler, mut io) = RetargetIo::init(
        &mut ring,
        &mut irq,
        RetargetConfig::default(),
        HostRx::stdin(),
        HostTx::stdout(),
    );

    let poll = Duration::from_millis(args.poll_ms);
    info!(poll_ms = args.poll_ms, "console running, Ctrl+C to stop");

    std::thread::scope(|scope| -> Result<()> {
        let rx_running = running.clone();
        let receiver = scope.spawn(move || {
            let result = HostRx::run(&mut handler, &rx_running, poll);
            rx_running.store(false, Ordering::SeqCst);
            result
        });

        let mut line = Vec::new();
        let mut chunk = [0u8; 64];
        let mut lines = 0u64;
        let mut last_report = Instant::now();

        loop {
            let stopping = !running.load(Ordering::SeqCst);
            let n = io.read_line(&mut chunk);
            if n > 0 {
                line.extend_from_slice(&chunk[..n]);
                if line.last() == Some(&b'\n') {
                    lines += 1;
                    if !args.no_echo {
                        io.write_all(&line).context("echo failed")?;
                    }
                    line.clear();
                }
                continue;
            }

            if stopping {
                break;
            }

            if last_report.elapsed() >= Duration::from_secs(5) {
                info!(lines, overruns = io.overruns(), "status");
                last_report = Instant::now();
            }

            std::thread::sleep(poll);
        }

        if !line.is_empty() {
            warn!(pending = line.len(), "input ended mid-line");
        }

        let events = receiver
            .join()
            .map_err(|_| anyhow::anyhow!("receive thread panicked"))?
            .context("receive thread failed")?;
        info!(events, lines, overruns = io.overruns(), "shutting down");
        Ok(())
    })
}
