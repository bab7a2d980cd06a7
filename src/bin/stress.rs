use anyhow::{Context, Result, bail};
use clap::Parser;
use serial_retarget::config::SERIAL_BUFFER_SIZE;
use serial_retarget::ring::RingBuffer;
use serial_retarget::serial::line_reader::{LINE_FEED, TERMINATOR};
use serial_retarget::serial::{LineReader, ReceiveHandler, RxRegister};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Hammers the receive ring from one thread while another drains it.
#[derive(Parser)]
struct Args {
    #[arg(long, default_value_t = 5)]
    seconds: u64,

    /// Feed through the receive handler and let overruns drop bytes instead
    /// of spinning until there is room.
    #[arg(long)]
    lossy: bool,
}

/// Receive register that yields a rolling byte counter.
struct CounterRx {
    next: u64,
}

impl RxRegister for CounterRx {
    fn received_data(&mut self) -> u8 {
        let byte = self.next as u8;
        self.next += 1;
        byte
    }
}

fn expected(seq: u64) -> u8 {
    match seq as u8 {
        TERMINATOR => LINE_FEED,
        b => b,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt::init();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let mut ring = RingBuffer::<SERIAL_BUFFER_SIZE>::new();
    let (mut prod, cons) = ring.split();
    let mut line_reader = LineReader::new(cons);
    let producer_done = AtomicBool::new(false);
    let started = Instant::now();

    std::thread::scope(|scope| -> Result<()> {
        let writer_running = running.clone();
        let lossy = args.lossy;
        let done = &producer_done;
        let writer = scope.spawn(move || {
            let mut produced = 0u64;
            if lossy {
                let mut handler = ReceiveHandler::new(CounterRx { next: 0 }, prod);
                while writer_running.load(Ordering::Relaxed) {
                    handler.on_receive_event();
                    produced += 1;
                }
            } else {
                while writer_running.load(Ordering::Relaxed) {
                    if prod.put(produced as u8).is_ok() {
                        produced += 1;
                    }
                }
            }
            done.store(true, Ordering::SeqCst);
            produced
        });

        let reader = scope.spawn(move || -> Result<(u64, usize)> {
            let mut chunk = [0u8; 32];
            let mut received = 0u64;
            loop {
                let stopping = done.load(Ordering::SeqCst);
                let n = line_reader.read(&mut chunk);
                if !lossy {
                    for (i, &byte) in chunk[..n].iter().enumerate() {
                        let seq = received + i as u64;
                        if byte != expected(seq) {
                            bail!("out of order at byte {seq}: got {byte:#04x}");
                        }
                    }
                }
                received += n as u64;
                if n == 0 && stopping {
                    break;
                }
            }
            Ok((received, line_reader.consumer().overruns()))
        });

        info!(seconds = args.seconds, lossy, "running");
        let deadline = Duration::from_secs(args.seconds);
        while running.load(Ordering::SeqCst) && started.elapsed() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);

        let produced = writer
            .join()
            .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
        let (received, overruns) = reader
            .join()
            .map_err(|_| anyhow::anyhow!("consumer thread panicked"))??;
        let elapsed = started.elapsed().as_secs_f64();

        if received + overruns as u64 != produced {
            bail!("lost bytes: produced={produced} received={received} overruns={overruns}");
        }

        info!(
            produced,
            received,
            overruns,
            throughput_mbps = received as f64 / elapsed / 1_000_000.0,
            "done"
        );
        Ok(())
    })
}
