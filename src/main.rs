//! spsc-ring - benchmark dan stress test untuk SPSC Ring Buffer
//!
//! Usage:
//!   cargo run --release -- bench [--capacity N] [--iterations N]
//!   cargo run --release -- stress [--capacity N] [--items N] [--rounds N] [--pin]
//!
//! Log level diatur lewat RUST_LOG (default: info).

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossbeam_utils::Backoff;
use spsc_ring::{Producer, RingBuffer};

#[derive(Parser, Debug)]
#[command(name = "spsc-ring", version, about = "Lock-free SPSC ring buffer benchmark")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Latency push/pop single-thread
    Bench(BenchConfig),
    /// Handoff producer -> consumer di dua thread, verifikasi urutan
    Stress(StressConfig),
}

#[derive(Args, Debug)]
struct BenchConfig {
    /// Kapasitas yang diminta (dibulatkan ke power of 2)
    #[arg(short, long, default_value_t = 65536)]
    capacity: usize,
    /// Jumlah operasi per pengukuran
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: u64,
}

#[derive(Args, Debug)]
struct StressConfig {
    /// Kapasitas yang diminta (dibulatkan ke power of 2)
    #[arg(short, long, default_value_t = 1024)]
    capacity: usize,
    /// Jumlah elemen per round
    #[arg(short, long, default_value_t = 1000)]
    items: u64,
    /// Jumlah round
    #[arg(short, long, default_value_t = 1000)]
    rounds: u32,
    /// Pin producer ke CPU 0 dan consumer ke CPU 1 (Linux)
    #[arg(long)]
    pin: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    match cli.command {
        Commands::Bench(config) => run_bench(&config),
        Commands::Stress(config) => run_stress(&config),
    }
}

fn run_bench(config: &BenchConfig) -> Result<()> {
    println!("📊 Ring Buffer Benchmark (Lock-Free SPSC)");
    println!("-----------------------------------------");

    let mut rb: RingBuffer<u64> = RingBuffer::try_new(config.capacity)
        .with_context(|| format!("failed to allocate ring buffer ({} slots)", config.capacity))?;
    let iterations = config.iterations;
    let (mut tx, mut rx) = rb.split();

    // Warm up
    for i in 0..1000 {
        tx.push(i);
    }
    while rx.pop().is_some() {}

    // Benchmark push
    let start = Instant::now();
    for i in 0..iterations {
        while !tx.push(i) {
            rx.pop();
        }
    }
    let push_duration = start.elapsed();

    // Drain
    while rx.pop().is_some() {}

    // Benchmark pop (refill setiap kali buffer habis, refill tidak diukur)
    let mut pop_duration = Duration::ZERO;
    let mut remaining = iterations;
    while remaining > 0 {
        let batch = remaining.min(tx.capacity() as u64);
        for i in 0..batch {
            tx.push(i);
        }
        let start = Instant::now();
        for _ in 0..batch {
            rx.pop();
        }
        pop_duration += start.elapsed();
        remaining -= batch;
    }

    // Benchmark push+pop cycle
    let start = Instant::now();
    for i in 0..iterations {
        tx.push(i);
        rx.pop();
    }
    let cycle_duration = start.elapsed();

    let per_op = |d: Duration| d.as_nanos() as f64 / iterations as f64;

    println!("  Capacity:     {}", tx.capacity());
    println!("  Operations:   {}", iterations);
    println!("  Push latency: {:.2} ns/op", per_op(push_duration));
    println!("  Pop latency:  {:.2} ns/op", per_op(pop_duration));
    println!("  Cycle:        {:.2} ns/op", per_op(cycle_duration));
    println!(
        "  Throughput:   {:.2} M ops/sec\n",
        iterations as f64 / push_duration.as_secs_f64() / 1_000_000.0
    );

    Ok(())
}

fn run_stress(config: &StressConfig) -> Result<()> {
    println!("🧪 SPSC Stress Test");
    println!("===================");

    let mut rb: RingBuffer<u64> = RingBuffer::try_new(config.capacity)
        .with_context(|| format!("failed to allocate ring buffer ({} slots)", config.capacity))?;
    log::info!(
        "capacity={} items={} rounds={} pin={}",
        rb.capacity(),
        config.items,
        config.rounds,
        config.pin
    );

    let start = Instant::now();
    for round in 0..config.rounds {
        let received = handoff(&mut rb, config.items, config.pin)?;

        if let Some(pos) = received
            .iter()
            .enumerate()
            .position(|(i, &v)| v != i as u64)
        {
            bail!(
                "round {}: expected {} at position {}, got {}",
                round,
                pos,
                pos,
                received[pos]
            );
        }
        if received.len() as u64 != config.items {
            bail!(
                "round {}: expected {} items, got {}",
                round,
                config.items,
                received.len()
            );
        }
        if !rb.is_empty() {
            bail!("round {}: buffer not empty after drain", round);
        }
        log::debug!("round {} ok", round);
    }
    let duration = start.elapsed();

    let total = config.items * config.rounds as u64;
    println!("  Rounds:      {}", config.rounds);
    println!("  Items:       {}", total);
    println!("  Duration:    {:.2}ms", duration.as_secs_f64() * 1000.0);
    println!(
        "  Throughput:  {:.2} M items/sec",
        total as f64 / duration.as_secs_f64() / 1_000_000.0
    );
    println!("\n✅ No reordering, loss, or duplication");

    Ok(())
}

/// Satu round: producer push `0..items`, consumer pop `items` kali
fn handoff(rb: &mut RingBuffer<u64>, items: u64, pin: bool) -> Result<Vec<u64>> {
    handoff_with(rb, items, pin, |tx| {
        let backoff = Backoff::new();
        for i in 0..items {
            while !tx.push(i) {
                backoff.snooze();
            }
            backoff.reset();
        }
    })
}

/// Set flag saat producer selesai, termasuk saat unwinding karena panic
struct DoneOnDrop<'a>(&'a AtomicBool);

impl Drop for DoneOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

fn handoff_with<F>(rb: &mut RingBuffer<u64>, items: u64, pin: bool, produce: F) -> Result<Vec<u64>>
where
    F: FnOnce(&mut Producer<'_, u64>) + Send,
{
    let (mut tx, mut rx) = rb.split();
    let producer_done = AtomicBool::new(false);

    thread::scope(|s| {
        let producer_done = &producer_done;

        let producer = s.spawn(move || {
            let _done = DoneOnDrop(producer_done);
            if pin {
                pin_to_core(0);
            }
            produce(&mut tx);
        });

        let consumer = s.spawn(move || {
            if pin {
                pin_to_core(1);
            }
            let backoff = Backoff::new();
            let mut received = Vec::with_capacity(items as usize);
            let mut value = 0u64;
            while (received.len() as u64) < items {
                if rx.pop_into(&mut value) {
                    received.push(value);
                    backoff.reset();
                } else if producer_done.load(Ordering::Acquire) && rx.is_empty() {
                    // Producer berhenti lebih awal, tidak ada lagi yang datang
                    break;
                } else {
                    backoff.snooze();
                }
            }
            received
        });

        let produced = producer.join();
        let received = consumer
            .join()
            .map_err(|_| anyhow!("consumer thread panicked"))?;
        produced.map_err(|_| anyhow!("producer thread panicked"))?;
        Ok(received)
    })
}

#[cfg(target_os = "linux")]
fn pin_to_core(core: usize) {
    // SAFETY: cpu_set_t adalah plain bitmask, zeroed adalah set kosong yang valid
    let rc = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };
    if rc != 0 {
        log::warn!(
            "failed to pin thread to CPU {}: {}",
            core,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn pin_to_core(core: usize) {
    log::warn!("CPU pinning not supported on this platform (CPU {})", core);
}
