//! Criterion benchmark untuk Ring Buffer
//!
//! Run dengan: cargo bench

use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spsc_ring::RingBuffer;

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Elements(1));

    // Benchmark push
    group.bench_function("push", |b| {
        let mut rb: RingBuffer<u64> = RingBuffer::new(65536);
        let (mut tx, mut rx) = rb.split();
        let mut i = 0u64;
        b.iter(|| {
            if !tx.push(black_box(i)) {
                rx.pop();
                tx.push(black_box(i));
            }
            i = i.wrapping_add(1);
        });
    });

    // Benchmark pop
    group.bench_function("pop", |b| {
        let mut rb: RingBuffer<u64> = RingBuffer::new(65536);
        let (mut tx, mut rx) = rb.split();
        // Pre-fill
        for i in 0..32768 {
            tx.push(i);
        }
        b.iter(|| {
            if let Some(v) = rx.pop() {
                tx.push(black_box(v));
            }
        });
    });

    // Benchmark push+pop cycle
    group.bench_function("push_pop_cycle", |b| {
        let mut rb: RingBuffer<u64> = RingBuffer::new(65536);
        let (mut tx, mut rx) = rb.split();
        let mut i = 0u64;
        b.iter(|| {
            tx.push(black_box(i));
            let _ = rx.pop();
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    // Batch operations
    for batch_size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_function(format!("batch_{}", batch_size), |b| {
            let mut rb: RingBuffer<u64> = RingBuffer::new(65536);
            let (mut tx, mut rx) = rb.split();
            b.iter(|| {
                for i in 0..*batch_size {
                    tx.push(black_box(i as u64));
                }
                for _ in 0..*batch_size {
                    black_box(rx.pop());
                }
            });
        });
    }

    group.finish();
}

fn bench_cross_thread(c: &mut Criterion) {
    const ITEMS: u64 = 100_000;

    let mut group = c.benchmark_group("cross_thread");
    group.throughput(Throughput::Elements(ITEMS));
    group.sample_size(20);

    for capacity in [64usize, 1024, 65536] {
        group.bench_function(format!("handoff_cap_{}", capacity), |b| {
            let mut rb: RingBuffer<u64> = RingBuffer::new(capacity);
            b.iter(|| {
                let (mut tx, mut rx) = rb.split();
                thread::scope(|s| {
                    s.spawn(move || {
                        for i in 0..ITEMS {
                            while !tx.push(i) {
                                std::hint::spin_loop();
                            }
                        }
                    });
                    let mut sum = 0u64;
                    for _ in 0..ITEMS {
                        loop {
                            if let Some(v) = rx.pop() {
                                sum = sum.wrapping_add(v);
                                break;
                            }
                            std::hint::spin_loop();
                        }
                    }
                    black_box(sum)
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_throughput, bench_cross_thread);
criterion_main!(benches);
