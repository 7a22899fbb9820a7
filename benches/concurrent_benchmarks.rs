//! Concurrent Cache Benchmarks
//!
//! Measures one shared cache instance under several threads for different
//! access patterns and thread counts.

#![allow(missing_docs)]

use blobcache::{Cache, GdsfCache, LfuCache, LruCache};
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;

const ENTRIES: usize = 10_000;
const VALUE_SIZE: usize = 128;
const MAX_SIZE: u64 = (ENTRIES * VALUE_SIZE) as u64;
const OPS_PER_THREAD: usize = 1_000;

fn key(i: usize) -> String {
    format!("object/{i:08}")
}

fn all_caches() -> Vec<(&'static str, Arc<dyn Cache>)> {
    let lru: Arc<dyn Cache> = Arc::new(LruCache::new(MAX_SIZE));
    let lfu: Arc<dyn Cache> = Arc::new(LfuCache::new(MAX_SIZE));
    let gdsf: Arc<dyn Cache> = Arc::new(GdsfCache::new(MAX_SIZE, 10));
    vec![("LRU", lru), ("LFU", lfu), ("GDSF", gdsf)]
}

fn populated_caches() -> Vec<(&'static str, Arc<dyn Cache>)> {
    let caches = all_caches();
    let value = Bytes::from(vec![0u8; VALUE_SIZE]);
    for (_, cache) in &caches {
        for i in 0..ENTRIES {
            let _ = cache.put(key(i), value.clone());
        }
    }
    caches
}

/// Benchmark concurrent get hits across all cache types
fn concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Reads");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    for (name, cache) in populated_caches() {
        group.bench_function(name, |b| {
            b.iter(|| run_concurrent(Arc::clone(&cache), 8, Workload::Get));
        });
    }
    group.finish();
}

/// Benchmark concurrent membership checks (shared lock only)
fn concurrent_has(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Has");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    for (name, cache) in populated_caches() {
        group.bench_function(name, |b| {
            b.iter(|| run_concurrent(Arc::clone(&cache), 8, Workload::Has));
        });
    }
    group.finish();
}

/// Benchmark concurrent puts that keep the cache at its budget
fn concurrent_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Writes");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    for (name, cache) in all_caches() {
        group.bench_function(name, |b| {
            b.iter(|| run_concurrent(Arc::clone(&cache), 8, Workload::Put));
        });
    }
    group.finish();
}

/// Benchmark mixed operations (80% reads, 20% writes) at several thread counts
fn concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Mixed");

    for threads in [1usize, 2, 4, 8, 16] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        for (name, cache) in populated_caches() {
            group.bench_with_input(BenchmarkId::new(name, threads), &threads, |b, &threads| {
                b.iter(|| run_concurrent(Arc::clone(&cache), threads, Workload::Mixed));
            });
        }
    }
    group.finish();
}

#[derive(Clone, Copy)]
enum Workload {
    Get,
    Has,
    Put,
    Mixed,
}

fn run_concurrent(cache: Arc<dyn Cache>, num_threads: usize, workload: Workload) {
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let value = Bytes::from(vec![t as u8; VALUE_SIZE]);
            for i in 0..OPS_PER_THREAD {
                let slot = t * OPS_PER_THREAD + i;
                match workload {
                    Workload::Get => {
                        black_box(cache.get(&key(slot % ENTRIES)));
                    }
                    Workload::Has => {
                        black_box(cache.has(&key(slot % ENTRIES)));
                    }
                    Workload::Put => {
                        let _ = cache.put(key(slot), value.clone());
                    }
                    Workload::Mixed if i % 5 == 0 => {
                        let _ = cache.put(key(slot % (ENTRIES * 2)), value.clone());
                    }
                    Workload::Mixed => {
                        black_box(cache.get(&key(slot % (ENTRIES * 2))));
                    }
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

criterion_group!(
    benches,
    concurrent_reads,
    concurrent_has,
    concurrent_writes,
    concurrent_mixed
);
criterion_main!(benches);
