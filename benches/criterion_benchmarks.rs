//! Single-threaded operation benchmarks for every policy.

#![allow(missing_docs)]

use blobcache::config::{GdsfCacheConfig, LfuCacheConfig, LruCacheConfig};
use blobcache::{GdsfCache, LfuCache, LruCache};
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ENTRIES: usize = 1000;
const VALUE_SIZE: usize = 256;
const MAX_SIZE: u64 = (ENTRIES * VALUE_SIZE) as u64;

fn make_lru(max_size: u64) -> LruCache {
    LruCache::init(LruCacheConfig { max_size }, None)
}

fn make_lfu(max_size: u64) -> LfuCache {
    LfuCache::init(LfuCacheConfig { max_size }, None)
}

fn make_gdsf(max_size: u64, max_evictions: usize) -> GdsfCache {
    GdsfCache::init(
        GdsfCacheConfig::new(max_size).with_max_evictions(max_evictions),
        None,
    )
}

fn keys() -> Vec<String> {
    (0..ENTRIES * 2).map(|i| format!("object/{i:08}")).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let keys = keys();
    let value = Bytes::from(vec![0u8; VALUE_SIZE]);
    let mut group = c.benchmark_group("Cache Operations");

    // LRU benchmarks
    {
        let cache = make_lru(MAX_SIZE);
        for key in &keys[..ENTRIES] {
            cache.put(key.as_str(), value.clone());
        }

        group.bench_function("LRU get hit", |b| {
            b.iter(|| {
                for key in &keys[..100] {
                    black_box(cache.get(key));
                }
            });
        });

        group.bench_function("LRU get miss", |b| {
            b.iter(|| {
                for key in &keys[ENTRIES..ENTRIES + 100] {
                    black_box(cache.get(key));
                }
            });
        });

        group.bench_function("LRU has", |b| {
            b.iter(|| {
                for key in &keys[..100] {
                    black_box(cache.has(key));
                }
            });
        });

        group.bench_function("LRU put evicting", |b| {
            let mut i = 0;
            b.iter(|| {
                for _ in 0..100 {
                    cache.put(keys[i % keys.len()].as_str(), value.clone());
                    i += 1;
                }
            });
        });
    }

    // LFU benchmarks
    {
        let cache = make_lfu(MAX_SIZE);
        for key in &keys[..ENTRIES] {
            cache.put(key.as_str(), value.clone());
        }

        group.bench_function("LFU get hit", |b| {
            b.iter(|| {
                for key in &keys[..100] {
                    black_box(cache.get(key));
                }
            });
        });

        group.bench_function("LFU put evicting", |b| {
            let mut i = 0;
            b.iter(|| {
                for _ in 0..100 {
                    cache.put(keys[i % keys.len()].as_str(), value.clone());
                    i += 1;
                }
            });
        });
    }

    // GDSF benchmarks
    {
        let cache = make_gdsf(MAX_SIZE, 10);
        for key in &keys[..ENTRIES] {
            let _ = cache.put(key.as_str(), value.clone());
        }

        group.bench_function("GDSF get hit", |b| {
            b.iter(|| {
                for key in &keys[..100] {
                    black_box(cache.get(key));
                }
            });
        });
    }

    group.finish();
}

/// GDSF put cost as the number of victims per admission grows.
pub fn gdsf_batch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("GDSF batch eviction");
    let small = Bytes::from(vec![0u8; 16]);

    for batch in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            let cache = make_gdsf(16 * 1024, batch);
            let large = Bytes::from(vec![0u8; 16 * batch]);
            let mut i = 0u64;
            b.iter(|| {
                for _ in 0..batch {
                    let _ = cache.put(format!("s{i}"), small.clone());
                    i += 1;
                }
                let _ = black_box(cache.put(format!("l{i}"), large.clone()));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark, gdsf_batch_benchmark);
criterion_main!(benches);
