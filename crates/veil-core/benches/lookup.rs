use criterion::{black_box, criterion_group, criterion_main, Criterion};

use veil_core::hash::murmur3_32;
use veil_core::{decode, encode, BloomFilter, TrackerMatcher};

fn build_filter(n: usize) -> BloomFilter {
    let mut filter = BloomFilter::with_capacity(n, 0.001).expect("valid params");
    for i in 0..n {
        filter.add(&format!("tracker{i}.example{}.net", i % 31));
    }
    filter
}

fn bench_hash(c: &mut Criterion) {
    c.bench_function("murmur3_32/domain", |b| {
        b.iter(|| murmur3_32(black_box(b"stats.g.doubleclick.net"), black_box(0)))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let matcher = TrackerMatcher::new(build_filter(20_000));

    c.bench_function("is_tracker/hit", |b| {
        b.iter(|| matcher.is_tracker(black_box("tracker42.example11.net")))
    });
    c.bench_function("is_tracker/miss", |b| {
        b.iter(|| matcher.is_tracker(black_box("cdn.example.org")))
    });
    c.bench_function("uncloak/chain", |b| {
        let chain = ["metrics.shop.example", "shop.example.edge.net"];
        b.iter(|| matcher.uncloak(black_box(&chain)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&build_filter(20_000));
    c.bench_function("decode/20k", |b| b.iter(|| decode(black_box(&bytes))));
}

criterion_group!(benches, bench_hash, bench_lookup, bench_decode);
criterion_main!(benches);
