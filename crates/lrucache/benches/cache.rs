use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrucache::Cache;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit_1k", |b| {
        let mut cache = Cache::new(1000);
        let data = vec![b'x'; 1024];

        for i in 0..1000u64 {
            cache.add(i, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_add_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_evict");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_distinct_full_cache", |b| {
        let mut cache = Cache::builder()
            .max_entries(1000)
            .on_evicted(|_: u64, v: u64| {
                black_box(v);
            })
            .build();

        let mut counter = 0u64;
        b.iter(|| {
            cache.add(counter, counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = Cache::new(1000);

        for i in 0..1000u64 {
            cache.add(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.get(&(counter % 2000)));
            } else {
                cache.add(counter % 2000, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_add_evict, bench_mixed_50_50);
criterion_main!(benches);
