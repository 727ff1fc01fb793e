use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marketscope::partition::analyze_markets;
use marketscope::{partition_by_structure, Record};

fn census(records: usize) -> Vec<Record> {
    (0..records)
        .map(|i| {
            // Deterministic mix: 50 activities, firm sizes skewed toward low ids.
            let activity = format!("activity-{}", i % 50);
            let firm = format!("firm-{}", (i * 7919) % 97 % (1 + i % 13));
            Record::new(firm, activity)
        })
        .collect()
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_by_structure");
    for size in [1_000usize, 10_000, 100_000] {
        let records = census(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let records = black_box(records);
                partition_by_structure(records, Record::activity_class, Record::firm_name).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let records = census(10_000);
    c.bench_function("analyze_markets/10000", |b| {
        b.iter(|| {
            analyze_markets(black_box(&records), Record::activity_class, Record::firm_name)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_partition, bench_analyze);
criterion_main!(benches);
