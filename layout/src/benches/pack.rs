use commonware_layout::Generator;
use criterion::{criterion_group, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group(module_path!());
    for len in [16usize, 256, 4096] {
        let generator = Generator::from_named([
            ("id", "Q".to_string()),
            ("flags", "H".to_string()),
            ("payload", format!("b[{len}]")),
            ("samples", "d[]".to_string()),
        ])
        .unwrap();
        let mut record = generator.create_instance(None).unwrap();
        record.set("id", 42u64).unwrap();
        record.set("payload", vec![7u8; len]).unwrap();
        record.set("samples", vec![0.5f64; 32]).unwrap();

        group.throughput(Throughput::Bytes(record.total_length() as u64));
        group.bench_with_input(BenchmarkId::new("payload", len), &record, |b, record| {
            b.iter(|| black_box(record.pack().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack);
