use criterion::criterion_main;

mod pack;

criterion_main!(pack::benches, unpack::benches);
