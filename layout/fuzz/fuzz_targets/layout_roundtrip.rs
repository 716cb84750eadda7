#![no_main]

use arbitrary::Arbitrary;
use commonware_layout::{Cache, Generator};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    Compact { formula: String, data: Vec<u8> },
    Named { fields: Vec<(String, String)>, data: Vec<u8> },
    Json { json: String, data: Vec<u8> },
}

fn roundtrip(generator: Arc<Generator>, data: &[u8]) {
    // A fresh instance only holds what was read, so packing reproduces the consumed prefix
    let Ok(instance) = generator.create_instance(Some(data)) else {
        return;
    };
    let packed = instance.pack().expect("Failed to pack a decoded instance!");
    assert_eq!(packed.len(), instance.total_length());
    assert_eq!(&packed[..], &data[..packed.len()]);

    let copy = generator
        .create_instance(Some(&packed[..]))
        .expect("Failed to decode a successfully packed instance!");
    assert_eq!(copy, instance);
}

fn fuzz(input: FuzzInput) {
    let cache = Cache::new();
    let (generator, data) = match input {
        FuzzInput::Compact { formula, data } => (cache.compact(&formula), data),
        FuzzInput::Named { fields, data } => (cache.named(fields), data),
        FuzzInput::Json { json, data } => (cache.json(&json), data),
    };
    if let Ok(generator) = generator {
        roundtrip(generator, &data);
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
