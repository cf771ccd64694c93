use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xcall_check::checksum::{fold_units, variants};
use xcall_check::{Value, Variant};

fn bench_fold(c: &mut Criterion) {
    let units: Vec<u64> = (0..1024 * 1024).collect();
    c.bench_function("fold_1m_units", |b| b.iter(|| fold_units(black_box(&units))));
}

fn bench_typed_variants(c: &mut Criterion) {
    c.bench_function("combo20_typed", |b| {
        b.iter(|| {
            variants::combo20(
                black_box(1), 2, 3, 4, 5, 6, 7, 8, 9, 10,
                11, 12, 13, 14, 15, 16, 17, 18, 19, true,
            )
        })
    });

    let ints: Vec<i32> = (0..4096).collect();
    let text: Vec<u16> = "JNI round-trip check".encode_utf16().collect();
    c.bench_function("mixed_reference_4k_ints", |b| {
        b.iter(|| {
            variants::mixed_reference(
                true,
                Some(black_box(text.as_slice())),
                Some(black_box(ints.as_slice())),
                None,
                None,
            )
        })
    });
}

fn bench_dynamic_variant(c: &mut Criterion) {
    let args: Vec<Value> = (0..20)
        .map(|i| match i {
            0..=9   => Value::Long(i),
            10..=14 => Value::Int(i as i32),
            15..=16 => Value::Short(i as i16),
            17..=18 => Value::Byte(i as i8),
            _       => Value::Bool(true),
        })
        .collect();

    c.bench_function("combo20_dynamic", |b| {
        b.iter(|| Variant::Combo20.checksum(black_box(&args)).unwrap())
    });
}

criterion_group!(benches, bench_fold, bench_typed_variants, bench_dynamic_variant);
criterion_main!(benches);
