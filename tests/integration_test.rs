use proptest::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ptr;
use tempfile::NamedTempFile;
use xcall_check::checksum::{fold_units, variants, FNV_OFFSET_BASIS};
use xcall_check::echo;
use xcall_check::ffi::{self, rc};
use xcall_check::suite::{self, reference};
use xcall_check::value::utf16_units;
use xcall_check::{Checksum, Trace, Utf16Text, Value, Variant, VectorFile};

#[test]
fn test_known_vectors() {
    let mut one = xcall_check::Accumulator::new();
    one.mix_unit(1);
    assert_eq!(one.finish(), Checksum(0xaf63_bc4c_8601_b62c));

    let multi = variants::multi_primitive(true, -1, u16::from(b'A'), -1, -1, -1, 1.0, 1.0);
    assert_eq!(multi, Checksum(0xf979_aa69_41fe_0efb));

    let mut nan = xcall_check::Accumulator::new();
    nan.feed(&f32::from_bits(0x7FC0_0000));
    assert_eq!(nan.finish(), Checksum(0x6f63_be18_0141_b7df));
}

#[test]
fn test_reference_suite_passes() {
    let report = suite::run();
    assert!(report.passed(), "{}", report.summary());
}

#[test]
fn test_variant_isolation() {
    // combo5 and combo7 share the bool, byte, short, int and long slots in
    // opposite order; combo7 also leads with a float and a double.
    let (flag, b, s, i, l) = (true, 5i8, 6i16, 7i32, 8i64);
    let c5 = variants::combo5(flag, b, s, i, l);
    assert_eq!(c5.value(), fold_units(&[1, 5, 6, 7, 8]));
    for (f1, d1) in [(0.0f32, 0.0f64), (1.0, 1.0), (f32::from_bits(0x7FC0_0000), -0.0)] {
        let c7 = variants::combo7(f1, d1, l, i, s, b, flag);
        assert_eq!(
            c7.value(),
            fold_units(&[u64::from(f1.to_bits()), d1.to_bits(), 8, 7, 6, 5, 1]),
        );
        assert_ne!(c5, c7);
    }
}

#[test]
fn test_empty_argument_list_is_basis() {
    assert_eq!(fold_units(&[]), FNV_OFFSET_BASIS);
}

#[test]
fn test_vector_file_roundtrip() {
    let args = vec![Value::Int(0x1111_1111), Value::Long(0x2222_2222_3333_3333), Value::Double(1.5)];
    let expect = Checksum(reference::combo3(0x1111_1111, 0x2222_2222_3333_3333, 1.5));
    let json = format!(
        r#"{{ "cases": [
            {{ "name": "combo3", "variant": "combo3", "args": {}, "expect": "{}" }},
            {{ "name": "combo3 signed", "variant": "combo3", "args": {}, "expect": {} }}
        ] }}"#,
        serde_json::to_string(&args).unwrap(),
        expect,
        serde_json::to_string(&args).unwrap(),
        expect.as_i64(),
    );

    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(json.as_bytes()).unwrap();
    temp.flush().unwrap();

    let file = VectorFile::load(temp.path()).unwrap();
    let outcomes = file.evaluate();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.passed()), "{outcomes:?}");
}

#[test]
fn test_trace_file_replay() {
    let args = vec![
        Value::Bool(true),
        Value::Text(Some("Multi-param JNI".into())),
        Value::IntArray(Some(vec![10, -10, 1000])),
        Value::LongArray(Some(vec![1, 2, 3, 4])),
        Value::BoolArray(Some(vec![false, true])),
    ];
    let trace = Trace::record(Variant::MixedReference, &args).unwrap();
    // flag + (1 + 15) text + (1 + 3) + (1 + 4) + (1 + 2)
    assert_eq!(trace.units.len(), 29);

    let temp = NamedTempFile::new().unwrap();
    {
        let mut w = BufWriter::new(File::create(temp.path()).unwrap());
        trace.write(&mut w).unwrap();
        w.flush().unwrap();
    }
    let back = Trace::read(BufReader::new(File::open(temp.path()).unwrap())).unwrap();
    assert_eq!(back.variant, Variant::MixedReference);

    let expect = reference::mixed_reference(
        true,
        Some("Multi-param JNI"),
        Some(&[10, -10, 1000][..]),
        Some(&[1, 2, 3, 4][..]),
        Some(&[false, true][..]),
    );
    assert_eq!(back.replay(), Checksum(expect));
    assert_eq!(Variant::MixedReference.checksum(&args).unwrap(), Checksum(expect));
}

#[test]
fn test_ffi_failure_leaves_out_untouched() {
    let mut out = 42i64;
    let longs = [1i64, 2];
    let code = unsafe {
        ffi::xcall_mixed_reference_checksum(
            1, ptr::null(), 0, ptr::null(), 0, longs.as_ptr(), -2, ptr::null(), 0, &mut out,
        )
    };
    assert_eq!(code, rc::BAD_LENGTH);
    assert_eq!(out, 42);
}

fn combo9_args() -> impl Strategy<Value = (i32, i32, i64, i64, f32, f32, f64, f64, bool)> {
    (
        any::<i32>(), any::<i32>(),
        any::<i64>(), any::<i64>(),
        any::<u32>().prop_map(f32::from_bits), any::<u32>().prop_map(f32::from_bits),
        any::<u64>().prop_map(f64::from_bits), any::<u64>().prop_map(f64::from_bits),
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn prop_deterministic((a1, a2, l1, l2, f1, f2, d1, d2, flag) in combo9_args()) {
        let first = variants::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag);
        let second = variants::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_matches_caller_reference((a1, a2, l1, l2, f1, f2, d1, d2, flag) in combo9_args()) {
        let ours = variants::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag);
        let theirs = reference::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag);
        prop_assert_eq!(ours.value(), theirs);
    }

    #[test]
    fn prop_ffi_agrees_with_typed(a in any::<i32>(), b in any::<i64>(), c in any::<u64>()) {
        let c = f64::from_bits(c);
        let mut out = 0i64;
        let code = unsafe { ffi::xcall_combo_checksum3(a, b, c, &mut out) };
        prop_assert_eq!(code, rc::OK);
        prop_assert_eq!(Checksum::from_i64(out), variants::combo3(a, b, c));
    }

    #[test]
    fn prop_order_sensitive((a1, a2, l1, l2, f1, f2, d1, d2, flag) in combo9_args()) {
        prop_assume!(a1 != a2);
        let forward = variants::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag);
        let swapped = variants::combo9(a2, a1, l1, l2, f1, f2, d1, d2, flag);
        prop_assert_ne!(forward, swapped);
    }

    #[test]
    fn prop_long_slots_order_sensitive(
        longs in proptest::array::uniform5(any::<i64>()),
        j in 1usize..5,
        d1 in any::<f64>(),
    ) {
        prop_assume!(longs[0] != longs[j]);
        let mut swapped = longs;
        swapped.swap(0, j);
        let at = |l: [i64; 5]| variants::combo13(l[0], l[1], l[2], l[3], l[4], 1, 2, 3, 4, 5, 6, true, d1);
        prop_assert_ne!(at(longs), at(swapped));
    }

    #[test]
    fn prop_shared_scalars_stay_variant_specific(
        flag in any::<bool>(), b in any::<i8>(), s in any::<i16>(), i in any::<i32>(), l in any::<i64>(),
        f1 in any::<u32>().prop_map(f32::from_bits), d1 in any::<u64>().prop_map(f64::from_bits),
    ) {
        let c5 = variants::combo5(flag, b, s, i, l);
        let c7 = variants::combo7(f1, d1, l, i, s, b, flag);
        prop_assert_ne!(c5, c7);
    }

    #[test]
    fn prop_null_equals_empty(flag in any::<bool>(), ints in proptest::collection::vec(any::<i32>(), 0..8)) {
        let with_null = variants::mixed_reference(flag, None, Some(ints.as_slice()), None, None);
        let with_empty = variants::mixed_reference(flag, Some(&[][..]), Some(ints.as_slice()), Some(&[][..]), Some(&[][..]));
        prop_assert_eq!(with_null, with_empty);
    }

    #[test]
    fn prop_echo_identity(bits in any::<u64>(), text in ".{0,16}", longs in proptest::collection::vec(any::<i64>(), 0..8)) {
        prop_assert_eq!(echo::echo_double(f64::from_bits(bits)).to_bits(), bits);
        let units = utf16_units(&text);
        prop_assert_eq!(echo::echo_text(Some(units.as_slice())), Some(units.as_slice()));
        let back = echo::echo_long_array(Some(longs.as_slice()));
        prop_assert_eq!(back.map(|s| s.as_ptr()), Some(longs.as_ptr()));
        prop_assert_eq!(echo::echo_long_array(None), None);
    }

    #[test]
    fn prop_dynamic_agrees_with_typed(
        flag in any::<bool>(),
        text in proptest::option::of(".{0,12}"),
        ints in proptest::option::of(proptest::collection::vec(any::<i32>(), 0..6)),
    ) {
        let units = text.as_deref().map(utf16_units);
        let typed = variants::mixed_reference(flag, units.as_deref(), ints.as_deref(), None, None);
        let dynamic = Variant::MixedReference.checksum(&[
            Value::Bool(flag),
            Value::Text(text.clone().map(Utf16Text::from)),
            Value::IntArray(ints.clone()),
            Value::LongArray(None),
            Value::BoolArray(None),
        ]).unwrap();
        prop_assert_eq!(typed, dynamic);
    }
}
