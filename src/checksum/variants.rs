//! Fixed-order checksum variants.
//!
//! Each function mixes its slots in exactly the order listed; the order is the
//! wire contract with the caller.  Absent text and arrays still mix their zero
//! length.  Every function logs its received arguments first.
//!
//! Text slots take UTF-16 code units.  Use [`crate::value::utf16_units`] to
//! transcode a Rust string.

use tracing::info;

use super::{Accumulator, Checksum};
use crate::diag::{list, log_seq, Nat, TextArg};
use crate::encoder::{Encode, Seq, UnitSink};

/// Mix an ordered argument list into `sink`.
fn fold(sink: &mut dyn UnitSink, slots: &[&dyn EncodeDyn]) {
    for slot in slots {
        slot.encode_dyn(sink);
    }
}

/// Object-safe view of [`Encode`] for heterogeneous slot lists.
trait EncodeDyn {
    fn encode_dyn(&self, sink: &mut dyn UnitSink);
}

impl<E: Encode> EncodeDyn for E {
    fn encode_dyn(&self, sink: &mut dyn UnitSink) {
        self.encode(sink);
    }
}

fn run(slots: &[&dyn EncodeDyn]) -> Checksum {
    let mut acc = Accumulator::new();
    fold(&mut acc, slots);
    acc.finish()
}

// ── probe ────────────────────────────────────────────────────────────────────

/// Pointer-shaped probe: seven scalars and one `int[]`.
///
/// Parameters arrive in caller order; the attribute array is mixed **last**,
/// after `out_indices_ptr`.
///
/// `def_style_attr` and `def_style_resid` zero-extend like every other int
/// slot.  A callee that sign-extends them agrees only for non-negative values:
/// `def_style_attr = -1` gives `0x4cacd0f1e9f40002` here and
/// `0x7aa1a39ae9f40002` there.
#[allow(clippy::too_many_arguments)]
pub fn probe(
    ptr: i64,
    theme_ptr: i64,
    def_style_attr: i32,
    def_style_resid: i32,
    xml_parser_ptr: i64,
    java_attrs: Option<&[i32]>,
    out_values_ptr: i64,
    out_indices_ptr: i64,
) -> Checksum {
    info!(
        "ptr={}, theme_ptr={}, def_style_attr={}, def_style_resid={}, xml_parser_ptr={}, \
         out_values_ptr={}, out_indices_ptr={}",
        Nat(&ptr), Nat(&theme_ptr), def_style_attr, def_style_resid,
        Nat(&xml_parser_ptr), Nat(&out_values_ptr), Nat(&out_indices_ptr),
    );
    log_seq("java_attrs", java_attrs);
    let sum = run(&[
        &ptr, &theme_ptr, &def_style_attr, &def_style_resid, &xml_parser_ptr,
        &out_values_ptr, &out_indices_ptr, &Seq(java_attrs),
    ]);
    info!("checksum(native)={sum}");
    sum
}

// ── multi-primitive / mixed-reference ────────────────────────────────────────

/// One slot of every primitive kind.
#[allow(clippy::too_many_arguments)]
pub fn multi_primitive(
    bool_value: bool,
    byte_value: i8,
    char_value: u16,
    short_value: i16,
    int_value: i32,
    long_value: i64,
    float_value: f32,
    double_value: f64,
) -> Checksum {
    info!(
        "multi_primitive bool={} byte={} char={} short={} int={} long={} float={} double={}",
        Nat(&bool_value), byte_value, Nat(&char_value), short_value, int_value,
        Nat(&long_value), Nat(&float_value), Nat(&double_value),
    );
    run(&[
        &bool_value, &byte_value, &char_value, &short_value,
        &int_value, &long_value, &float_value, &double_value,
    ])
}

/// A flag, a text, and three arrays.
pub fn mixed_reference(
    flag: bool,
    text: Option<&[u16]>,
    ints: Option<&[i32]>,
    longs: Option<&[i64]>,
    bools: Option<&[bool]>,
) -> Checksum {
    info!("mixed_reference flag={}", Nat(&flag));
    info!("mixed_reference text={}", TextArg(text));
    log_seq("ints", ints);
    log_seq("longs", longs);
    log_seq("bools", bools);
    run(&[&flag, &Seq(text), &Seq(ints), &Seq(longs), &Seq(bools)])
}

// ── combo-N ──────────────────────────────────────────────────────────────────

pub fn combo3(a: i32, b: i64, c: f64) -> Checksum {
    info!("combo3 a=0x{:08x} b={} c={}", a as u32, Nat(&b), Nat(&c));
    run(&[&a, &b, &c])
}

pub fn combo5(flag: bool, b: i8, s: i16, i: i32, l: i64) -> Checksum {
    info!("combo5 flag={} byte={} short={} int={} long={}", Nat(&flag), b, s, i, Nat(&l));
    run(&[&flag, &b, &s, &i, &l])
}

pub fn combo7(f1: f32, d1: f64, l1: i64, i1: i32, s1: i16, b1: i8, flag: bool) -> Checksum {
    info!(
        "combo7 f1={} d1={} l1={} i1={} s1={} b1={} flag={}",
        Nat(&f1), Nat(&d1), Nat(&l1), i1, s1, b1, Nat(&flag),
    );
    run(&[&f1, &d1, &l1, &i1, &s1, &b1, &flag])
}

#[allow(clippy::too_many_arguments)]
pub fn combo9(
    a1: i32, a2: i32,
    l1: i64, l2: i64,
    f1: f32, f2: f32,
    d1: f64, d2: f64,
    flag: bool,
) -> Checksum {
    info!(
        "combo9 ints={} longs={} f={} d={} flag={}",
        list(&[a1, a2]), list(&[l1, l2]), list(&[f1, f2]), list(&[d1, d2]), Nat(&flag),
    );
    run(&[&a1, &a2, &l1, &l2, &f1, &f2, &d1, &d2, &flag])
}

#[allow(clippy::too_many_arguments)]
pub fn combo13(
    l1: i64, l2: i64, l3: i64, l4: i64, l5: i64,
    i1: i32, i2: i32, i3: i32,
    s1: i16, s2: i16,
    b1: i8,
    flag: bool,
    d1: f64,
) -> Checksum {
    info!(
        "combo13 longs={} ints={} shorts={} byte={} flag={} d={}",
        list(&[l1, l2, l3, l4, l5]), list(&[i1, i2, i3]), list(&[s1, s2]),
        b1, Nat(&flag), Nat(&d1),
    );
    run(&[&l1, &l2, &l3, &l4, &l5, &i1, &i2, &i3, &s1, &s2, &b1, &flag, &d1])
}

#[allow(clippy::too_many_arguments)]
pub fn combo20(
    p1: i64, p2: i64, p3: i64, p4: i64, p5: i64,
    p6: i64, p7: i64, p8: i64, p9: i64, p10: i64,
    i1: i32, i2: i32, i3: i32, i4: i32, i5: i32,
    s1: i16, s2: i16,
    b1: i8, b2: i8,
    flag: bool,
) -> Checksum {
    info!("combo20 longs={}", list(&[p1, p2, p3, p4, p5, p6, p7, p8, p9, p10]));
    info!(
        "combo20 ints={} shorts={} bytes={} flag={}",
        list(&[i1, i2, i3, i4, i5]), list(&[s1, s2]), list(&[b1, b2]), Nat(&flag),
    );
    run(&[
        &p1, &p2, &p3, &p4, &p5, &p6, &p7, &p8, &p9, &p10,
        &i1, &i2, &i3, &i4, &i5,
        &s1, &s2,
        &b1, &b2,
        &flag,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::fold_units;
    use crate::value::utf16_units;

    #[test]
    fn multi_primitive_reference_vector() {
        let got = multi_primitive(true, -1, u16::from(b'A'), -1, -1, -1, 1.0, 1.0);
        let expect = fold_units(&[
            1,
            0xff,
            0x41,
            0xffff,
            0xffff_ffff,
            u64::MAX,
            0x3F80_0000,
            0x3FF0_0000_0000_0000,
        ]);
        assert_eq!(got.value(), expect);
        assert_eq!(got.value(), 0xf979_aa69_41fe_0efb);
    }

    #[test]
    fn probe_mixes_array_after_out_pointers() {
        let attrs = [1, -1];
        let got = probe(10, 20, 30, 40, 50, Some(&attrs[..]), 60, 70);
        let expect = fold_units(&[10, 20, 30, 40, 50, 60, 70, 2, 1, 0xffff_ffff]);
        assert_eq!(got.value(), expect);
    }

    #[test]
    fn probe_int_slots_zero_extend() {
        let got = probe(0, 0, -1, i32::MIN, 0, None, 0, 0);
        assert_eq!(got.value(), fold_units(&[0, 0, 0xffff_ffff, 0x8000_0000, 0, 0, 0, 0]));
    }

    #[test]
    fn negative_style_attr_differs_from_sign_extended_fold() {
        let got = probe(0, 0, -1, 0, 0, None, 0, 0);
        assert_eq!(got, Checksum(0x4cac_d0f1_e9f4_0002));
        let sign_extended = fold_units(&[0, 0, u64::MAX, 0, 0, 0, 0, 0]);
        assert_eq!(sign_extended, 0x7aa1_a39a_e9f4_0002);
        assert_ne!(got.value(), sign_extended);
    }

    #[test]
    fn mixed_reference_null_and_empty_agree() {
        let a = mixed_reference(true, None, None, None, None);
        let b = mixed_reference(true, Some(&[][..]), Some(&[][..]), Some(&[][..]), Some(&[][..]));
        assert_eq!(a, b);
        assert_eq!(a.value(), fold_units(&[1, 0, 0, 0, 0]));
    }

    #[test]
    fn mixed_reference_layout() {
        let text = utf16_units("hé");
        let got = mixed_reference(false, Some(text.as_slice()), Some(&[-2][..]), Some(&[5][..]), Some(&[true, false][..]));
        let expect = fold_units(&[0, 2, 0x68, 0xe9, 1, 0xffff_fffe, 1, 5, 2, 1, 0]);
        assert_eq!(got.value(), expect);
    }

    #[test]
    fn combo_layouts() {
        assert_eq!(
            combo3(-1, 2, 1.0).value(),
            fold_units(&[0xffff_ffff, 2, 0x3FF0_0000_0000_0000])
        );
        assert_eq!(
            combo5(true, -1, -1, -1, -1).value(),
            fold_units(&[1, 0xff, 0xffff, 0xffff_ffff, u64::MAX])
        );
        assert_eq!(
            combo7(1.0, 1.0, 3, 4, 5, 6, false).value(),
            fold_units(&[0x3F80_0000, 0x3FF0_0000_0000_0000, 3, 4, 5, 6, 0])
        );
        let c20 = combo20(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, true);
        assert_eq!(c20.value(), fold_units(&(1u64..=20).map(|v| if v == 20 { 1 } else { v }).collect::<Vec<u64>>()));
    }
}
