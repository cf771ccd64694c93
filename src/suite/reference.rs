//! Caller-side reference checksums.
//!
//! Written against the raw mixing rule with explicit masks, so it shares no
//! code with [`crate::encoder`].  Agreement between the two is the point of
//! the suite.

const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME:  u64 = 0x100_0000_01b3;

#[inline]
fn fnv_mix(h: u64, v: u64) -> u64 {
    (h ^ v).wrapping_mul(PRIME)
}

#[inline]
fn b(v: bool) -> u64 { if v { 1 } else { 0 } }
#[inline]
fn b8(v: i8) -> u64 { (v as u64) & 0xff }
#[inline]
fn b16(v: i16) -> u64 { (v as u64) & 0xffff }
#[inline]
fn b32(v: i32) -> u64 { (v as u64) & 0xffff_ffff }
#[inline]
fn f32b(v: f32) -> u64 { u64::from(v.to_bits()) }

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
) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, ptr as u64);
    h = fnv_mix(h, theme_ptr as u64);
    h = fnv_mix(h, b32(def_style_attr));
    h = fnv_mix(h, b32(def_style_resid));
    h = fnv_mix(h, xml_parser_ptr as u64);
    h = fnv_mix(h, out_values_ptr as u64);
    h = fnv_mix(h, out_indices_ptr as u64);
    let attrs = java_attrs.unwrap_or(&[]);
    h = fnv_mix(h, attrs.len() as u64);
    for v in attrs {
        h = fnv_mix(h, b32(*v));
    }
    h
}

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
) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, b(bool_value));
    h = fnv_mix(h, b8(byte_value));
    h = fnv_mix(h, u64::from(char_value));
    h = fnv_mix(h, b16(short_value));
    h = fnv_mix(h, b32(int_value));
    h = fnv_mix(h, long_value as u64);
    h = fnv_mix(h, f32b(float_value));
    h = fnv_mix(h, double_value.to_bits());
    h
}

pub fn mixed_reference(
    flag: bool,
    text: Option<&str>,
    ints: Option<&[i32]>,
    longs: Option<&[i64]>,
    bools: Option<&[bool]>,
) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, b(flag));

    let units: Vec<u16> = text.map(|t| t.encode_utf16().collect()).unwrap_or_default();
    h = fnv_mix(h, units.len() as u64);
    for u in &units {
        h = fnv_mix(h, u64::from(*u));
    }

    let ints = ints.unwrap_or(&[]);
    h = fnv_mix(h, ints.len() as u64);
    for v in ints {
        h = fnv_mix(h, b32(*v));
    }

    let longs = longs.unwrap_or(&[]);
    h = fnv_mix(h, longs.len() as u64);
    for v in longs {
        h = fnv_mix(h, *v as u64);
    }

    let bools = bools.unwrap_or(&[]);
    h = fnv_mix(h, bools.len() as u64);
    for v in bools {
        h = fnv_mix(h, b(*v));
    }
    h
}

pub fn combo3(a: i32, l: i64, c: f64) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, b32(a));
    h = fnv_mix(h, l as u64);
    h = fnv_mix(h, c.to_bits());
    h
}

pub fn combo5(flag: bool, by: i8, s: i16, i: i32, l: i64) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, b(flag));
    h = fnv_mix(h, b8(by));
    h = fnv_mix(h, b16(s));
    h = fnv_mix(h, b32(i));
    h = fnv_mix(h, l as u64);
    h
}

pub fn combo7(f1: f32, d1: f64, l1: i64, i1: i32, s1: i16, b1: i8, flag: bool) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, f32b(f1));
    h = fnv_mix(h, d1.to_bits());
    h = fnv_mix(h, l1 as u64);
    h = fnv_mix(h, b32(i1));
    h = fnv_mix(h, b16(s1));
    h = fnv_mix(h, b8(b1));
    h = fnv_mix(h, b(flag));
    h
}

#[allow(clippy::too_many_arguments)]
pub fn combo9(
    a1: i32, a2: i32,
    l1: i64, l2: i64,
    f1: f32, f2: f32,
    d1: f64, d2: f64,
    flag: bool,
) -> u64 {
    let mut h = OFFSET;
    h = fnv_mix(h, b32(a1));
    h = fnv_mix(h, b32(a2));
    h = fnv_mix(h, l1 as u64);
    h = fnv_mix(h, l2 as u64);
    h = fnv_mix(h, f32b(f1));
    h = fnv_mix(h, f32b(f2));
    h = fnv_mix(h, d1.to_bits());
    h = fnv_mix(h, d2.to_bits());
    h = fnv_mix(h, b(flag));
    h
}

/// `longs`, `ints`, `shorts` are the leading same-kind runs.
pub fn combo13(longs: [i64; 5], ints: [i32; 3], shorts: [i16; 2], b1: i8, flag: bool, d1: f64) -> u64 {
    let mut h = OFFSET;
    for l in longs {
        h = fnv_mix(h, l as u64);
    }
    for i in ints {
        h = fnv_mix(h, b32(i));
    }
    for s in shorts {
        h = fnv_mix(h, b16(s));
    }
    h = fnv_mix(h, b8(b1));
    h = fnv_mix(h, b(flag));
    h = fnv_mix(h, d1.to_bits());
    h
}

pub fn combo20(longs: [i64; 10], ints: [i32; 5], shorts: [i16; 2], bytes: [i8; 2], flag: bool) -> u64 {
    let mut h = OFFSET;
    for l in longs {
        h = fnv_mix(h, l as u64);
    }
    for i in ints {
        h = fnv_mix(h, b32(i));
    }
    for s in shorts {
        h = fnv_mix(h, b16(s));
    }
    for by in bytes {
        h = fnv_mix(h, b8(by));
    }
    h = fnv_mix(h, b(flag));
    h
}
