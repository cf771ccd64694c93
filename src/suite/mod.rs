//! Reference suite: the managed caller's checks, replayed through the C ABI.
//!
//! Every check computes its expectation with [`reference`] and compares it
//! with what the exported `xcall_*` symbol returns.  Sections mirror the
//! caller's run order: pointer probe, primitive round-trips, array
//! round-trips, text round-trip, multi-parameter checksums and combo-count
//! stress.
//!
//! A [`Report`] collects every check.  It serialises to JSON with a run id and
//! a UTC start timestamp.

use std::fmt;
use std::ptr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::checksum::Checksum;
use crate::ffi::{self, rc};

pub mod reference;

// ── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Pointer,
    Primitive,
    Array,
    Text,
    MultiParameter,
    ComboCount,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Pointer        => "Pointer checksum test",
            Section::Primitive      => "Primitive round-trip tests",
            Section::Array          => "Array round-trip tests",
            Section::Text           => "Reference (String) round-trip test",
            Section::MultiParameter => "Multi-parameter checksum tests",
            Section::ComboCount     => "Parameter-count stress tests",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub section:  Section,
    pub name:     String,
    pub expected: String,
    pub actual:   String,
    pub passed:   bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id:     Uuid,
    pub started_at: DateTime<Utc>,
    pub checks:     Vec<Check>,
}

impl Default for Report {
    fn default() -> Self { Self::new() }
}

impl Report {
    pub fn new() -> Self {
        Self { run_id: Uuid::new_v4(), started_at: Utc::now(), checks: Vec::new() }
    }

    pub fn record(&mut self, section: Section, name: &str, expected: String, actual: String, passed: bool) {
        if passed {
            info!("{name}: ok ({actual})");
        } else {
            warn!("{name} mismatch: expected {expected}, got {actual}");
        }
        self.checks.push(Check { section, name: name.to_owned(), expected, actual, passed });
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn failure_count(&self) -> usize { self.failures().count() }

    pub fn passed(&self) -> bool { self.failure_count() == 0 }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `All tests passed`, or the failure count and one ` - <name> mismatch` line each.
    pub fn summary(&self) -> String {
        if self.passed() {
            return "All tests passed".to_owned();
        }
        let mut out = format!("Total failures: {}", self.failure_count());
        for c in self.failures() {
            out.push_str(&format!("\n - {} mismatch", c.name));
        }
        out
    }
}

// ── Boundary helpers ─────────────────────────────────────────────────────────

/// Call a checksum symbol with a fresh out-slot.
fn native(call: impl FnOnce(*mut i64) -> i32) -> Result<Checksum, i32> {
    let mut out = 0i64;
    match call(&mut out) {
        rc::OK => Ok(Checksum::from_i64(out)),
        code   => Err(code),
    }
}

type EchoFn<T> = unsafe extern "C" fn(*const T, i32, *mut *const T) -> i32;

/// Send `data` through a reference echo and read back what it returned.
fn echo_through<T: Copy>(echo: EchoFn<T>, data: &[T]) -> Result<Vec<T>, i32> {
    let mut out: *const T = ptr::null();
    // Safety: `data` is a live slice and `out` a valid local slot.
    let code = unsafe { echo(data.as_ptr(), data.len() as i32, &mut out) };
    if code != rc::OK {
        return Err(code);
    }
    if out.is_null() {
        return Ok(Vec::new());
    }
    // Safety: the echo hands back the buffer it was given, `data.len()` long.
    Ok(unsafe { std::slice::from_raw_parts(out, data.len()) }.to_vec())
}

fn compare_sum(report: &mut Report, section: Section, name: &str, expect: u64, got: Result<Checksum, i32>) {
    let expect = Checksum(expect);
    match got {
        Ok(sum) => report.record(section, name, expect.to_string(), sum.to_string(), sum == expect),
        Err(code) => report.record(section, name, expect.to_string(), format!("rc={code}"), false),
    }
}

fn compare_echo<T: fmt::Debug + PartialEq>(report: &mut Report, section: Section, name: &str, sent: T, got: T) {
    let passed = sent == got;
    report.record(section, name, format!("{sent:?}"), format!("{got:?}"), passed);
}

// ── Sections ─────────────────────────────────────────────────────────────────

/// Run every section and return the collected report.
pub fn run() -> Report {
    let mut report = Report::new();
    info!(run_id = %report.run_id, "reference suite started");
    pointer_checksum(&mut report);
    primitive_round_trips(&mut report);
    array_round_trips(&mut report);
    text_round_trip(&mut report);
    multi_parameter(&mut report);
    combo_counts(&mut report);
    info!("{}", report.summary());
    report
}

fn pointer_checksum(report: &mut Report) {
    info!("=== {} ===", Section::Pointer);
    let ptr_value:  i64 = 0x1111_1111_2222_2222;
    let theme_ptr:  i64 = 0x3333_3333_4444_4444;
    let def_attr:   i32 = 123;
    let def_res_id: i32 = 456;
    let xml_ptr:    i64 = 0x5555_5555_6666_6666;
    let attrs:  [i32; 5] = [1, 2, 100, 0x7fff_ffff, -1];
    let out_vals:   i64 = 0x7777_7777_8888_8888;
    let out_idx:    i64 = 0x9999_9999_aaaa_bbbb_u64 as i64;

    let expect = reference::probe(
        ptr_value, theme_ptr, def_attr, def_res_id, xml_ptr, Some(&attrs[..]), out_vals, out_idx,
    );
    let got = native(|out| unsafe {
        ffi::xcall_probe(
            ptr_value, theme_ptr, def_attr, def_res_id, xml_ptr,
            attrs.as_ptr(), attrs.len() as i32, out_vals, out_idx, out,
        )
    });
    compare_sum(report, Section::Pointer, "argument checksum", expect, got);
}

fn primitive_round_trips(report: &mut Report) {
    let s = Section::Primitive;
    info!("=== {s} ===");

    compare_echo(report, s, "boolean", 1u8, ffi::xcall_echo_bool(1));
    compare_echo(report, s, "byte", 0x7ai8, ffi::xcall_echo_byte(0x7a));
    compare_echo(report, s, "char", 0x40u16, ffi::xcall_echo_char(0x40));
    compare_echo(report, s, "short", -1234i16, ffi::xcall_echo_short(-1234));
    compare_echo(report, s, "int", 0x1234_abcdi32, ffi::xcall_echo_int(0x1234_abcd));
    compare_echo(report, s, "long", 0x0102_0304_0506_0708i64, ffi::xcall_echo_long(0x0102_0304_0506_0708));

    // Floating echoes compare bit patterns.
    let f = -123.5f32;
    compare_echo(report, s, "float", f.to_bits(), ffi::xcall_echo_float(f).to_bits());
    let d = std::f64::consts::PI;
    compare_echo(report, s, "double", d.to_bits(), ffi::xcall_echo_double(d).to_bits());
}

fn array_round_trips(report: &mut Report) {
    let s = Section::Array;
    info!("=== {s} ===");

    let bytes: [i8; 4] = [1, 2, 3, -1];
    compare_echo(report, s, "byte[]", Ok(bytes.to_vec()), echo_through(ffi::xcall_echo_byte_array, &bytes));

    let ints: [i32; 4] = [-100, 0, 42, 0x7fff_ffff];
    compare_echo(report, s, "int[]", Ok(ints.to_vec()), echo_through(ffi::xcall_echo_int_array, &ints));

    let longs: [i64; 4] = [0, 1, -1, 0x00ff_00ff_00ff_00ff];
    compare_echo(report, s, "long[]", Ok(longs.to_vec()), echo_through(ffi::xcall_echo_long_array, &longs));

    let bools = [true, false, true];
    let raw: Vec<u8> = bools.iter().map(|b| u8::from(*b)).collect();
    let back = echo_through(ffi::xcall_echo_bool_array, &raw)
        .map(|v| v.into_iter().map(|b| b == 1).collect::<Vec<bool>>());
    compare_echo(report, s, "boolean[]", Ok(bools.to_vec()), back);
}

fn text_round_trip(report: &mut Report) {
    let s = Section::Text;
    info!("=== {s} ===");

    let text = "JNI round-trip check";
    let units: Vec<u16> = text.encode_utf16().collect();
    let back = echo_through(ffi::xcall_echo_text, &units)
        .map(|u| String::from_utf16_lossy(&u));
    compare_echo(report, s, "String", Ok(text.to_owned()), back);
}

fn multi_parameter(report: &mut Report) {
    let s = Section::MultiParameter;
    info!("=== {s} ===");

    let bool_value   = false;
    let byte_value   = 0xfe_u8 as i8;
    let char_value   = u16::from(b'Z');
    let short_value: i16 = 0x1337;
    let int_value:   i32 = -2024;
    let long_value   = 0xfedc_ba98_7654_3210_u64 as i64;
    let float_value  = 42.25f32;
    let double_value = -0.125f64;

    let expect = reference::multi_primitive(
        bool_value, byte_value, char_value, short_value,
        int_value, long_value, float_value, double_value,
    );
    let got = native(|out| unsafe {
        ffi::xcall_multi_primitive_checksum(
            u8::from(bool_value), byte_value, char_value, short_value,
            int_value, long_value, float_value, double_value, out,
        )
    });
    compare_sum(report, s, "multi primitive checksum", expect, got);

    let flag = true;
    let text = "Multi-param JNI";
    let ints:  [i32; 3]  = [10, -10, 1000];
    let longs: [i64; 4]  = [1, 2, 3, 4];
    let bools: [bool; 2] = [false, true];

    let expect = reference::mixed_reference(flag, Some(text), Some(&ints[..]), Some(&longs[..]), Some(&bools[..]));
    let units: Vec<u16> = text.encode_utf16().collect();
    let raw_bools: Vec<u8> = bools.iter().map(|b| u8::from(*b)).collect();
    let got = native(|out| unsafe {
        ffi::xcall_mixed_reference_checksum(
            u8::from(flag),
            units.as_ptr(), units.len() as i32,
            ints.as_ptr(), ints.len() as i32,
            longs.as_ptr(), longs.len() as i32,
            raw_bools.as_ptr(), raw_bools.len() as i32,
            out,
        )
    });
    compare_sum(report, s, "mixed reference checksum", expect, got);
}

fn combo_counts(report: &mut Report) {
    let s = Section::ComboCount;
    info!("=== {s} ===");

    let (a, b, c) = (0x1111_1111i32, 0x2222_2222_3333_3333i64, 1.5f64);
    let got = native(|out| unsafe { ffi::xcall_combo_checksum3(a, b, c, out) });
    compare_sum(report, s, "combo3 checksum", reference::combo3(a, b, c), got);

    let (flag, by, sh, i, l) = (true, 0xaa_u8 as i8, 0x7f7f_i16, -77i32, 0x4444_4444_5555_5555i64);
    let got = native(|out| unsafe { ffi::xcall_combo_checksum5(u8::from(flag), by, sh, i, l, out) });
    compare_sum(report, s, "combo5 checksum", reference::combo5(flag, by, sh, i, l), got);

    let (f1, d1, l1, i1, s1, b1, flag) =
        (0.25f32, -1234.75f64, 0x6666_6666_7777_7777i64, 314_159i32, -200i16, 0x7ci8, false);
    let got = native(|out| unsafe {
        ffi::xcall_combo_checksum7(f1, d1, l1, i1, s1, b1, u8::from(flag), out)
    });
    compare_sum(report, s, "combo7 checksum", reference::combo7(f1, d1, l1, i1, s1, b1, flag), got);

    let (a1, a2) = (10i32, -10i32);
    let (l1, l2) = (0x0101_0101_0101_0101i64, 0x0202_0202_0202_0202i64);
    let (f1, f2) = (5.5f32, -9.25f32);
    let (d1, d2) = (0.0001f64, -0.0002f64);
    let flag = true;
    let got = native(|out| unsafe {
        ffi::xcall_combo_checksum9(a1, a2, l1, l2, f1, f2, d1, d2, u8::from(flag), out)
    });
    compare_sum(
        report, s, "combo9 checksum",
        reference::combo9(a1, a2, l1, l2, f1, f2, d1, d2, flag), got,
    );

    let longs: [i64; 5] = [1, 2, 3, 4, 5];
    let ints:  [i32; 3] = [100, 200, 300];
    let shorts: [i16; 2] = [400, 500];
    let (b1, flag, d1) = (0x33i8, false, 123.456f64);
    let got = native(|out| unsafe {
        ffi::xcall_combo_checksum13(
            longs[0], longs[1], longs[2], longs[3], longs[4],
            ints[0], ints[1], ints[2],
            shorts[0], shorts[1],
            b1, u8::from(flag), d1, out,
        )
    });
    compare_sum(report, s, "combo13 checksum", reference::combo13(longs, ints, shorts, b1, flag, d1), got);

    let longs: [i64; 10] = [0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xA];
    let ints:  [i32; 5]  = [10, 11, 12, 13, 14];
    let shorts: [i16; 2] = [15, 16];
    let bytes:  [i8; 2]  = [17, 18];
    let flag = true;
    let got = native(|out| unsafe {
        ffi::xcall_combo_checksum20(
            longs[0], longs[1], longs[2], longs[3], longs[4],
            longs[5], longs[6], longs[7], longs[8], longs[9],
            ints[0], ints[1], ints[2], ints[3], ints[4],
            shorts[0], shorts[1],
            bytes[0], bytes[1],
            u8::from(flag), out,
        )
    });
    compare_sum(report, s, "combo20 checksum", reference::combo20(longs, ints, shorts, bytes, flag), got);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_suite_passes() {
        let report = run();
        assert!(report.passed(), "{}", report.summary());
        assert_eq!(report.summary(), "All tests passed");
        // 1 probe + 8 primitive + 4 array + 1 text + 2 multi + 6 combo
        assert_eq!(report.checks.len(), 22);
    }

    #[test]
    fn summary_lists_failures() {
        let mut report = Report::new();
        report.record(Section::Array, "int[]", "[1]".into(), "[2]".into(), false);
        report.record(Section::Array, "long[]", "[1]".into(), "[1]".into(), true);
        assert!(!report.passed());
        assert_eq!(report.summary(), "Total failures: 1\n - int[] mismatch");
    }

    #[test]
    fn report_serialises_with_run_id() {
        let mut report = Report::new();
        report.record(Section::ComboCount, "combo3 checksum", "0x1".into(), "0x1".into(), true);
        let json = report.to_json().unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, report.run_id);
        assert_eq!(back.checks, report.checks);
        assert!(json.contains("\"combo_count\""));
    }
}
