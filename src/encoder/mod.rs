//! Canonical encoder: every value kind → one or more 64-bit mixing units.
//!
//! # Rules
//! Every sub-64-bit kind is reinterpreted as unsigned at its own width and then
//! **zero-extended**.  Sign bits are never extended.
//!
//! | Kind    | Unit                                            |
//! |---------|-------------------------------------------------|
//! | bool    | `1` / `0`                                       |
//! | byte    | `v as u8` zero-extended                         |
//! | char    | code unit zero-extended                         |
//! | short   | `v as u16` zero-extended                        |
//! | int     | `v as u32` zero-extended                        |
//! | long    | `v as u64`                                      |
//! | float   | `to_bits()` zero-extended, NaN payload verbatim |
//! | double  | `to_bits()`                                     |
//!
//! Text and arrays emit their length first (UTF-16 code units for text), then
//! one unit per element.  An absent reference emits a single `0`.
//!
//! # Endianness
//! Units are abstract bit patterns.  Byte order only matters once units are
//! serialised, which is the trace module's concern.

use crate::value::{Primitive, Utf16Text, Value};

// ── Sink ─────────────────────────────────────────────────────────────────────

/// Receiver of mixing units, in order.
pub trait UnitSink {
    fn push_unit(&mut self, unit: u64);
}

impl UnitSink for Vec<u64> {
    fn push_unit(&mut self, unit: u64) {
        self.push(unit);
    }
}

// ── Scalars ──────────────────────────────────────────────────────────────────

/// A primitive with a single canonical unit.
pub trait Canonical: Copy {
    fn canonical(self) -> u64;
}

impl Canonical for bool {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self) }
}

impl Canonical for i8 {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self as u8) }
}

impl Canonical for u16 {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self) }
}

impl Canonical for i16 {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self as u16) }
}

impl Canonical for i32 {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self as u32) }
}

impl Canonical for i64 {
    #[inline]
    fn canonical(self) -> u64 { self as u64 }
}

impl Canonical for f32 {
    #[inline]
    fn canonical(self) -> u64 { u64::from(self.to_bits()) }
}

impl Canonical for f64 {
    #[inline]
    fn canonical(self) -> u64 { self.to_bits() }
}

impl Canonical for Primitive {
    fn canonical(self) -> u64 {
        match self {
            Primitive::Bool(v)   => v.canonical(),
            Primitive::Byte(v)   => v.canonical(),
            Primitive::Char(v)   => v.canonical(),
            Primitive::Short(v)  => v.canonical(),
            Primitive::Int(v)    => v.canonical(),
            Primitive::Long(v)   => v.canonical(),
            Primitive::Float(v)  => v.canonical(),
            Primitive::Double(v) => v.canonical(),
        }
    }
}

// ── References ───────────────────────────────────────────────────────────────

/// Anything that expands into a sequence of units.
pub trait Encode {
    fn encode<S: UnitSink + ?Sized>(&self, sink: &mut S);
}

impl<T: Canonical> Encode for T {
    #[inline]
    fn encode<S: UnitSink + ?Sized>(&self, sink: &mut S) {
        sink.push_unit(self.canonical());
    }
}

/// Emit a length-prefixed sequence; `None` emits only the zero length.
pub fn encode_seq<T: Canonical, S: UnitSink + ?Sized>(items: Option<&[T]>, sink: &mut S) {
    let items = items.unwrap_or(&[]);
    sink.push_unit(items.len() as u64);
    for item in items {
        sink.push_unit(item.canonical());
    }
}

/// Borrowed array or UTF-16 text slot.
#[derive(Debug, Clone, Copy)]
pub struct Seq<'a, T>(pub Option<&'a [T]>);

impl<T: Canonical> Encode for Seq<'_, T> {
    fn encode<S: UnitSink + ?Sized>(&self, sink: &mut S) {
        encode_seq(self.0, sink);
    }
}

impl Encode for Value {
    fn encode<S: UnitSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Value::Text(t)        => encode_seq(t.as_ref().map(Utf16Text::units), sink),
            Value::BoolArray(a)   => encode_seq(a.as_deref(), sink),
            Value::ByteArray(a)   => encode_seq(a.as_deref(), sink),
            Value::CharArray(a)   => encode_seq(a.as_deref(), sink),
            Value::ShortArray(a)  => encode_seq(a.as_deref(), sink),
            Value::IntArray(a)    => encode_seq(a.as_deref(), sink),
            Value::LongArray(a)   => encode_seq(a.as_deref(), sink),
            Value::FloatArray(a)  => encode_seq(a.as_deref(), sink),
            Value::DoubleArray(a) => encode_seq(a.as_deref(), sink),
            scalar => {
                if let Some(p) = scalar.as_primitive() {
                    sink.push_unit(p.canonical());
                }
            }
        }
    }
}

/// Collect the units of one value.
pub fn units_of<E: Encode + ?Sized>(value: &E) -> Vec<u64> {
    let mut out = Vec::new();
    value.encode(&mut out);
    out
}
