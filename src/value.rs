//! Value model shared by the encoder, the variants and every outer surface.
//!
//! Scalars are plain Rust primitives at the typed API.  [`Value`] is the owned,
//! serialisable form used wherever arguments arrive as data (vector files, the
//! CLI, the descriptor-driven [`crate::checksum::Variant::checksum`] path).
//!
//! # Absent references
//! Text and array slots are `Option`s.  `None` is the foreign caller's null.
//! It encodes exactly like a present empty value but stays distinguishable in
//! diagnostics.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

// ── Kinds ────────────────────────────────────────────────────────────────────

/// Primitive kind.  Each kind has an exact, fixed bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool,
    Byte,
    /// UTF-16 code unit (unsigned 16-bit).
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Bool, Kind::Byte, Kind::Char, Kind::Short,
        Kind::Int,  Kind::Long, Kind::Float, Kind::Double,
    ];

    /// Width of the kind's bit pattern before zero-extension.
    pub fn bit_width(self) -> u32 {
        match self {
            Kind::Bool   => 1,
            Kind::Byte   => 8,
            Kind::Char   => 16,
            Kind::Short  => 16,
            Kind::Int    => 32,
            Kind::Long   => 64,
            Kind::Float  => 32,
            Kind::Double => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool   => "bool",
            Kind::Byte   => "byte",
            Kind::Char   => "char",
            Kind::Short  => "short",
            Kind::Int    => "int",
            Kind::Long   => "long",
            Kind::Float  => "float",
            Kind::Double => "double",
        }
    }
}

/// Kind of one slot in a variant descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Scalar(Kind),
    Text,
    Array(Kind),
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Scalar(k) => f.write_str(k.name()),
            SlotKind::Text      => f.write_str("text"),
            SlotKind::Array(k)  => write!(f, "{}[]", k.name()),
        }
    }
}

// ── Primitive ────────────────────────────────────────────────────────────────

/// Tagged union over every primitive kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Primitive {
    pub fn kind(&self) -> Kind {
        match self {
            Primitive::Bool(_)   => Kind::Bool,
            Primitive::Byte(_)   => Kind::Byte,
            Primitive::Char(_)   => Kind::Char,
            Primitive::Short(_)  => Kind::Short,
            Primitive::Int(_)    => Kind::Int,
            Primitive::Long(_)   => Kind::Long,
            Primitive::Float(_)  => Kind::Float,
            Primitive::Double(_) => Kind::Double,
        }
    }

    /// Bitwise identity.  Unlike `==`, a NaN is identical to itself and
    /// `0.0` is not identical to `-0.0`.
    pub fn bit_eq(&self, other: &Primitive) -> bool {
        match (self, other) {
            (Primitive::Float(a),  Primitive::Float(b))  => a.to_bits() == b.to_bits(),
            (Primitive::Double(a), Primitive::Double(b)) => a.to_bits() == b.to_bits(),
            (a, b) => a == b,
        }
    }
}

// ── Owned dynamic value ──────────────────────────────────────────────────────

/// Owned argument value.
///
/// JSON form is `{"kind": "<kind>", "value": ...}`; absent text and arrays are
/// `null`.  Floats that JSON cannot carry as numbers (NaN, infinities) are
/// written as their bit pattern, e.g. `"0x7fc00000"`; see [`Utf16Text`] for
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    #[serde(with = "float_bits")]
    Float(f32),
    #[serde(with = "float_bits")]
    Double(f64),
    Text(Option<Utf16Text>),
    BoolArray(Option<Vec<bool>>),
    ByteArray(Option<Vec<i8>>),
    CharArray(Option<Vec<u16>>),
    ShortArray(Option<Vec<i16>>),
    IntArray(Option<Vec<i32>>),
    LongArray(Option<Vec<i64>>),
    #[serde(with = "float_bits_seq")]
    FloatArray(Option<Vec<f32>>),
    #[serde(with = "float_bits_seq")]
    DoubleArray(Option<Vec<f64>>),
}

impl Value {
    pub fn slot_kind(&self) -> SlotKind {
        match self {
            Value::Bool(_)        => SlotKind::Scalar(Kind::Bool),
            Value::Byte(_)        => SlotKind::Scalar(Kind::Byte),
            Value::Char(_)        => SlotKind::Scalar(Kind::Char),
            Value::Short(_)       => SlotKind::Scalar(Kind::Short),
            Value::Int(_)         => SlotKind::Scalar(Kind::Int),
            Value::Long(_)        => SlotKind::Scalar(Kind::Long),
            Value::Float(_)       => SlotKind::Scalar(Kind::Float),
            Value::Double(_)      => SlotKind::Scalar(Kind::Double),
            Value::Text(_)        => SlotKind::Text,
            Value::BoolArray(_)   => SlotKind::Array(Kind::Bool),
            Value::ByteArray(_)   => SlotKind::Array(Kind::Byte),
            Value::CharArray(_)   => SlotKind::Array(Kind::Char),
            Value::ShortArray(_)  => SlotKind::Array(Kind::Short),
            Value::IntArray(_)    => SlotKind::Array(Kind::Int),
            Value::LongArray(_)   => SlotKind::Array(Kind::Long),
            Value::FloatArray(_)  => SlotKind::Array(Kind::Float),
            Value::DoubleArray(_) => SlotKind::Array(Kind::Double),
        }
    }

    /// The scalar carried by this value, if it is one.
    pub fn as_primitive(&self) -> Option<Primitive> {
        Some(match *self {
            Value::Bool(v)   => Primitive::Bool(v),
            Value::Byte(v)   => Primitive::Byte(v),
            Value::Char(v)   => Primitive::Char(v),
            Value::Short(v)  => Primitive::Short(v),
            Value::Int(v)    => Primitive::Int(v),
            Value::Long(v)   => Primitive::Long(v),
            Value::Float(v)  => Primitive::Float(v),
            Value::Double(v) => Primitive::Double(v),
            _ => return None,
        })
    }

    /// `true` for a text or array slot holding the foreign null.
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Value::Text(None)
                | Value::BoolArray(None)
                | Value::ByteArray(None)
                | Value::CharArray(None)
                | Value::ShortArray(None)
                | Value::IntArray(None)
                | Value::LongArray(None)
                | Value::FloatArray(None)
                | Value::DoubleArray(None)
        )
    }

    /// Bitwise identity, element by element for arrays.
    pub fn bit_eq(&self, other: &Value) -> bool {
        fn floats_eq(a: &Option<Vec<f32>>, b: &Option<Vec<f32>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
                }
                (None, None) => true,
                _ => false,
            }
        }
        fn doubles_eq(a: &Option<Vec<f64>>, b: &Option<Vec<f64>>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
                }
                (None, None) => true,
                _ => false,
            }
        }
        match (self, other) {
            (Value::FloatArray(a),  Value::FloatArray(b))  => floats_eq(a, b),
            (Value::DoubleArray(a), Value::DoubleArray(b)) => doubles_eq(a, b),
            _ => match (self.as_primitive(), other.as_primitive()) {
                (Some(a), Some(b)) => a.bit_eq(&b),
                _ => self == other,
            },
        }
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Bool(v)   => Value::Bool(v),
            Primitive::Byte(v)   => Value::Byte(v),
            Primitive::Char(v)   => Value::Char(v),
            Primitive::Short(v)  => Value::Short(v),
            Primitive::Int(v)    => Value::Int(v),
            Primitive::Long(v)   => Value::Long(v),
            Primitive::Float(v)  => Value::Float(v),
            Primitive::Double(v) => Value::Double(v),
        }
    }
}

/// Transcode a Rust string into the UTF-16 code units the checksum mixes.
pub fn utf16_units(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

// ── Text ─────────────────────────────────────────────────────────────────────

/// UTF-16 text exactly as a managed caller holds it, unpaired surrogates
/// included.
///
/// JSON form is a string when the units are well-formed UTF-16 and an array
/// of code units otherwise.  Both forms are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Utf16Text(Vec<u16>);

impl Utf16Text {
    pub fn from_units(units: Vec<u16>) -> Self { Self(units) }

    pub fn units(&self) -> &[u16] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn to_string_lossy(&self) -> String { String::from_utf16_lossy(&self.0) }
}

impl From<&str> for Utf16Text {
    fn from(s: &str) -> Self { Self(utf16_units(s)) }
}

impl From<String> for Utf16Text {
    fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl Serialize for Utf16Text {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match String::from_utf16(&self.0) {
            Ok(text) => s.serialize_str(&text),
            Err(_)   => self.0.serialize(s),
        }
    }
}

impl<'de> Deserialize<'de> for Utf16Text {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = Utf16Text;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or an array of UTF-16 code units")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Utf16Text, E> {
                Ok(Utf16Text::from(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Utf16Text, A::Error> {
                let mut units = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(u) = seq.next_element::<u16>()? {
                    units.push(u);
                }
                Ok(Utf16Text(units))
            }
        }

        d.deserialize_any(TextVisitor)
    }
}

// ── Float bit patterns ───────────────────────────────────────────────────────

/// `f32` / `f64` seen as a raw bit pattern of fixed width.
pub trait RawFloat: Copy {
    /// Hex digits in the written bit pattern.
    const HEX_DIGITS: usize;

    fn raw_bits(self) -> u64;
    /// `None` when `bits` does not fit the width.
    fn from_raw_bits(bits: u64) -> Option<Self>;
    fn from_f64(v: f64) -> Self;
    fn finite(self) -> bool;
    fn serialize_number<S: Serializer>(self, s: S) -> Result<S::Ok, S::Error>;
}

impl RawFloat for f32 {
    const HEX_DIGITS: usize = 8;

    fn raw_bits(self) -> u64 { u64::from(self.to_bits()) }
    fn from_raw_bits(bits: u64) -> Option<Self> { u32::try_from(bits).ok().map(f32::from_bits) }
    fn from_f64(v: f64) -> Self { v as f32 }
    fn finite(self) -> bool { self.is_finite() }
    fn serialize_number<S: Serializer>(self, s: S) -> Result<S::Ok, S::Error> { s.serialize_f32(self) }
}

impl RawFloat for f64 {
    const HEX_DIGITS: usize = 16;

    fn raw_bits(self) -> u64 { self.to_bits() }
    fn from_raw_bits(bits: u64) -> Option<Self> { Some(f64::from_bits(bits)) }
    fn from_f64(v: f64) -> Self { v }
    fn finite(self) -> bool { self.is_finite() }
    fn serialize_number<S: Serializer>(self, s: S) -> Result<S::Ok, S::Error> { s.serialize_f64(self) }
}

/// Parse a `0x`-prefixed bit pattern of at most `T::HEX_DIGITS` digits.
pub fn parse_float_bits<T: RawFloat>(s: &str) -> Result<T, String> {
    let t = s.trim();
    let hex = t
        .strip_prefix("0x")
        .or_else(|| t.strip_prefix("0X"))
        .ok_or_else(|| format!("expected a number or a 0x bit pattern, got '{s}'"))?;
    let bits = u64::from_str_radix(hex, 16).map_err(|e| format!("invalid bit pattern '{s}': {e}"))?;
    T::from_raw_bits(bits)
        .ok_or_else(|| format!("bit pattern '{s}' is wider than {} hex digits", T::HEX_DIGITS))
}

/// A number when finite, the bit pattern string otherwise.
struct FloatRepr<T>(T);

impl<T: RawFloat> Serialize for FloatRepr<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if self.0.finite() {
            self.0.serialize_number(s)
        } else {
            s.serialize_str(&format!("0x{:0width$x}", self.0.raw_bits(), width = T::HEX_DIGITS))
        }
    }
}

impl<'de, T: RawFloat> Deserialize<'de> for FloatRepr<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct FloatVisitor<T>(PhantomData<T>);

        impl<'de, T: RawFloat> Visitor<'de> for FloatVisitor<T> {
            type Value = T;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a 0x-prefixed bit pattern")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> { Ok(T::from_f64(v)) }
            fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> { Ok(T::from_f64(v as f64)) }
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> { Ok(T::from_f64(v as f64)) }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
                parse_float_bits(v).map_err(E::custom)
            }
        }

        d.deserialize_any(FloatVisitor(PhantomData)).map(FloatRepr)
    }
}

mod float_bits {
    use super::{FloatRepr, RawFloat};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: RawFloat, S: Serializer>(v: &T, s: S) -> Result<S::Ok, S::Error> {
        FloatRepr(*v).serialize(s)
    }

    pub fn deserialize<'de, T: RawFloat, D: Deserializer<'de>>(d: D) -> Result<T, D::Error> {
        FloatRepr::<T>::deserialize(d).map(|r| r.0)
    }
}

mod float_bits_seq {
    use super::{FloatRepr, RawFloat};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: RawFloat, S: Serializer>(v: &Option<Vec<T>>, s: S) -> Result<S::Ok, S::Error> {
        v.as_ref()
            .map(|items| items.iter().map(|x| FloatRepr(*x)).collect::<Vec<_>>())
            .serialize(s)
    }

    pub fn deserialize<'de, T: RawFloat, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<T>>, D::Error> {
        let items = Option::<Vec<FloatRepr<T>>>::deserialize(d)?;
        Ok(items.map(|v| v.into_iter().map(|r| r.0).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_json_shape() {
        let v = Value::IntArray(Some(vec![1, -2]));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"kind":"int_array","value":[1,-2]}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        let absent: Value = serde_json::from_str(r#"{"kind":"text","value":null}"#).unwrap();
        assert_eq!(absent, Value::Text(None));
        assert!(absent.is_absent());
    }

    #[test]
    fn bit_eq_distinguishes_signed_zero_and_matches_nan() {
        let nan = f32::from_bits(0x7FC0_0001);
        assert!(Primitive::Float(nan).bit_eq(&Primitive::Float(nan)));
        assert!(!Primitive::Double(0.0).bit_eq(&Primitive::Double(-0.0)));
        assert!(Value::FloatArray(Some(vec![nan])).bit_eq(&Value::FloatArray(Some(vec![nan]))));
        assert!(!Value::IntArray(None).bit_eq(&Value::IntArray(Some(vec![]))));
    }

    #[test]
    fn non_finite_floats_round_trip_as_bits() {
        let v = Value::Float(f32::from_bits(0x7FC0_0000));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"kind":"float","value":"0x7fc00000"}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert!(back.bit_eq(&v));

        let v = Value::DoubleArray(Some(vec![1.5, f64::from_bits(0xFFF8_0000_0000_0042), f64::INFINITY]));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"double_array","value":[1.5,"0xfff8000000000042","0x7ff0000000000000"]}"#
        );
        let back: Value = serde_json::from_str(&json).unwrap();
        assert!(back.bit_eq(&v));
    }

    #[test]
    fn float_accepts_number_or_bits() {
        let a: Value = serde_json::from_str(r#"{"kind":"float","value":1}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"kind":"float","value":"0x3f800000"}"#).unwrap();
        assert!(a.bit_eq(&b));
        assert!(serde_json::from_str::<Value>(r#"{"kind":"float","value":"0x1ffffffff"}"#).is_err());
        assert!(serde_json::from_str::<Value>(r#"{"kind":"double","value":"nan"}"#).is_err());
    }

    #[test]
    fn lone_surrogate_text_serialises_as_units() {
        let v = Value::Text(Some(Utf16Text::from_units(vec![0x61, 0xD800])));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"kind":"text","value":[97,55296]}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        let plain: Value = serde_json::from_str(r#"{"kind":"text","value":"hé"}"#).unwrap();
        assert_eq!(plain, Value::Text(Some(Utf16Text::from_units(vec![0x68, 0xe9]))));
    }

    #[test]
    fn utf16_counts_code_units_not_code_points() {
        // U+1F600 is one code point, two UTF-16 code units, four UTF-8 bytes.
        assert_eq!(utf16_units("\u{1F600}").len(), 2);
        assert_eq!(utf16_units("é").len(), 1);
    }
}
