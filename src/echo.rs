//! Echo operations: return the received value unchanged.
//!
//! The echo is the identity half of the boundary check; the checksum is the
//! integrity half.  Absent text and arrays come back absent, never as an empty
//! value.  Every echo logs what it received.

use tracing::info;

use crate::diag::{log_seq, Hex32, Nat, Natural, TextArg};
use crate::value::{Utf16Text, Value};

pub fn echo_bool(value: bool) -> bool {
    info!("echo_bool received={}", Nat(&value));
    value
}

pub fn echo_byte(value: i8) -> i8 {
    info!("echo_byte received={value}");
    value
}

pub fn echo_char(value: u16) -> u16 {
    info!("echo_char received={}", Nat(&value));
    value
}

pub fn echo_short(value: i16) -> i16 {
    info!("echo_short received={value}");
    value
}

pub fn echo_int(value: i32) -> i32 {
    info!("echo_int received={}", Hex32(value));
    value
}

pub fn echo_long(value: i64) -> i64 {
    info!("echo_long received={}", Nat(&value));
    value
}

pub fn echo_float(value: f32) -> f32 {
    info!("echo_float received={}", Nat(&value));
    value
}

pub fn echo_double(value: f64) -> f64 {
    info!("echo_double received={}", Nat(&value));
    value
}

/// UTF-16 text echo.
pub fn echo_text(value: Option<&[u16]>) -> Option<&[u16]> {
    info!("echo_text received={}", TextArg(value));
    value
}

/// Array echo for any element kind.  `op` tags the diagnostic lines.
pub fn echo_array<'a, T: Natural>(op: &str, value: Option<&'a [T]>) -> Option<&'a [T]> {
    log_seq(op, value);
    value
}

pub fn echo_byte_array(value: Option<&[i8]>) -> Option<&[i8]> {
    echo_array("echo_byte_array", value)
}

pub fn echo_int_array(value: Option<&[i32]>) -> Option<&[i32]> {
    echo_array("echo_int_array", value)
}

pub fn echo_long_array(value: Option<&[i64]>) -> Option<&[i64]> {
    echo_array("echo_long_array", value)
}

pub fn echo_bool_array(value: Option<&[bool]>) -> Option<&[bool]> {
    echo_array("echo_bool_array", value)
}

/// Echo a dynamic value through the matching typed echo.
pub fn echo_value(value: Value) -> Value {
    match value {
        Value::Bool(v)   => Value::Bool(echo_bool(v)),
        Value::Byte(v)   => Value::Byte(echo_byte(v)),
        Value::Char(v)   => Value::Char(echo_char(v)),
        Value::Short(v)  => Value::Short(echo_short(v)),
        Value::Int(v)    => Value::Int(echo_int(v)),
        Value::Long(v)   => Value::Long(echo_long(v)),
        Value::Float(v)  => Value::Float(echo_float(v)),
        Value::Double(v) => Value::Double(echo_double(v)),
        Value::Text(t) => {
            echo_text(t.as_ref().map(Utf16Text::units));
            Value::Text(t)
        }
        Value::BoolArray(a) => {
            echo_bool_array(a.as_deref());
            Value::BoolArray(a)
        }
        Value::ByteArray(a) => {
            echo_byte_array(a.as_deref());
            Value::ByteArray(a)
        }
        Value::CharArray(a) => {
            echo_array("echo_char_array", a.as_deref());
            Value::CharArray(a)
        }
        Value::ShortArray(a) => {
            echo_array("echo_short_array", a.as_deref());
            Value::ShortArray(a)
        }
        Value::IntArray(a) => {
            echo_int_array(a.as_deref());
            Value::IntArray(a)
        }
        Value::LongArray(a) => {
            echo_long_array(a.as_deref());
            Value::LongArray(a)
        }
        Value::FloatArray(a) => {
            echo_array("echo_float_array", a.as_deref());
            Value::FloatArray(a)
        }
        Value::DoubleArray(a) => {
            echo_array("echo_double_array", a.as_deref());
            Value::DoubleArray(a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_come_back_unchanged() {
        assert!(echo_bool(true));
        assert_eq!(echo_byte(0x7a), 0x7a);
        assert_eq!(echo_char(u16::from(b'@')), 0x40);
        assert_eq!(echo_short(-1234), -1234);
        assert_eq!(echo_int(0x1234_abcd), 0x1234_abcd);
        assert_eq!(echo_long(0x0102_0304_0506_0708), 0x0102_0304_0506_0708);
        assert_eq!(echo_float(-123.5).to_bits(), (-123.5f32).to_bits());
        assert_eq!(echo_double(std::f64::consts::PI), std::f64::consts::PI);
    }

    #[test]
    fn nan_payload_survives_echo() {
        let nan = f32::from_bits(0x7F80_0001);
        assert_eq!(echo_float(nan).to_bits(), 0x7F80_0001);
        let nan = f64::from_bits(0xFFF8_0000_0000_0042);
        assert_eq!(echo_double(nan).to_bits(), 0xFFF8_0000_0000_0042);
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(echo_text(None), None);
        assert_eq!(echo_int_array(None), None);
        assert_eq!(echo_value(Value::LongArray(None)), Value::LongArray(None));
        let empty: &[i8] = &[];
        assert_eq!(echo_byte_array(Some(empty)), Some(empty));
    }

    #[test]
    fn arrays_return_the_same_buffer() {
        let data = [1i64, -1, 0x00ff_00ff_00ff_00ff];
        let back = echo_long_array(Some(&data[..])).unwrap();
        assert_eq!(back.as_ptr(), data.as_ptr());
        assert_eq!(back, &data[..]);
    }

    #[test]
    fn dynamic_echo_is_bit_identical() {
        let v = Value::FloatArray(Some(vec![f32::from_bits(0x7FC0_0001), -0.0]));
        assert!(echo_value(v.clone()).bit_eq(&v));
        let t = Value::Text(Some("JNI round-trip check".into()));
        assert_eq!(echo_value(t.clone()), t);
    }
}
