//! Diagnostic formatting: every received argument in its natural base.
//!
//! Output goes through `tracing` at `INFO`.  Nothing here touches a mixing
//! state, so diagnostics can never change a checksum.

use std::fmt;

use crate::value::{Utf16Text, Value};

/// Formatting of a received value for diagnostic lines.
pub trait Natural {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// `Display` adapter over [`Natural`].
pub struct Nat<'a, T: ?Sized>(pub &'a T);

impl<T: Natural + ?Sized> fmt::Display for Nat<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_natural(f)
    }
}

impl Natural for bool {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self { "true" } else { "false" })
    }
}

impl Natural for i8 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Natural for u16 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = char::from_u32(u32::from(*self))
            .filter(|c| !c.is_control())
            .unwrap_or('?');
        write!(f, "0x{:04x}('{}')", self, shown)
    }
}

impl Natural for i16 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Array elements and checksum arguments print ints in decimal; the echo
/// path uses [`Hex32`].
impl Natural for i32 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Natural for i64 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", *self as u64)
    }
}

impl Natural for f32 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", f64::from(*self))
    }
}

impl Natural for f64 {
    fn fmt_natural(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:.6}")
    }
}

/// An int shown as a 32-bit pattern.
pub struct Hex32(pub i32);

impl fmt::Display for Hex32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0 as u32)
    }
}

/// Optional text, `null` when absent.
pub struct TextArg<'a>(pub Option<&'a [u16]>);

impl fmt::Display for TextArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None        => f.write_str("null"),
            Some(units) => write!(f, "\"{}\"", String::from_utf16_lossy(units)),
        }
    }
}

/// Log a reference slot: `<tag> null`, or `<tag> len=N` then one line per element.
pub fn log_seq<T: Natural>(tag: &str, items: Option<&[T]>) {
    match items {
        None => tracing::info!("{tag} null"),
        Some(items) => {
            tracing::info!("{tag} len={}", items.len());
            for (i, v) in items.iter().enumerate() {
                tracing::info!("{tag}[{i}]={}", Nat(v));
            }
        }
    }
}

/// Format same-kind scalars as `[a,b,...]`.
pub fn list<T: Natural>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|v| Nat(v).to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Log one dynamic argument under `tag`.
pub fn log_value(tag: &str, value: &Value) {
    match value {
        Value::Bool(v)   => tracing::info!("{tag}={}", Nat(v)),
        Value::Byte(v)   => tracing::info!("{tag}={}", Nat(v)),
        Value::Char(v)   => tracing::info!("{tag}={}", Nat(v)),
        Value::Short(v)  => tracing::info!("{tag}={}", Nat(v)),
        Value::Int(v)    => tracing::info!("{tag}={}", Nat(v)),
        Value::Long(v)   => tracing::info!("{tag}={}", Nat(v)),
        Value::Float(v)  => tracing::info!("{tag}={}", Nat(v)),
        Value::Double(v) => tracing::info!("{tag}={}", Nat(v)),
        Value::Text(t)   => tracing::info!("{tag}={}", TextArg(t.as_ref().map(Utf16Text::units))),
        Value::BoolArray(a)   => log_seq(tag, a.as_deref()),
        Value::ByteArray(a)   => log_seq(tag, a.as_deref()),
        Value::CharArray(a)   => log_seq(tag, a.as_deref()),
        Value::ShortArray(a)  => log_seq(tag, a.as_deref()),
        Value::IntArray(a)    => log_seq(tag, a.as_deref()),
        Value::LongArray(a)   => log_seq(tag, a.as_deref()),
        Value::FloatArray(a)  => log_seq(tag, a.as_deref()),
        Value::DoubleArray(a) => log_seq(tag, a.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_bases() {
        assert_eq!(Nat(&true).to_string(), "true");
        assert_eq!(Nat(&-5i8).to_string(), "-5");
        assert_eq!(Nat(&0x41u16).to_string(), "0x0041('A')");
        assert_eq!(Nat(&-1i64).to_string(), "0xffffffffffffffff");
        assert_eq!(Nat(&1.5f32).to_string(), "1.500000");
        assert_eq!(Hex32(-1).to_string(), "0xffffffff");
        assert_eq!(list(&[1i32, -2]), "[1,-2]");
    }

    #[test]
    fn absent_text_prints_null() {
        assert_eq!(TextArg(None).to_string(), "null");
        let units: Vec<u16> = "hi".encode_utf16().collect();
        assert_eq!(TextArg(Some(&units)).to_string(), "\"hi\"");
    }
}
