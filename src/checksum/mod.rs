//! Checksum accumulator: FNV-1a folding over canonical units.
//!
//! ```
//! use xcall_check::checksum::{mix, Accumulator, FNV_OFFSET_BASIS};
//!
//! let mut acc = Accumulator::new();
//! acc.feed(&-1i32).feed(&true);
//! assert_eq!(acc.finish().value(), mix(mix(FNV_OFFSET_BASIS, 0xffff_ffff), 1));
//! ```
//!
//! Each computation owns its accumulator.  Nothing here is shared across
//! calls and nothing is global.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::encoder::{Encode, UnitSink};

pub mod descriptor;
pub mod variants;

pub use descriptor::{SlotError, Variant};

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fold one unit into the state.  Overflow wraps.
#[inline]
pub const fn mix(state: u64, unit: u64) -> u64 {
    (state ^ unit).wrapping_mul(FNV_PRIME)
}

/// Fold a whole unit sequence starting from the basis.
pub fn fold_units(units: &[u64]) -> u64 {
    units.iter().fold(FNV_OFFSET_BASIS, |h, &u| mix(h, u))
}

// ── Checksum ─────────────────────────────────────────────────────────────────

/// Final 64-bit fingerprint.  Crosses the boundary as `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Checksum(pub u64);

impl Checksum {
    #[inline]
    pub fn value(self) -> u64 { self.0 }

    /// Bit reinterpretation into the boundary return type.
    #[inline]
    pub fn as_i64(self) -> i64 { self.0 as i64 }

    #[inline]
    pub fn from_i64(v: i64) -> Self { Checksum(v as u64) }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// Parse `0x`-prefixed hex or a signed decimal (the `i64` a caller returns).
impl FromStr for Checksum {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let digits: String = hex.chars().filter(|c| *c != '_').collect();
            u64::from_str_radix(&digits, 16)
                .map(Checksum)
                .map_err(|e| format!("invalid hex checksum '{s}': {e}"))
        } else {
            s.parse::<i64>()
                .map(Checksum::from_i64)
                .map_err(|e| format!("invalid decimal checksum '{s}': {e}"))
        }
    }
}

impl From<Checksum> for String {
    fn from(c: Checksum) -> String { c.to_string() }
}

impl TryFrom<String> for Checksum {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

// ── Accumulator ──────────────────────────────────────────────────────────────

/// Running mixing state for one computation.
#[derive(Debug, Clone)]
pub struct Accumulator {
    state: u64,
    units: u64,
}

impl Default for Accumulator {
    fn default() -> Self { Self::new() }
}

impl Accumulator {
    pub fn new() -> Self {
        Self { state: FNV_OFFSET_BASIS, units: 0 }
    }

    #[inline]
    pub fn mix_unit(&mut self, unit: u64) {
        self.state = mix(self.state, unit);
        self.units += 1;
    }

    /// Encode `value` and mix every resulting unit, in order.
    pub fn feed<E: Encode + ?Sized>(&mut self, value: &E) -> &mut Self {
        value.encode(self);
        self
    }

    /// Number of units mixed so far.
    pub fn unit_count(&self) -> u64 { self.units }

    /// Current state.  Does not reset anything.
    pub fn finish(&self) -> Checksum {
        Checksum(self.state)
    }
}

impl UnitSink for Accumulator {
    #[inline]
    fn push_unit(&mut self, unit: u64) {
        self.mix_unit(unit);
    }
}

/// Feeds an accumulator and records every unit on the side.
#[derive(Debug, Default)]
pub struct Recorder {
    pub acc:   Accumulator,
    pub units: Vec<u64>,
}

impl UnitSink for Recorder {
    fn push_unit(&mut self, unit: u64) {
        tracing::debug!(index = self.units.len(), unit = format_args!("0x{unit:016x}"), "mix");
        self.acc.mix_unit(unit);
        self.units.push(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector_single_unit() {
        let mut acc = Accumulator::new();
        acc.mix_unit(1);
        assert_eq!(acc.finish().value(), 0xaf63_bc4c_8601_b62c);
        assert_eq!(
            acc.finish().value(),
            (FNV_OFFSET_BASIS ^ 1).wrapping_mul(FNV_PRIME)
        );
    }

    #[test]
    fn empty_fold_is_basis() {
        assert_eq!(Accumulator::new().finish().value(), FNV_OFFSET_BASIS);
        assert_eq!(fold_units(&[]), FNV_OFFSET_BASIS);
    }

    #[test]
    fn finish_does_not_reset() {
        let mut acc = Accumulator::new();
        acc.mix_unit(7);
        let first = acc.finish();
        assert_eq!(acc.finish(), first);
        acc.mix_unit(8);
        assert_eq!(acc.finish().value(), mix(first.value(), 8));
        assert_eq!(acc.unit_count(), 2);
    }

    #[test]
    fn quiet_nan_mixes_raw_bits() {
        let mut acc = Accumulator::new();
        acc.feed(&f32::from_bits(0x7FC0_0000));
        assert_eq!(acc.finish().value(), mix(FNV_OFFSET_BASIS, 0x7FC0_0000));
        assert_eq!(acc.finish().value(), 0x6f63_be18_0141_b7df);
    }

    #[test]
    fn checksum_parses_hex_and_signed_decimal() {
        let c: Checksum = "0xffffffffffffffff".parse().unwrap();
        assert_eq!(c, Checksum(u64::MAX));
        let d: Checksum = "-1".parse().unwrap();
        assert_eq!(d, c);
        assert_eq!(c.as_i64(), -1);
        assert_eq!(c.to_string(), "0xffffffffffffffff");
        assert!("0xzz".parse::<Checksum>().is_err());
    }

    #[test]
    fn recorder_matches_plain_fold() {
        let mut rec = Recorder::default();
        rec.push_unit(3);
        rec.push_unit(4);
        assert_eq!(rec.units, vec![3, 4]);
        assert_eq!(rec.acc.finish().value(), fold_units(&[3, 4]));
    }
}
