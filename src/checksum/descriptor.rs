//! Variant descriptors and the descriptor-driven checksum path.
//!
//! A [`Variant`] names one checksum operation and carries its ordered slot
//! list.  [`Variant::checksum`] validates a dynamic argument list against that
//! list and then mixes it, which lets vector files and the CLI reach every
//! variant without a typed call site.

use thiserror::Error;

use super::{Accumulator, Checksum, Recorder};
use crate::diag::log_value;
use crate::encoder::{Encode, UnitSink};
use crate::value::{Kind, SlotKind, Value};

use Kind::{Bool, Byte, Char, Double, Float, Int, Long, Short};
use SlotKind::{Array as A, Scalar as S};

// ── Slot tables ──────────────────────────────────────────────────────────────

const PROBE: [SlotKind; 8] = [
    S(Long), S(Long), S(Int), S(Int), S(Long), A(Int), S(Long), S(Long),
];
/// `java_attrs` (index 5) is mixed after both out pointers.
const PROBE_MIX_ORDER: [usize; 8] = [0, 1, 2, 3, 4, 6, 7, 5];

const MULTI_PRIMITIVE: [SlotKind; 8] = [
    S(Bool), S(Byte), S(Char), S(Short), S(Int), S(Long), S(Float), S(Double),
];
const MIXED_REFERENCE: [SlotKind; 5] = [
    S(Bool), SlotKind::Text, A(Int), A(Long), A(Bool),
];
const COMBO3: [SlotKind; 3] = [S(Int), S(Long), S(Double)];
const COMBO5: [SlotKind; 5] = [S(Bool), S(Byte), S(Short), S(Int), S(Long)];
const COMBO7: [SlotKind; 7] = [
    S(Float), S(Double), S(Long), S(Int), S(Short), S(Byte), S(Bool),
];
const COMBO9: [SlotKind; 9] = [
    S(Int), S(Int), S(Long), S(Long), S(Float), S(Float), S(Double), S(Double), S(Bool),
];
const COMBO13: [SlotKind; 13] = [
    S(Long), S(Long), S(Long), S(Long), S(Long),
    S(Int), S(Int), S(Int),
    S(Short), S(Short),
    S(Byte),
    S(Bool),
    S(Double),
];
const COMBO20: [SlotKind; 20] = [
    S(Long), S(Long), S(Long), S(Long), S(Long),
    S(Long), S(Long), S(Long), S(Long), S(Long),
    S(Int), S(Int), S(Int), S(Int), S(Int),
    S(Short), S(Short),
    S(Byte), S(Byte),
    S(Bool),
];

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Unknown checksum variant '{0}'")]
    UnknownVariant(String),
    #[error("{variant}: expected {expected} arguments, got {got}")]
    Arity { variant: &'static str, expected: usize, got: usize },
    #[error("{variant}: slot {index} expects {expected}, got {got}")]
    Kind { variant: &'static str, index: usize, expected: SlotKind, got: SlotKind },
}

// ── Variant ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Probe,
    MultiPrimitive,
    MixedReference,
    Combo3,
    Combo5,
    Combo7,
    Combo9,
    Combo13,
    Combo20,
}

impl Variant {
    pub const ALL: [Variant; 9] = [
        Variant::Probe,
        Variant::MultiPrimitive,
        Variant::MixedReference,
        Variant::Combo3,
        Variant::Combo5,
        Variant::Combo7,
        Variant::Combo9,
        Variant::Combo13,
        Variant::Combo20,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Probe          => "probe",
            Variant::MultiPrimitive => "multi_primitive",
            Variant::MixedReference => "mixed_reference",
            Variant::Combo3         => "combo3",
            Variant::Combo5         => "combo5",
            Variant::Combo7         => "combo7",
            Variant::Combo9         => "combo9",
            Variant::Combo13        => "combo13",
            Variant::Combo20        => "combo20",
        }
    }

    /// Accepts `combo3`, `combo-3`, `multi-primitive` and so on.
    pub fn from_name(s: &str) -> Option<Self> {
        let norm: String = s.trim().to_lowercase().replace('-', "_");
        let norm = match norm.strip_prefix("combo_") {
            Some(n) => format!("combo{n}"),
            None    => norm,
        };
        Variant::ALL.into_iter().find(|v| v.name() == norm)
    }

    /// Ordered parameter slots.
    pub fn slots(self) -> &'static [SlotKind] {
        match self {
            Variant::Probe          => &PROBE,
            Variant::MultiPrimitive => &MULTI_PRIMITIVE,
            Variant::MixedReference => &MIXED_REFERENCE,
            Variant::Combo3         => &COMBO3,
            Variant::Combo5         => &COMBO5,
            Variant::Combo7         => &COMBO7,
            Variant::Combo9         => &COMBO9,
            Variant::Combo13        => &COMBO13,
            Variant::Combo20        => &COMBO20,
        }
    }

    /// Parameter indices in mixing order.
    pub fn mix_order(self) -> Vec<usize> {
        match self {
            Variant::Probe => PROBE_MIX_ORDER.to_vec(),
            other          => (0..other.slots().len()).collect(),
        }
    }

    /// Validate arity and slot kinds.
    pub fn check(self, args: &[Value]) -> Result<(), SlotError> {
        let slots = self.slots();
        if args.len() != slots.len() {
            return Err(SlotError::Arity {
                variant:  self.name(),
                expected: slots.len(),
                got:      args.len(),
            });
        }
        for (index, (slot, arg)) in slots.iter().zip(args).enumerate() {
            let got = arg.slot_kind();
            if got != *slot {
                return Err(SlotError::Kind {
                    variant: self.name(),
                    index,
                    expected: *slot,
                    got,
                });
            }
        }
        Ok(())
    }

    /// Validate, then push every unit into `sink` in mixing order.
    pub fn encode_into<K: UnitSink + ?Sized>(self, args: &[Value], sink: &mut K) -> Result<(), SlotError> {
        self.check(args)?;
        for (i, arg) in args.iter().enumerate() {
            log_value(&format!("{} slot[{i}]", self.name()), arg);
        }
        for i in self.mix_order() {
            args[i].encode(sink);
        }
        Ok(())
    }

    pub fn checksum(self, args: &[Value]) -> Result<Checksum, SlotError> {
        let mut acc = Accumulator::new();
        self.encode_into(args, &mut acc)?;
        Ok(acc.finish())
    }

    /// Checksum plus the recorded unit sequence.
    pub fn record(self, args: &[Value]) -> Result<Recorder, SlotError> {
        let mut rec = Recorder::default();
        self.encode_into(args, &mut rec)?;
        Ok(rec)
    }
}

impl std::str::FromStr for Variant {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::from_name(s).ok_or_else(|| SlotError::UnknownVariant(s.to_owned()))
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma-separated slot list, e.g. `int, long, double`.
pub fn signature(variant: Variant) -> String {
    variant
        .slots()
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
