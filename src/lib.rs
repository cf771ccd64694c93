pub mod value;
pub mod encoder;
pub mod checksum;
pub mod diag;
pub mod echo;
pub mod ffi;
pub mod suite;
pub mod vectors;
pub mod trace;

pub use value::{Kind, Primitive, SlotKind, Utf16Text, Value};
pub use encoder::{Canonical, Encode, UnitSink};
pub use checksum::{Accumulator, Checksum, SlotError, Variant};
pub use ffi::BoundaryError;
pub use vectors::{VectorError, VectorFile};
pub use trace::{Trace, TraceError};
