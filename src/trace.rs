//! Binary unit traces.
//!
//! A trace records the exact unit sequence one checksum call mixed, so a
//! mismatch can be diffed unit by unit against the other side.
//!
//! Layout (all little-endian):
//! ```text
//! magic    [u8; 4]  "XCUT"
//! version  u32
//! name_len u16      variant name, UTF-8
//! name     [u8; name_len]
//! count    u64
//! units    [u64; count]
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use thiserror::Error;

use crate::checksum::{fold_units, Checksum, SlotError, Variant};
use crate::value::Value;

pub const MAGIC: &[u8; 4] = b"XCUT";
pub const VERSION: u32 = 1;

/// Upper bound on the up-front allocation while reading units.
const PREALLOC_LIMIT: u64 = 1 << 16;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Invalid magic number")]
    InvalidMagic,
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u32),
    #[error("Variant name is not UTF-8")]
    BadName(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub variant: Variant,
    pub units:   Vec<u64>,
}

impl Trace {
    /// Run `variant` over `args` and keep every unit it mixed.
    pub fn record(variant: Variant, args: &[Value]) -> Result<Self, TraceError> {
        let rec = variant.record(args)?;
        Ok(Self { variant, units: rec.units })
    }

    /// Refold the recorded units from the offset basis.
    pub fn replay(&self) -> Checksum {
        Checksum(fold_units(&self.units))
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(VERSION)?;
        write_name(&mut writer, self.variant.name())?;
        writer.write_u64::<LittleEndian>(self.units.len() as u64)?;
        for unit in &self.units {
            writer.write_u64::<LittleEndian>(*unit)?;
        }
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> Result<Self, TraceError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(TraceError::InvalidMagic);
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != VERSION {
            return Err(TraceError::UnsupportedVersion(version));
        }

        let name_len = reader.read_u16::<LittleEndian>()? as usize;
        let mut name = vec![0u8; name_len];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name)?;
        let variant: Variant = name.parse()?;

        let count = reader.read_u64::<LittleEndian>()?;
        let mut units = Vec::with_capacity(count.min(PREALLOC_LIMIT) as usize);
        for _ in 0..count {
            units.push(reader.read_u64::<LittleEndian>()?);
        }
        Ok(Self { variant, units })
    }
}

/// Length-prefixed name; a name longer than `u16::MAX` bytes is refused.
fn write_name<W: Write>(writer: &mut W, name: &str) -> io::Result<()> {
    let len = u16::try_from(name.len()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("variant name is {} bytes, limit is {}", name.len(), u16::MAX))
    })?;
    writer.write_u16::<LittleEndian>(len)?;
    writer.write_all(name.as_bytes())
}
