//! JSON vector files: named argument lists with optional expected checksums.
//!
//! ```json
//! { "cases": [
//!     { "name": "combo3 basic", "variant": "combo3",
//!       "args": [ {"kind":"int","value":-1}, {"kind":"long","value":2},
//!                 {"kind":"double","value":1.0} ],
//!       "expect": "0x..." }
//! ] }
//! ```
//!
//! `expect` may be a `0x` hex string or a signed decimal, as a string or a
//! JSON integer.  A case with no `expect` only reports its checksum.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::checksum::{Checksum, Variant};
use crate::value::Value;

#[derive(Error, Debug)]
pub enum VectorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed vector file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorFile {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub name:    String,
    pub variant: String,
    pub args:    Vec<Value>,
    #[serde(default, deserialize_with = "expect_field", skip_serializing_if = "Option::is_none")]
    pub expect:  Option<Checksum>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpectRepr {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

fn expect_field<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Checksum>, D::Error> {
    let repr = Option::<ExpectRepr>::deserialize(de)?;
    match repr {
        None                          => Ok(None),
        Some(ExpectRepr::Signed(v))   => Ok(Some(Checksum::from_i64(v))),
        Some(ExpectRepr::Unsigned(v)) => Ok(Some(Checksum(v))),
        Some(ExpectRepr::Text(s))     => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Result of evaluating one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub name:   String,
    pub actual: Option<Checksum>,
    pub expect: Option<Checksum>,
    /// Slot or variant error text when the case could not be computed.
    pub error:  Option<String>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        match (self.actual, self.expect) {
            (Some(a), Some(e)) => a == e,
            (Some(_), None)    => true,
            (None, _)          => false,
        }
    }
}

impl VectorFile {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, VectorError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load(path: &Path) -> Result<Self, VectorError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn to_json(&self) -> Result<String, VectorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Evaluate every case.  A failing case never stops the rest.
    pub fn evaluate(&self) -> Vec<Outcome> {
        self.cases.iter().map(Case::evaluate).collect()
    }
}

impl Case {
    pub fn evaluate(&self) -> Outcome {
        let result = self
            .variant
            .parse::<Variant>()
            .and_then(|v| v.checksum(&self.args));
        let outcome = match result {
            Ok(sum) => Outcome { name: self.name.clone(), actual: Some(sum), expect: self.expect, error: None },
            Err(e)  => Outcome { name: self.name.clone(), actual: None, expect: self.expect, error: Some(e.to_string()) },
        };
        if outcome.passed() {
            info!("{}: ok", self.name);
        } else {
            warn!("{}: failed", self.name);
        }
        outcome
    }
}
