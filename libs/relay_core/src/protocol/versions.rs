use serde::{Deserialize, Serialize};

use crate::{
    primitives::errors::SchemaError,
    protocol::{schema::{HeaderSchema, HEADER_SCHEMA_V0_33}, CURRENT_SCHEMA_VERSION},
};

/// Header layouts whose hash tree this crate can reproduce.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Tendermint v0.33 headers, amino-encoded fields
    V0_33 = 1,
}

impl Default for SchemaVersion {
    fn default() -> Self {
        CURRENT_SCHEMA_VERSION
    }
}

impl SchemaVersion {
    pub fn from_u16(value: u16) -> Result<Self, SchemaError> {
        match value {
            1 => Ok(SchemaVersion::V0_33),
            _ => Err(SchemaError::UnknownVersion(value)),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            SchemaVersion::V0_33 => 1,
        }
    }

    /// The field layout and disclosure plan for this version.
    pub fn schema(&self) -> &'static HeaderSchema {
        match self {
            SchemaVersion::V0_33 => &HEADER_SCHEMA_V0_33,
        }
    }
}
