//! The versioned, ordered list of header fields and their disclosure.
//!
//! Leaf order and the public/opaque split are fixed per schema version. The
//! hash tree is built from `encode_fields` output in exactly this order.

use relay_crypto::{
    disclosure::{DisclosurePlan, Visibility},
    hashing::DefaultHash,
    merkle::{generate_tree, MerkleTree},
};
use serde::{Deserialize, Serialize};

use crate::{
    primitives::{
        errors::{HeaderError, SchemaError},
        header::{BlockId, Timestamp, Version},
        parts::PARTS_ARITY,
    },
    protocol::{encoding::CanonicalEncode, versions::SchemaVersion},
};

/// Type tag of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    UnsignedInteger,
    Bytes,
    Timestamp,
    Composite,
}

/// Header fields known to any schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderField {
    Version,
    ChainId,
    Height,
    Time,
    LastBlockId,
    LastCommitHash,
    DataHash,
    ValidatorsHash,
    NextValidatorsHash,
    ConsensusHash,
    AppHash,
    LastResultsHash,
    EvidenceHash,
    ProposerAddress,
}

impl HeaderField {
    pub const fn name(&self) -> &'static str {
        match self {
            HeaderField::Version => "Version",
            HeaderField::ChainId => "ChainID",
            HeaderField::Height => "Height",
            HeaderField::Time => "Time",
            HeaderField::LastBlockId => "LastBlockID",
            HeaderField::LastCommitHash => "LastCommitHash",
            HeaderField::DataHash => "DataHash",
            HeaderField::ValidatorsHash => "ValidatorsHash",
            HeaderField::NextValidatorsHash => "NextValidatorsHash",
            HeaderField::ConsensusHash => "ConsensusHash",
            HeaderField::AppHash => "AppHash",
            HeaderField::LastResultsHash => "LastResultsHash",
            HeaderField::EvidenceHash => "EvidenceHash",
            HeaderField::ProposerAddress => "ProposerAddress",
        }
    }
}

/// A decoded field value tagged with its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    /// Signed on the wire, must be non-negative to encode
    Integer(i64),
    Text(String),
    Bytes(Option<Vec<u8>>),
    Timestamp(Timestamp),
    Version(Version),
    BlockId(BlockId),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::UnsignedInteger,
            FieldValue::Text(_) | FieldValue::Bytes(_) => FieldKind::Bytes,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Version(_) | FieldValue::BlockId(_) => FieldKind::Composite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub field: HeaderField,
    pub kind: FieldKind,
    pub visibility: Visibility,
}

const fn opaque(field: HeaderField, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor { field, kind, visibility: Visibility::Opaque }
}

const fn public(field: HeaderField, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor { field, kind, visibility: Visibility::Public }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderSchema {
    pub version: SchemaVersion,
    pub fields: &'static [FieldDescriptor],
    pub parts_arity: usize,
}

pub static HEADER_SCHEMA_V0_33: HeaderSchema = HeaderSchema {
    version: SchemaVersion::V0_33,
    fields: &[
        opaque(HeaderField::Version, FieldKind::Composite),
        opaque(HeaderField::ChainId, FieldKind::Bytes),
        public(HeaderField::Height, FieldKind::UnsignedInteger),
        opaque(HeaderField::Time, FieldKind::Timestamp),
        opaque(HeaderField::LastBlockId, FieldKind::Composite),
        opaque(HeaderField::LastCommitHash, FieldKind::Bytes),
        opaque(HeaderField::DataHash, FieldKind::Bytes),
        opaque(HeaderField::ValidatorsHash, FieldKind::Bytes),
        opaque(HeaderField::NextValidatorsHash, FieldKind::Bytes),
        opaque(HeaderField::ConsensusHash, FieldKind::Bytes),
        public(HeaderField::AppHash, FieldKind::Bytes),
        opaque(HeaderField::LastResultsHash, FieldKind::Bytes),
        opaque(HeaderField::EvidenceHash, FieldKind::Bytes),
        opaque(HeaderField::ProposerAddress, FieldKind::Bytes),
    ],
    parts_arity: PARTS_ARITY,
};

impl HeaderSchema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position_of(&self, field: HeaderField) -> Option<usize> {
        self.fields.iter().position(|descriptor| descriptor.field == field)
    }

    pub fn disclosure_plan(&self) -> Result<DisclosurePlan, SchemaError> {
        Ok(DisclosurePlan::from_visibilities(
            self.fields.iter().map(|descriptor| descriptor.visibility),
        )?)
    }

    /// Check the schema independently of any header.
    ///
    /// Verifies that the fields are unique, fit a disclosure plan, and that
    /// the plan ships exactly `parts_arity` parts.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, descriptor) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|earlier| earlier.field == descriptor.field) {
                return Err(SchemaError::DuplicateField(descriptor.field.name()));
            }
        }
        let part_count = self.disclosure_plan()?.part_count();
        if part_count != self.parts_arity {
            return Err(SchemaError::PartsArity {
                expected: self.parts_arity,
                actual: part_count,
            });
        }
        Ok(())
    }

    /// Check that `value` may occupy `position`.
    pub fn check_value(&self, position: usize, value: &FieldValue) -> Result<(), SchemaError> {
        let descriptor = self.fields.get(position).ok_or(SchemaError::FieldCount {
            expected: self.fields.len(),
            actual: position + 1,
        })?;
        if descriptor.kind != value.kind() {
            return Err(SchemaError::KindMismatch {
                position,
                field: descriptor.field.name(),
                expected: descriptor.kind,
                actual: value.kind(),
            });
        }
        Ok(())
    }

    /// Canonically encode a full list of field values in schema order.
    pub fn encode_fields(&self, values: &[FieldValue]) -> Result<Vec<Vec<u8>>, HeaderError> {
        if values.len() != self.fields.len() {
            return Err(SchemaError::FieldCount {
                expected: self.fields.len(),
                actual: values.len(),
            }
            .into());
        }
        values
            .iter()
            .enumerate()
            .map(|(position, value)| -> Result<Vec<u8>, HeaderError> {
                self.check_value(position, value)?;
                Ok(value.encode_canonical()?)
            })
            .collect()
    }

    /// The hash tree over the encoded field values.
    pub fn leaf_tree(&self, values: &[FieldValue]) -> Result<MerkleTree, HeaderError> {
        let encoded = self.encode_fields(values)?;
        Ok(generate_tree(&encoded, &mut DefaultHash::new())?)
    }
}
