use relay_crypto::errors::MerkleError;
use thiserror::Error;

use crate::protocol::schema::FieldKind;

/// The header does not fit the schema it is hashed under.
///
/// These are version/configuration errors and are never recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Wrong number of field values for the schema
    #[error("schema expects {expected} header fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// A value's type tag does not match its descriptor
    #[error("field {position} ({field}) expects a {expected:?} value, got {actual:?}")]
    KindMismatch {
        position: usize,
        field: &'static str,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// The same field is listed twice
    #[error("field {0} appears more than once in the schema")]
    DuplicateField(&'static str),

    /// The plan derived from the schema ships the wrong number of parts
    #[error("schema disclosure yields {actual} parts, expected {expected}")]
    PartsArity { expected: usize, actual: usize },

    /// A public position has no verifier-supplied value
    #[error("no public value supplied for field {0}")]
    MissingPublicValue(&'static str),

    /// Unknown schema version tag
    #[error("unknown header schema version {0}")]
    UnknownVersion(u16),

    /// The schema cannot be turned into a tree or plan
    #[error("invalid schema shape: {0}")]
    Shape(#[from] MerkleError),
}

/// A raw value has no canonical encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Unsigned encoding of a negative integer
    #[error("negative value {0} cannot be encoded as an unsigned integer")]
    NegativeInteger(i64),

    /// Seconds outside the years 0001..=9999
    #[error("timestamp seconds {0} outside the encodable range")]
    TimestampOutOfRange(i64),

    /// Nanoseconds outside [0, 999999999]
    #[error("timestamp nanos {0} outside [0, 999999999]")]
    NanosOutOfRange(i32),

    /// A transported parts bundle has the wrong byte length
    #[error("parts bundle must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Any failure on the prover or verifier path.
///
/// A proof that simply does not match its trusted hash is not an error; see
/// `protocol::proof::VerificationResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("schema mismatch: {0}")]
    Schema(#[from] SchemaError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),
}
