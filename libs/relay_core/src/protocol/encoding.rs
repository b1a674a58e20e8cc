//! Canonical per-field encoding applied before leaf hashing.
//!
//! This is the consensus engine's "binary bare" encoding restricted to the
//! types a header carries. A value equal to its type's zero value encodes to
//! nothing at all; everything else is varint or length-prefixed.

use crate::{
    primitives::{
        errors::EncodingError,
        header::{BlockId, PartSetHeader, Timestamp, Version},
    },
    protocol::schema::FieldValue,
};

/// Wire type of a varint sub-field.
pub const TYP3_VARINT: u8 = 0;
/// Wire type of a length-prefixed sub-field.
pub const TYP3_BYTE_LENGTH: u8 = 2;

/// 0001-01-01T00:00:00Z
pub const MIN_TIMESTAMP_SECONDS: i64 = -62135596800;
/// 10000-01-01T00:00:00Z
pub const MAX_TIMESTAMP_SECONDS: i64 = 253402300800;
pub const MAX_TIMESTAMP_NANOS: i32 = 999_999_999;

/// Unsigned LEB128.
pub fn encode_uvarint(buffer: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buffer.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buffer.push(value as u8);
}

/// `uvarint(len) || bytes`
pub fn encode_byte_slice(buffer: &mut Vec<u8>, bytes: &[u8]) {
    encode_uvarint(buffer, bytes.len() as u64);
    buffer.extend_from_slice(bytes);
}

fn encode_field_key(buffer: &mut Vec<u8>, number: u32, typ3: u8) {
    encode_uvarint(buffer, ((number as u64) << 3) | typ3 as u64);
}

fn encode_varint_field(buffer: &mut Vec<u8>, number: u32, value: u64) {
    if value != 0 {
        encode_field_key(buffer, number, TYP3_VARINT);
        encode_uvarint(buffer, value);
    }
}

fn encode_bytes_field(buffer: &mut Vec<u8>, number: u32, bytes: Option<&[u8]>) {
    if let Some(bytes) = bytes.filter(|bytes| !bytes.is_empty()) {
        encode_field_key(buffer, number, TYP3_BYTE_LENGTH);
        encode_byte_slice(buffer, bytes);
    }
}

/// A header value with a canonical byte encoding.
pub trait CanonicalEncode {
    /// True when the value is its type's zero value and encodes to nothing.
    fn is_zero_value(&self) -> bool;

    /// Append the encoding of a non-zero value.
    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError>;

    fn encode_canonical(&self) -> Result<Vec<u8>, EncodingError> {
        let mut buffer = Vec::new();
        if !self.is_zero_value() {
            self.encode_bare(&mut buffer)?;
        }
        Ok(buffer)
    }
}

impl CanonicalEncode for i64 {
    fn is_zero_value(&self) -> bool {
        *self == 0
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        if *self < 0 {
            return Err(EncodingError::NegativeInteger(*self));
        }
        encode_uvarint(buffer, *self as u64);
        Ok(())
    }
}

impl CanonicalEncode for String {
    fn is_zero_value(&self) -> bool {
        self.is_empty()
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        encode_byte_slice(buffer, self.as_bytes());
        Ok(())
    }
}

/// Unset and zero-length byte strings are both the zero value.
impl CanonicalEncode for Option<Vec<u8>> {
    fn is_zero_value(&self) -> bool {
        self.as_deref().is_none_or(<[u8]>::is_empty)
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        if let Some(bytes) = self {
            encode_byte_slice(buffer, bytes);
        }
        Ok(())
    }
}

impl CanonicalEncode for Version {
    fn is_zero_value(&self) -> bool {
        self.block == 0 && self.app == 0
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        encode_varint_field(buffer, 1, self.block);
        encode_varint_field(buffer, 2, self.app);
        Ok(())
    }
}

impl CanonicalEncode for Timestamp {
    /// Both the unix epoch and 0001-01-01 (the engine's unset time) encode to nothing.
    fn is_zero_value(&self) -> bool {
        self.nanos == 0 && (self.seconds == 0 || self.seconds == MIN_TIMESTAMP_SECONDS)
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        if self.seconds != 0 {
            if !(MIN_TIMESTAMP_SECONDS..MAX_TIMESTAMP_SECONDS).contains(&self.seconds) {
                return Err(EncodingError::TimestampOutOfRange(self.seconds));
            }
            // negative seconds travel as their two's complement
            encode_varint_field(buffer, 1, self.seconds as u64);
        }
        if self.nanos != 0 {
            if !(0..=MAX_TIMESTAMP_NANOS).contains(&self.nanos) {
                return Err(EncodingError::NanosOutOfRange(self.nanos));
            }
            encode_varint_field(buffer, 2, self.nanos as u64);
        }
        Ok(())
    }
}

impl CanonicalEncode for PartSetHeader {
    fn is_zero_value(&self) -> bool {
        self.total == 0 && self.hash.is_zero_value()
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        encode_varint_field(buffer, 1, self.total as u64);
        encode_bytes_field(buffer, 2, self.hash.as_deref());
        Ok(())
    }
}

impl CanonicalEncode for BlockId {
    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        encode_bytes_field(buffer, 1, self.hash.as_deref());
        // nested records are written even when empty
        let mut parts_header = Vec::new();
        self.parts_header.encode_bare(&mut parts_header)?;
        encode_field_key(buffer, 2, TYP3_BYTE_LENGTH);
        encode_byte_slice(buffer, &parts_header);
        Ok(())
    }
}

impl CanonicalEncode for FieldValue {
    fn is_zero_value(&self) -> bool {
        match self {
            FieldValue::Integer(value) => value.is_zero_value(),
            FieldValue::Text(value) => value.is_zero_value(),
            FieldValue::Bytes(value) => value.is_zero_value(),
            FieldValue::Timestamp(value) => value.is_zero_value(),
            FieldValue::Version(value) => value.is_zero_value(),
            FieldValue::BlockId(value) => value.is_zero_value(),
        }
    }

    fn encode_bare(&self, buffer: &mut Vec<u8>) -> Result<(), EncodingError> {
        match self {
            FieldValue::Integer(value) => value.encode_bare(buffer),
            FieldValue::Text(value) => value.encode_bare(buffer),
            FieldValue::Bytes(value) => value.encode_bare(buffer),
            FieldValue::Timestamp(value) => value.encode_bare(buffer),
            FieldValue::Version(value) => value.encode_bare(buffer),
            FieldValue::BlockId(value) => value.encode_bare(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uvarint(value: u64) -> Vec<u8> {
        let mut buffer = Vec::new();
        encode_uvarint(&mut buffer, value);
        buffer
    }

    fn from_hex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn test_uvarint() {
        assert_eq!(uvarint(0), vec![0x00]);
        assert_eq!(uvarint(1), vec![0x01]);
        assert_eq!(uvarint(127), vec![0x7f]);
        assert_eq!(uvarint(128), vec![0x80, 0x01]);
        assert_eq!(uvarint(300), vec![0xac, 0x02]);
        assert_eq!(uvarint(381837), from_hex("8da717"));
        assert_eq!(uvarint(u64::MAX).len(), 10);
    }

    #[test]
    fn test_height() {
        assert_eq!(381837i64.encode_canonical().unwrap(), from_hex("8da717"));
        assert_eq!(0i64.encode_canonical().unwrap(), Vec::<u8>::new());
        assert_eq!((-5i64).encode_canonical(), Err(EncodingError::NegativeInteger(-5)));
    }

    #[test]
    fn test_byte_strings() {
        let hash = from_hex("1ccd765c80d0dc1705bb7b6be616dad3cf2e6439bb9a9b776d5bd183f89ca141");
        let mut expected = vec![0x20];
        expected.extend_from_slice(&hash);
        assert_eq!(Some(hash).encode_canonical().unwrap(), expected);

        // unset and empty are the same zero value
        assert_eq!(None::<Vec<u8>>.encode_canonical().unwrap(), Vec::<u8>::new());
        assert_eq!(Some(Vec::<u8>::new()).encode_canonical().unwrap(), Vec::<u8>::new());
        assert_eq!(Some(vec![0x00]).encode_canonical().unwrap(), vec![0x01, 0x00]);
    }

    #[test]
    fn test_chain_id() {
        assert_eq!(
            "bandchain".to_string().encode_canonical().unwrap(),
            b"\x09bandchain".to_vec()
        );
        assert!(String::new().encode_canonical().unwrap().is_empty());
    }

    #[test]
    fn test_version() {
        assert_eq!(Version { block: 10, app: 0 }.encode_canonical().unwrap(), vec![0x08, 0x0a]);
        assert_eq!(
            Version { block: 10, app: 1 }.encode_canonical().unwrap(),
            vec![0x08, 0x0a, 0x10, 0x01]
        );
        assert!(Version::default().encode_canonical().unwrap().is_empty());
    }

    #[test]
    fn test_timestamp() {
        let time = Timestamp { seconds: 1587353430, nanos: 143851745 };
        assert_eq!(time.encode_canonical().unwrap(), from_hex("08d6aef4f40510e181cc44"));
        assert_eq!(
            Timestamp { seconds: 0, nanos: 5 }.encode_canonical().unwrap(),
            vec![0x10, 0x05]
        );
        assert!(Timestamp::default().encode_canonical().unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_bounds() {
        assert_eq!(
            Timestamp { seconds: MAX_TIMESTAMP_SECONDS, nanos: 0 }.encode_canonical(),
            Err(EncodingError::TimestampOutOfRange(MAX_TIMESTAMP_SECONDS))
        );
        assert_eq!(
            Timestamp { seconds: 1, nanos: 1_000_000_000 }.encode_canonical(),
            Err(EncodingError::NanosOutOfRange(1_000_000_000))
        );
        assert_eq!(
            Timestamp { seconds: 1, nanos: -1 }.encode_canonical(),
            Err(EncodingError::NanosOutOfRange(-1))
        );
        // pre-epoch seconds are a ten byte varint
        let encoded = Timestamp { seconds: -1, nanos: 0 }.encode_canonical().unwrap();
        assert_eq!(encoded.len(), 11);
        assert_eq!(encoded[0], 0x08);
    }

    #[test]
    fn test_unset_time_encodes_empty() {
        let unset = Timestamp { seconds: MIN_TIMESTAMP_SECONDS, nanos: 0 };
        assert!(unset.encode_canonical().unwrap().is_empty());
        assert_eq!(unset.encode_canonical(), Timestamp::default().encode_canonical());

        // one nanosecond past it is an ordinary timestamp
        let encoded = Timestamp { seconds: MIN_TIMESTAMP_SECONDS, nanos: 1 }
            .encode_canonical()
            .unwrap();
        assert_eq!(encoded.len(), 13);
        assert_eq!(&encoded[11..], &[0x10, 0x01]);
    }

    #[test]
    fn test_block_id() {
        let block_id = BlockId {
            hash: Some(from_hex(
                "f633b30d4fbec862f4a041311e2cb7dfad63d57930b065a563299449d25bd9ce",
            )),
            parts_header: PartSetHeader {
                total: 1,
                hash: Some(from_hex(
                    "7f334b7ee4f8aac5e70f07feb9a58a72f120e9ac046167851fc94bc4f2729550",
                )),
            },
        };
        assert_eq!(
            block_id.encode_canonical().unwrap(),
            from_hex(concat!(
                "0a20f633b30d4fbec862f4a041311e2cb7dfad63d57930b065a563299449d25bd9ce",
                "1224080112207f334b7ee4f8aac5e70f07feb9a58a72f120e9ac046167851fc94bc4f2729550"
            ))
        );
    }

    #[test]
    fn test_block_id_empty_nested() {
        assert!(BlockId::default().encode_canonical().unwrap().is_empty());
        let empty_hashes = BlockId {
            hash: Some(vec![]),
            parts_header: PartSetHeader { total: 0, hash: Some(vec![]) },
        };
        assert!(empty_hashes.encode_canonical().unwrap().is_empty());
        let block_id = BlockId {
            hash: Some(vec![0xaa]),
            parts_header: PartSetHeader::default(),
        };
        assert_eq!(block_id.encode_canonical().unwrap(), vec![0x0a, 0x01, 0xaa, 0x12, 0x00]);
    }

    #[test]
    fn test_field_value_delegates() {
        assert_eq!(
            FieldValue::Integer(381837).encode_canonical().unwrap(),
            381837i64.encode_canonical().unwrap()
        );
        assert_eq!(FieldValue::Bytes(None).encode_canonical().unwrap(), Vec::<u8>::new());
        assert_eq!(
            FieldValue::Text("bandchain".into()).encode_canonical().unwrap(),
            b"\x09bandchain".to_vec()
        );
    }
}
