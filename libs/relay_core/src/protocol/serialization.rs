use serde::{Deserialize, Serialize};

use crate::{
    primitives::{header::BlockHeader, parts::BlockHeaderMerkleParts},
    protocol::proof::PublicValues,
};

/// Stable binary layout for relay messages.
///
/// Digests and byte strings travel as raw bytes; hex is only used by
/// human-readable formats.
pub trait WireSerialize: Serialize + for<'a> Deserialize<'a> + Sized {
    fn serialize_wire(&self) -> Result<Vec<u8>, std::io::Error> {
        let encoded = bincode::serialize(&self)
            .map_err(std::io::Error::other)?;
        Ok(encoded)
    }

    fn deserialize_wire(data: &[u8]) -> Result<Self, std::io::Error> {
        let decoded = bincode::deserialize::<Self>(data)
            .map_err(std::io::Error::other)?;
        Ok(decoded)
    }
}

impl WireSerialize for BlockHeaderMerkleParts {}
impl WireSerialize for BlockHeader {}
impl WireSerialize for PublicValues {}
