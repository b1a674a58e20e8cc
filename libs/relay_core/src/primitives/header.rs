use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, IfIsHumanReadable};

/// Consensus protocol versions carried in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    // block protocol version
    pub block: u64,
    // application protocol version
    pub app: u64,
}

/// Seconds and nanoseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Timestamp {
            seconds: time.timestamp(),
            nanos: time.timestamp_subsec_nanos() as i32,
        }
    }
}

/// Describes how a block was split into parts for gossip.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub hash: Option<Vec<u8>>,
}

/// Identifies a block by its hash and its part set.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub hash: Option<Vec<u8>>,
    pub parts_header: PartSetHeader,
}

fn is_unset(bytes: &Option<Vec<u8>>) -> bool {
    bytes.as_deref().is_none_or(<[u8]>::is_empty)
}

impl BlockId {
    /// No hash and an empty part set; an empty hash counts as no hash.
    pub fn is_zero(&self) -> bool {
        is_unset(&self.hash) && self.parts_header.total == 0 && is_unset(&self.parts_header.hash)
    }
}

/// A fully decoded block header.
///
/// Byte-string fields are `None` when the consensus engine left them unset.
/// RPC JSON renders unset hashes as `""`, which deserializes to `Some(vec![])`
/// and hashes the same as `None`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: Version,
    pub chain_id: String,
    pub height: i64,
    pub time: Timestamp,
    // previous block
    pub last_block_id: BlockId,
    // commit from validators of the previous block
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub last_commit_hash: Option<Vec<u8>>,
    // transactions
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub data_hash: Option<Vec<u8>>,
    // validators for this block and the next
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub validators_hash: Option<Vec<u8>>,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub next_validators_hash: Option<Vec<u8>>,
    // consensus params
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub consensus_hash: Option<Vec<u8>>,
    // application state after the previous block
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub app_hash: Option<Vec<u8>>,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub last_results_hash: Option<Vec<u8>>,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub evidence_hash: Option<Vec<u8>>,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub proposer_address: Option<Vec<u8>>,
}
