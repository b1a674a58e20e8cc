use relay_crypto::{hashing::DefaultHash, merkle::MerkleTree, types::StdByteArray};

use crate::{
    primitives::{errors::HeaderError, header::BlockHeader, parts::BlockHeaderMerkleParts},
    protocol::{
        proof::{get_block_header_merkle_parts, PublicValues},
        schema::{FieldValue, HeaderField, HeaderSchema},
    },
};

impl BlockHeader {
    pub fn field_value(&self, field: HeaderField) -> FieldValue {
        match field {
            HeaderField::Version => FieldValue::Version(self.version),
            HeaderField::ChainId => FieldValue::Text(self.chain_id.clone()),
            HeaderField::Height => FieldValue::Integer(self.height),
            HeaderField::Time => FieldValue::Timestamp(self.time),
            HeaderField::LastBlockId => FieldValue::BlockId(self.last_block_id.clone()),
            HeaderField::LastCommitHash => FieldValue::Bytes(self.last_commit_hash.clone()),
            HeaderField::DataHash => FieldValue::Bytes(self.data_hash.clone()),
            HeaderField::ValidatorsHash => FieldValue::Bytes(self.validators_hash.clone()),
            HeaderField::NextValidatorsHash => FieldValue::Bytes(self.next_validators_hash.clone()),
            HeaderField::ConsensusHash => FieldValue::Bytes(self.consensus_hash.clone()),
            HeaderField::AppHash => FieldValue::Bytes(self.app_hash.clone()),
            HeaderField::LastResultsHash => FieldValue::Bytes(self.last_results_hash.clone()),
            HeaderField::EvidenceHash => FieldValue::Bytes(self.evidence_hash.clone()),
            HeaderField::ProposerAddress => FieldValue::Bytes(self.proposer_address.clone()),
        }
    }

    /// Field values in the order `schema` lists them.
    pub fn field_values(&self, schema: &HeaderSchema) -> Vec<FieldValue> {
        schema
            .fields
            .iter()
            .map(|descriptor| self.field_value(descriptor.field))
            .collect()
    }

    pub fn merkle_tree(&self, schema: &HeaderSchema) -> Result<MerkleTree, HeaderError> {
        schema.leaf_tree(&self.field_values(schema))
    }

    /// The block hash: root of the header's field tree.
    pub fn hash(&self, schema: &HeaderSchema) -> Result<StdByteArray, HeaderError> {
        Ok(self.merkle_tree(schema)?.root_hash(&mut DefaultHash::new()))
    }

    pub fn merkle_parts(
        &self,
        schema: &HeaderSchema,
    ) -> Result<BlockHeaderMerkleParts, HeaderError> {
        get_block_header_merkle_parts(self, schema)
    }

    pub fn public_values(&self) -> PublicValues {
        PublicValues::from(self)
    }
}
