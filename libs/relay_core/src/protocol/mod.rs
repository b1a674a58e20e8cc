use crate::protocol::versions::SchemaVersion;

pub mod encoding;
pub mod proof;
pub mod schema;
pub mod serialization;
pub mod versions;

pub const CURRENT_SCHEMA_VERSION: SchemaVersion = SchemaVersion::V0_33;
