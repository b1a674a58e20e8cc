//! Common type aliases used across cryptographic components.

/// Standard byte array length used for every tree digest (32 bytes).
pub const STANDARD_ARRAY_LENGTH: usize = 32;
/// Fixed-size 32-byte array holding a leaf, branch or root digest.
pub type StdByteArray = [u8; STANDARD_ARRAY_LENGTH];
