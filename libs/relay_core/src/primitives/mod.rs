pub mod header;
pub mod parts;
pub mod errors;
pub mod implementations;
