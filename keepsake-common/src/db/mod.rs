//! Database schema and queries

pub mod init;
pub mod songs;

pub use init::*;
pub use songs::*;
