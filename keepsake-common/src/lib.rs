//! # Keepsake Common Library
//!
//! Shared code for the keepsake web service including:
//! - Error taxonomy
//! - Configuration and root folder resolution
//! - Database schema and song queries
//! - The local object store for user-authored records

pub mod config;
pub mod db;
pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::{Record, Store, StoreHandle};
