pub mod error;
pub mod codec;
pub mod rows;
pub mod opstack;
pub mod db;
pub mod claim_model;
pub mod metadata;
pub mod config;

pub use config::StoreConfig;
pub use db::PrefixDb;
pub use error::{ClaimModelError, CodecError, MetadataError, StoreError, ValidationError};
