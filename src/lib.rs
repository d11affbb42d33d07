#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod bucket;
mod error;

pub mod capacity;

/// Construction parameters for tables.
pub mod config;

/// The Robin Hood table and its displacement engine.
pub mod hash_table;

pub mod hasher;

mod spooky;

pub use bucket::Bucket;
pub use config::TableConfig;
pub use error::Error;
pub use error::Result;
pub use hash_table::Table;
pub use hasher::AnyHasher;
pub use hasher::DefaultHasher;
#[cfg(feature = "highway")]
pub use hasher::HighwayHash;
pub use hasher::HasherKind;
pub use hasher::KeyHasher;
#[cfg(feature = "sip")]
pub use hasher::SipHash;
pub use hasher::SpookyHash;
#[cfg(feature = "t1ha")]
pub use hasher::T1Hash;
