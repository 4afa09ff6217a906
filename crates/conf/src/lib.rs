//! # Conf Crate
//!
//! Configuration for recommender jobs: a flat key/value store, the
//! well-known keys, and loading from TOML or properties files.

pub mod configuration;
pub mod error;
pub mod keys;

pub use configuration::Configuration;
pub use error::{ConfError, Result};
