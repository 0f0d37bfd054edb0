//! talentfit-store: Repository implementations and configuration.
//!
//! Implements the repository traits from `talentfit-core` in memory and loads
//! the `talentfit.toml` configuration.

pub mod config;
pub mod error;
pub mod memory;

pub use config::{load_config, load_config_from, TalentfitConfig};
pub use error::StoreError;
pub use memory::InMemoryStore;
