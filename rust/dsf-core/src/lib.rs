//! dsf-core: Dialogue state, label taxonomy, domain description, and configuration.

pub mod config;
pub mod domain;
pub mod state;

pub use config::{validate_config, Config, ConfigError, FeaturizerConfig, LoggingConfig, OutputKind};
pub use domain::{Domain, SlotSpec};
pub use state::{classify_label, split_label, state_from_pairs, LabelKind, State};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod state_tests;
