//! Configuration module for catalog-synth.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Message language parsing
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    Config, OutputConfig, ProductConfig, ProductStackConfig, ProductVersionConfig, ResourceConfig,
    StackConfig, TemplateSourceConfig,
};
pub use modes::MessageLanguage;
pub use validation::validate_config;
