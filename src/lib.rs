//! catalog-synth - AWS Service Catalog product synthesis
//!
//! This library renders Service Catalog `CloudFormationProduct` resources into
//! a CloudFormation stack template and packages their provisioning templates.
//!
//! # Features
//!
//! - Provisioning templates from URLs, local files, or product stacks
//! - Content-addressed deduplication: identical templates become one asset
//! - Field validation with construct-path error messages
//! - Cloud assembly output with an asset manifest
//!
//! # Example
//!
//! ```no_run
//! use catalog_synth::product::{
//!     CloudFormationProduct, CloudFormationProductProps, CloudFormationTemplate, ProductVersion,
//! };
//! use catalog_synth::synth::{SessionOptions, SynthesisSession};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = SynthesisSession::start("Stack", SessionOptions::default())?;
//!     let version = ProductVersion::new(CloudFormationTemplate::from_url(
//!         "https://awsdocs.s3.amazonaws.com/servicecatalog/development-environment.template",
//!     ));
//!     CloudFormationProduct::new(
//!         &mut session,
//!         "MyProduct",
//!         CloudFormationProductProps::new("testProduct", "testOwner", vec![version]),
//!     )?;
//!
//!     let assembly = session.finish();
//!     println!("{}", assembly.stacks[0].template());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fs;
pub mod output;
pub mod product;
pub mod synth;

// Re-exports for convenience
pub use config::Config;
pub use dedup::{ArtifactReference, AssetDeduplicator, Fingerprint, TemplateDocument};
pub use error::{Error, Result};
pub use synth::{synthesize, CloudAssembly, SynthesisSession};
