//! Synthesis module.
//!
//! This module provides:
//! - The synthesis session (one pass, owns the deduplication registry)
//! - The cloud assembly produced by a pass
//! - Building a pass from configuration
//! - Publishing an assembly to disk
//! - Synthesis statistics

pub mod assembly;
pub mod build;
pub mod publish;
pub mod session;
pub mod state;

pub use assembly::{AssemblyManifest, AssetManifestEntry, CloudAssembly, StackArtifact, StagedAsset};
pub use build::synthesize;
pub use publish::{publish_assembly, AssetPublisher, DirectoryPublisher, PublishOutcome, PublishReport};
pub use session::{PreparedTemplate, SessionOptions, SynthesisSession, TemplateLocation};
pub use state::SynthStats;
