//! Deduplication module.
//!
//! Provides:
//! - Content fingerprinting (SHA-256 over canonical bytes)
//! - The per-pass fingerprint → artifact registry
//! - A lock-guarded registry handle for parallel renderers

pub mod hash;
pub mod service;
pub mod shared;

pub use hash::{canonical_bytes, fingerprint, fingerprint_file, fingerprint_json, Fingerprint};
pub use service::{ArtifactReference, AssetDeduplicator, Packaging, Resolution, TemplateDocument};
pub use shared::SharedDeduplicator;
