//! Cloud assembly: the output of a synthesis pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dedup::{ArtifactReference, Fingerprint, Packaging};
use crate::synth::state::SynthStats;

/// Manifest format identifier.
pub const MANIFEST_VERSION: &str = "catalog-synth/1";

/// File name of the assembly manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// One packaged asset as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifestEntry {
    pub id: String,
    /// File name inside the assembly directory.
    pub path: String,
    pub packaging: Packaging,
    pub source_hash: Fingerprint,
}

impl AssetManifestEntry {
    pub fn from_reference(reference: &ArtifactReference) -> Self {
        Self {
            id: reference.id.clone(),
            path: reference.file_name.clone(),
            packaging: reference.packaging,
            source_hash: reference.fingerprint.clone(),
        }
    }
}

/// Payload of an asset waiting to be written.
#[derive(Debug, Clone)]
pub struct StagedAsset {
    entry: AssetManifestEntry,
    bytes: Vec<u8>,
}

impl StagedAsset {
    pub fn new(entry: AssetManifestEntry, bytes: Vec<u8>) -> Self {
        Self { entry, bytes }
    }

    pub fn entry(&self) -> &AssetManifestEntry {
        &self.entry
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A synthesized stack with its template and assets.
#[derive(Debug, Clone)]
pub struct StackArtifact {
    stack_name: String,
    template: Value,
    assets: Vec<AssetManifestEntry>,
    staged: Vec<StagedAsset>,
}

impl StackArtifact {
    pub fn new(
        stack_name: String,
        template: Value,
        assets: Vec<AssetManifestEntry>,
        staged: Vec<StagedAsset>,
    ) -> Self {
        Self {
            stack_name,
            template,
            assets,
            staged,
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn template(&self) -> &Value {
        &self.template
    }

    /// Template file name inside the assembly directory.
    pub fn template_file(&self) -> String {
        format!("{}.template.json", self.stack_name)
    }

    /// Assets in first-seen order.
    pub fn assets(&self) -> &[AssetManifestEntry] {
        &self.assets
    }

    pub fn staged(&self) -> &[StagedAsset] {
        &self.staged
    }

    /// Resources of the given CloudFormation type, keyed by logical id.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.template["Resources"]
            .as_object()
            .into_iter()
            .flat_map(|resources| resources.iter())
            .filter(move |(_, resource)| resource["Type"] == resource_type)
    }
}

/// Everything produced by one synthesis pass.
#[derive(Debug, Clone)]
pub struct CloudAssembly {
    pub session_id: Uuid,
    pub synthesized_at: DateTime<Utc>,
    pub stacks: Vec<StackArtifact>,
    pub stats: SynthStats,
}

impl CloudAssembly {
    /// Build the serializable manifest describing this assembly.
    pub fn manifest(&self) -> AssemblyManifest {
        AssemblyManifest {
            version: MANIFEST_VERSION.to_string(),
            session_id: self.session_id.to_string(),
            synthesized_at: self.synthesized_at,
            artifacts: self
                .stacks
                .iter()
                .map(|stack| ArtifactManifest {
                    id: stack.stack_name.clone(),
                    artifact_type: "aws:cloudformation:stack".to_string(),
                    template_file: stack.template_file(),
                    assets: stack.assets.clone(),
                })
                .collect(),
        }
    }

    /// Total number of packaged assets across all stacks.
    pub fn asset_count(&self) -> usize {
        self.stacks.iter().map(|s| s.assets.len()).sum()
    }
}

/// On-disk manifest of a cloud assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyManifest {
    pub version: String,
    pub session_id: String,
    pub synthesized_at: DateTime<Utc>,
    pub artifacts: Vec<ArtifactManifest>,
}

/// Manifest entry for one stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactManifest {
    pub id: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub template_file: String,
    pub assets: Vec<AssetManifestEntry>,
}
