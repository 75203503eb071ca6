//! Synthesis session: the explicit context of one synthesis pass.
//!
//! A session is started for one parent stack, collects the resources that
//! products add to it, resolves every provisioning template to a packaged
//! artifact, and is consumed by [`SynthesisSession::finish`]. The
//! deduplication registry lives and dies with the session, so deduplication
//! never spans two passes.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dedup::{fingerprint, ArtifactReference, AssetDeduplicator, TemplateDocument};
use crate::error::{Error, Result};
use crate::fs::naming::{asset_file_name, validate_construct_id, ConstructPath};
use crate::product::template::CloudFormationTemplate;
use crate::synth::assembly::{AssetManifestEntry, CloudAssembly, StackArtifact, StagedAsset};
use crate::synth::state::SynthStats;

/// Extension assumed for asset files without one.
const DEFAULT_TEMPLATE_EXTENSION: &str = ".json";

/// Asset upload location used when rendering template URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub asset_bucket: String,
    pub asset_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            asset_bucket: "catalog-synth-assets".to_string(),
            asset_prefix: "assets/".to_string(),
        }
    }
}

/// Resolved location of a provisioning template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLocation {
    /// Externally hosted template.
    Url(String),
    /// Packaged asset; the URL is known only at deploy time.
    Asset(ArtifactReference),
}

/// A template that has been read or rendered but not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedTemplate {
    Url(String),
    Document(TemplateDocument),
}

/// State of one synthesis pass.
#[derive(Debug)]
pub struct SynthesisSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    stack_path: ConstructPath,
    options: SessionOptions,
    dedup: AssetDeduplicator,
    resources: BTreeMap<String, Value>,
    staged: Vec<StagedAsset>,
    stats: SynthStats,
}

impl SynthesisSession {
    /// Begin a pass for the stack named `stack_name`.
    pub fn start(stack_name: &str, options: SessionOptions) -> Result<Self> {
        validate_construct_id(stack_name)?;

        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            stack_path: ConstructPath::root(stack_name),
            options,
            dedup: AssetDeduplicator::new(),
            resources: BTreeMap::new(),
            staged: Vec::new(),
            stats: SynthStats::default(),
        };

        tracing::info!("Synthesis session {} started for {}", session.id, stack_name);
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Construct path of the parent stack.
    pub fn stack_path(&self) -> &ConstructPath {
        &self.stack_path
    }

    pub fn stats(&self) -> &SynthStats {
        &self.stats
    }

    /// Mutable statistics, for constructs that count what they add.
    pub fn stats_mut(&mut self) -> &mut SynthStats {
        &mut self.stats
    }

    /// Number of distinct artifacts registered so far.
    pub fn asset_count(&self) -> usize {
        self.dedup.len()
    }

    /// Resolve a rendered document to its artifact, staging the payload the
    /// first time its content is seen.
    pub fn resolve_document(&mut self, document: TemplateDocument) -> ArtifactReference {
        let resolution = self.dedup.resolve_with_status(&document);

        if resolution.created {
            self.stats.increment_asset();
            self.staged.push(StagedAsset::new(
                AssetManifestEntry::from_reference(&resolution.reference),
                document.bytes().to_vec(),
            ));
        } else {
            self.stats.increment_duplicate();
        }

        resolution.reference
    }

    /// Read or render `template` without touching the session.
    ///
    /// Every fallible step of resolving a template happens here, so callers
    /// can prepare all their templates before committing any of them.
    pub fn prepare_template(&self, template: &CloudFormationTemplate) -> Result<PreparedTemplate> {
        match template {
            CloudFormationTemplate::Url(url) => Ok(PreparedTemplate::Url(url.clone())),
            CloudFormationTemplate::Asset(path) => Ok(PreparedTemplate::Document(read_asset(path)?)),
            CloudFormationTemplate::ProductStack(stack) => {
                Ok(PreparedTemplate::Document(stack.to_document()?))
            }
        }
    }

    /// Register a prepared template and count it against `template`'s source.
    pub fn commit_template(
        &mut self,
        template: &CloudFormationTemplate,
        prepared: PreparedTemplate,
    ) -> TemplateLocation {
        self.stats.record_template(template);

        match prepared {
            PreparedTemplate::Url(url) => TemplateLocation::Url(url),
            PreparedTemplate::Document(document) => {
                TemplateLocation::Asset(self.resolve_document(document))
            }
        }
    }

    /// Resolve where a product version's template will be loaded from.
    pub fn resolve_template(
        &mut self,
        template: &CloudFormationTemplate,
    ) -> Result<TemplateLocation> {
        let prepared = self.prepare_template(template)?;
        Ok(self.commit_template(template, prepared))
    }

    /// Value to place in `LoadTemplateFromURL` for a resolved template.
    pub fn template_url(&self, location: &TemplateLocation) -> Value {
        match location {
            TemplateLocation::Url(url) => Value::String(url.clone()),
            TemplateLocation::Asset(reference) => json!({
                "Fn::Sub": format!(
                    "https://s3.${{AWS::Region}}.${{AWS::URLSuffix}}/{}/{}",
                    self.options.asset_bucket,
                    self.object_key(reference)
                )
            }),
        }
    }

    /// Object key an artifact is uploaded under.
    pub fn object_key(&self, reference: &ArtifactReference) -> String {
        format!(
            "{}{}{}",
            self.options.asset_prefix,
            reference.fingerprint,
            extension_of(&reference.file_name)
        )
    }

    /// Whether the parent stack already holds `logical_id`.
    pub fn contains_resource(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    /// Add a resource to the parent stack template.
    pub fn add_resource(&mut self, logical_id: String, resource: Value) -> Result<()> {
        if self.contains_resource(&logical_id) {
            return Err(Error::DuplicateLogicalId(logical_id));
        }
        tracing::debug!("Added resource {}", logical_id);
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// End the pass and produce the cloud assembly.
    pub fn finish(self) -> CloudAssembly {
        let stack_name = self.stack_path.id().to_string();
        let assets: Vec<AssetManifestEntry> = self
            .dedup
            .references()
            .iter()
            .map(AssetManifestEntry::from_reference)
            .collect();

        tracing::info!(
            "Synthesis session {} finished: {} resource(s), {} asset(s), {} duplicate(s) skipped",
            self.id,
            self.resources.len(),
            assets.len(),
            self.stats.duplicate_count
        );

        let template = json!({ "Resources": self.resources });
        let stack = StackArtifact::new(stack_name, template, assets, self.staged);

        CloudAssembly {
            session_id: self.id,
            synthesized_at: self.started_at,
            stacks: vec![stack],
            stats: self.stats,
        }
    }
}

/// Read a local template file into a document named after its content.
fn read_asset(path: &Path) -> Result<TemplateDocument> {
    let bytes = std::fs::read(path).map_err(|e| {
        Error::TemplateSource(format!("Failed to read template {}: {}", path.display(), e))
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| DEFAULT_TEMPLATE_EXTENSION.to_string());

    let file_name = asset_file_name(&fingerprint(&bytes), &extension);
    Ok(TemplateDocument::new(file_name, bytes))
}

/// Final extension of a file name, including the dot.
fn extension_of(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .map(|pos| &file_name[pos..])
        .unwrap_or(DEFAULT_TEMPLATE_EXTENSION)
}
