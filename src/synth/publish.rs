//! Writing a cloud assembly out.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use indicatif::ProgressBar;

use crate::dedup::fingerprint_file;
use crate::error::{Error, Result};
use crate::fs::naming::sanitize_filename;
use crate::fs::paths::ensure_dir;
use crate::synth::assembly::{AssemblyManifest, CloudAssembly, StackArtifact, StagedAsset, MANIFEST_FILE};

/// What happened to one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Written,
    /// An identical file was already in place.
    Unchanged,
}

/// Summary of a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub written: u64,
    pub unchanged: u64,
}

impl PublishReport {
    fn record(&mut self, outcome: PublishOutcome) {
        match outcome {
            PublishOutcome::Written => self.written += 1,
            PublishOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Destination for synthesized output.
#[async_trait]
pub trait AssetPublisher: Send + Sync {
    /// Store one packaged asset.
    async fn publish_asset(&self, asset: &StagedAsset) -> Result<PublishOutcome>;

    /// Store a stack template.
    async fn publish_stack(&self, stack: &StackArtifact) -> Result<()>;

    /// Store the assembly manifest; called last.
    async fn publish_manifest(&self, manifest: &AssemblyManifest) -> Result<()>;
}

/// Publish every stack, asset and the manifest of `assembly`.
///
/// Assets are written concurrently; the manifest is only written once all
/// assets and templates are in place.
pub async fn publish_assembly(
    assembly: &CloudAssembly,
    publisher: &dyn AssetPublisher,
    progress: &ProgressBar,
) -> Result<PublishReport> {
    let mut report = PublishReport::default();

    for stack in &assembly.stacks {
        publisher.publish_stack(stack).await?;

        let uploads = stack.staged().iter().map(|asset| async move {
            let outcome = publisher.publish_asset(asset).await?;
            progress.inc(1);
            tracing::debug!("{} {:?}", asset.entry().path, outcome);
            Ok::<_, Error>(outcome)
        });

        for outcome in try_join_all(uploads).await? {
            report.record(outcome);
        }
    }

    publisher.publish_manifest(&assembly.manifest()).await?;
    progress.finish_and_clear();

    Ok(report)
}

/// Writes the assembly into a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    root: PathBuf,
}

impl DirectoryPublisher {
    /// Create a publisher rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, file_name: &str) -> Result<PathBuf> {
        Ok(self.root.join(sanitize_filename(file_name)?))
    }
}

#[async_trait]
impl AssetPublisher for DirectoryPublisher {
    async fn publish_asset(&self, asset: &StagedAsset) -> Result<PublishOutcome> {
        let target = self.target(&asset.entry().path)?;

        if tokio::fs::try_exists(&target).await? {
            let existing = target.clone();
            let current = tokio::task::spawn_blocking(move || fingerprint_file(&existing))
                .await
                .map_err(|e| Error::Asset(format!("Hashing task failed: {}", e)))??;

            if current == asset.entry().source_hash {
                return Ok(PublishOutcome::Unchanged);
            }
        }

        tokio::fs::write(&target, asset.bytes()).await?;
        Ok(PublishOutcome::Written)
    }

    async fn publish_stack(&self, stack: &StackArtifact) -> Result<()> {
        let target = self.target(&stack.template_file())?;
        let content = serde_json::to_vec_pretty(stack.template())?;
        tokio::fs::write(&target, content).await?;
        tracing::debug!("Wrote {}", target.display());
        Ok(())
    }

    async fn publish_manifest(&self, manifest: &AssemblyManifest) -> Result<()> {
        let content = serde_json::to_vec_pretty(manifest)?;
        tokio::fs::write(self.root.join(MANIFEST_FILE), content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::fingerprint;
    use crate::product::template::{CloudFormationTemplate, ProductStack, ResourceSpec};
    use crate::synth::session::{SessionOptions, SynthesisSession};
    use std::sync::Mutex;

    fn assembly_with_two_assets() -> CloudAssembly {
        let mut session = SynthesisSession::start("Stack", SessionOptions::default()).unwrap();
        for (id, resource) in [("v1", "TopicA"), ("v2", "TopicB"), ("v3", "TopicA")] {
            let mut stack = ProductStack::new(session.stack_path(), id).unwrap();
            stack
                .add_resource(resource, ResourceSpec::new("AWS::SNS::Topic"))
                .unwrap();
            session
                .resolve_template(&CloudFormationTemplate::from_product_stack(stack))
                .unwrap();
        }
        session.finish()
    }

    #[derive(Default)]
    struct RecordingPublisher {
        assets: Mutex<Vec<String>>,
        manifests: Mutex<u32>,
    }

    #[async_trait]
    impl AssetPublisher for RecordingPublisher {
        async fn publish_asset(&self, asset: &StagedAsset) -> Result<PublishOutcome> {
            self.assets.lock().unwrap().push(asset.entry().path.clone());
            Ok(PublishOutcome::Written)
        }

        async fn publish_stack(&self, _stack: &StackArtifact) -> Result<()> {
            Ok(())
        }

        async fn publish_manifest(&self, _manifest: &AssemblyManifest) -> Result<()> {
            *self.manifests.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_each_asset_published_once() {
        let assembly = assembly_with_two_assets();
        let publisher = RecordingPublisher::default();

        let report = publish_assembly(&assembly, &publisher, &ProgressBar::hidden())
            .await
            .unwrap();

        let mut assets = publisher.assets.lock().unwrap().clone();
        assets.sort();
        assert_eq!(
            assets,
            vec![
                "Stackv122E0AEBB.product.template.json".to_string(),
                assembly.stacks[0].assets()[1].path.clone(),
            ]
        );
        assert_eq!(report.written, 2);
        assert_eq!(*publisher.manifests.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_directory_publisher_writes_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path().join("cdk.out")).unwrap();
        let assembly = assembly_with_two_assets();

        let report = publish_assembly(&assembly, &publisher, &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(report, PublishReport { written: 2, unchanged: 0 });

        let root = publisher.root();
        assert!(root.join("Stack.template.json").exists());
        assert!(root.join(MANIFEST_FILE).exists());

        for entry in assembly.stacks[0].assets() {
            let bytes = std::fs::read(root.join(&entry.path)).unwrap();
            assert_eq!(fingerprint(&bytes), entry.source_hash);
        }

        let manifest: AssemblyManifest =
            serde_json::from_slice(&std::fs::read(root.join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(manifest.artifacts[0].assets.len(), 2);
    }

    #[test]
    fn test_republish_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path()).unwrap();
        let assembly = assembly_with_two_assets();

        tokio_test::block_on(publish_assembly(&assembly, &publisher, &ProgressBar::hidden()))
            .unwrap();
        let second =
            tokio_test::block_on(publish_assembly(&assembly, &publisher, &ProgressBar::hidden()))
                .unwrap();

        assert_eq!(second, PublishReport { written: 0, unchanged: 2 });
    }

    #[tokio::test]
    async fn test_modified_asset_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = DirectoryPublisher::new(dir.path()).unwrap();
        let assembly = assembly_with_two_assets();
        let asset = &assembly.stacks[0].staged()[0];

        std::fs::write(dir.path().join(&asset.entry().path), b"tampered").unwrap();

        assert_eq!(
            publisher.publish_asset(asset).await.unwrap(),
            PublishOutcome::Written
        );
        assert_eq!(
            std::fs::read(dir.path().join(&asset.entry().path)).unwrap(),
            asset.bytes()
        );
    }
}
