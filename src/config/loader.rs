//! Configuration structures and loading logic.

use crate::config::modes::MessageLanguage;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stack: StackConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Nested templates that product versions can reference by id.
    #[serde(default)]
    pub product_stacks: Vec<ProductStackConfig>,

    #[serde(default)]
    pub products: Vec<ProductConfig>,

    /// Directory of the loaded file; relative template paths resolve against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Parent stack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Stack name, also the root of every construct path.
    #[serde(default = "default_stack_name")]
    pub name: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: default_stack_name(),
        }
    }
}

/// Output and asset location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the cloud assembly is written to.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Bucket that packaged assets are uploaded to.
    #[serde(default = "default_asset_bucket")]
    pub asset_bucket: String,

    /// Object key prefix for packaged assets.
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            asset_bucket: default_asset_bucket(),
            asset_prefix: default_asset_prefix(),
        }
    }
}

/// A nested product stack template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStackConfig {
    /// Construct id below the parent stack.
    pub id: String,

    /// Resources keyed by construct id.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

/// A raw CloudFormation resource inside a product stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// CloudFormation resource type, e.g. `AWS::SNS::Topic`.
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// A Service Catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Construct id below the parent stack.
    pub id: String,

    pub product_name: String,

    pub owner: String,

    #[serde(default)]
    pub versions: Vec<ProductVersionConfig>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub distributor: Option<String>,

    #[serde(default)]
    pub support_description: Option<String>,

    #[serde(default)]
    pub support_email: Option<String>,

    #[serde(default)]
    pub support_url: Option<String>,

    #[serde(default)]
    pub message_language: Option<MessageLanguage>,

    /// Replace existing provisioning artifacts on update.
    #[serde(default)]
    pub replace_product_version_ids: Option<bool>,
}

/// One provisioning artifact of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVersionConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub template: TemplateSourceConfig,

    /// Whether CloudFormation validates the template on import.
    #[serde(default = "default_true")]
    pub validate_template: bool,
}

/// Where a version's template comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSourceConfig {
    /// Remote template URL.
    Url(String),
    /// Local template file, packaged as an asset.
    File(PathBuf),
    /// Id of an entry in `product_stacks`.
    ProductStack(String),
}

fn default_stack_name() -> String {
    "Stack".to_string()
}

fn default_asset_bucket() -> String {
    "catalog-synth-assets".to_string()
}

fn default_asset_prefix() -> String {
    "assets/".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from catalog.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let mut config = Self::from_toml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Get the effective output directory.
    pub fn output_directory(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("cdk.out"))
    }

    /// Resolve a template path relative to the configuration file.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Find a product stack definition by id.
    pub fn product_stack(&self, id: &str) -> Option<&ProductStackConfig> {
        self.product_stacks.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[stack]
name = "Stack"

[output]
directory = "out"

[[product_stacks]]
id = "ProductStackV1"

[product_stacks.resources.SNSTopicProductStack]
type = "AWS::SNS::Topic"
properties = { DisplayName = "a test" }

[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"
message_language = "jp"

[[products.versions]]
name = "v1"
template = { url = "https://awsdocs.s3.amazonaws.com/servicecatalog/development-environment.template" }
validate_template = false

[[products.versions]]
name = "v2"
template = { product_stack = "ProductStackV1" }

[[products.versions]]
template = { file = "templates/product1.template.json" }
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.stack.name, "Stack");
        assert_eq!(config.output_directory(), PathBuf::from("out"));
        assert_eq!(config.output.asset_prefix, "assets/");

        let stack = config.product_stack("ProductStackV1").unwrap();
        let topic = &stack.resources["SNSTopicProductStack"];
        assert_eq!(topic.resource_type, "AWS::SNS::Topic");
        assert_eq!(topic.properties["DisplayName"], "a test");

        let product = &config.products[0];
        assert_eq!(product.message_language, Some(MessageLanguage::Japanese));
        assert_eq!(product.versions.len(), 3);
        assert!(!product.versions[0].validate_template);
        assert!(product.versions[1].validate_template);
        assert_eq!(
            product.versions[1].template,
            TemplateSourceConfig::ProductStack("ProductStackV1".into())
        );
        assert_eq!(
            product.versions[2].template,
            TemplateSourceConfig::File(PathBuf::from("templates/product1.template.json"))
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.stack.name, "Stack");
        assert_eq!(config.output_directory(), PathBuf::from("cdk.out"));
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_load_sets_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.resolve_path(Path::new("templates/a.json")),
            dir.path().join("templates/a.json")
        );
        assert_eq!(
            config.resolve_path(Path::new("/abs/a.json")),
            PathBuf::from("/abs/a.json")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/no/such/catalog.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_template_source_rejected() {
        let toml = r#"
[[products]]
id = "P"
product_name = "p"
owner = "o"
[[products.versions]]
template = { s3 = "bucket" }
"#;
        assert!(Config::from_toml(toml).is_err());
    }
}
