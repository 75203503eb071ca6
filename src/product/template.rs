//! Provisioning template sources and product versions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{json, Map, Value};

use crate::dedup::{canonical_bytes, TemplateDocument};
use crate::error::{Error, Result};
use crate::fs::naming::{make_unique_id, product_template_file_name, validate_construct_id, ConstructPath};

/// Where a product version's CloudFormation template comes from.
#[derive(Debug, Clone)]
pub enum CloudFormationTemplate {
    /// A template already hosted at a URL.
    Url(String),
    /// A local template file, packaged as an asset.
    Asset(PathBuf),
    /// A template rendered from a product stack, packaged as an asset.
    ProductStack(ProductStack),
}

impl CloudFormationTemplate {
    pub fn from_url(url: impl Into<String>) -> Self {
        CloudFormationTemplate::Url(url.into())
    }

    pub fn from_asset(path: impl Into<PathBuf>) -> Self {
        CloudFormationTemplate::Asset(path.into())
    }

    pub fn from_product_stack(stack: ProductStack) -> Self {
        CloudFormationTemplate::ProductStack(stack)
    }

    /// Short label for logs and statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            CloudFormationTemplate::Url(_) => "url",
            CloudFormationTemplate::Asset(_) => "asset",
            CloudFormationTemplate::ProductStack(_) => "product stack",
        }
    }
}

/// A raw CloudFormation resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    pub resource_type: String,
    pub properties: Map<String, Value>,
}

impl ResourceSpec {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: Map::new(),
        }
    }

    /// Set one property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    fn render(&self) -> Value {
        let mut resource = Map::new();
        resource.insert("Type".to_string(), Value::String(self.resource_type.clone()));
        if !self.properties.is_empty() {
            resource.insert("Properties".to_string(), Value::Object(self.properties.clone()));
        }
        Value::Object(resource)
    }
}

/// A nested template whose resources are defined alongside the product.
///
/// Logical ids are scoped to the product stack, so two stacks holding the same
/// resources render to the same bytes regardless of where they sit.
#[derive(Debug, Clone)]
pub struct ProductStack {
    path: ConstructPath,
    resources: BTreeMap<String, ResourceSpec>,
}

impl ProductStack {
    /// Create an empty product stack under `parent`.
    pub fn new(parent: &ConstructPath, id: &str) -> Result<Self> {
        validate_construct_id(id)?;
        Ok(Self {
            path: parent.child(id),
            resources: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &ConstructPath {
        &self.path
    }

    /// Add a resource under construct id `id`.
    pub fn add_resource(&mut self, id: &str, resource: ResourceSpec) -> Result<()> {
        validate_construct_id(id)?;
        if self.resources.contains_key(id) {
            return Err(Error::ConstructId(format!(
                "there is already a construct with id '{}' in {}",
                id, self.path
            )));
        }
        self.resources.insert(id.to_string(), resource);
        Ok(())
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Render the CloudFormation template body.
    pub fn render(&self) -> Result<Value> {
        let mut resources = Map::new();
        for (id, resource) in &self.resources {
            let logical_id = make_unique_id(&[id.as_str()])?;
            if resources.insert(logical_id.clone(), resource.render()).is_some() {
                return Err(Error::DuplicateLogicalId(logical_id));
            }
        }
        Ok(json!({ "Resources": resources }))
    }

    /// Render into a document ready for deduplication and packaging.
    pub fn to_document(&self) -> Result<TemplateDocument> {
        let bytes = canonical_bytes(&self.render()?)?;
        Ok(TemplateDocument::new(product_template_file_name(&self.path)?, bytes))
    }
}

/// One provisioning artifact of a product.
#[derive(Debug, Clone)]
pub struct ProductVersion {
    pub template: CloudFormationTemplate,
    pub name: Option<String>,
    pub description: Option<String>,
    /// When false, CloudFormation skips template validation on import.
    pub validate_template: bool,
}

impl ProductVersion {
    pub fn new(template: CloudFormationTemplate) -> Self {
        Self {
            template,
            name: None,
            description: None,
            validate_template: true,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
