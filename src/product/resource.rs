//! The `AWS::ServiceCatalog::CloudFormationProduct` resource.

use serde_json::{json, Map, Value};

use crate::config::MessageLanguage;
use crate::error::{Error, Result};
use crate::fs::naming::{validate_construct_id, ConstructPath};
use crate::product::template::{CloudFormationTemplate, ProductVersion};
use crate::product::validation::{validate_email, validate_length, validate_url};
use crate::synth::session::SynthesisSession;

/// CloudFormation type of the rendered resource.
pub const RESOURCE_TYPE: &str = "AWS::ServiceCatalog::CloudFormationProduct";

/// Upper bound for free-text fields.
const MAX_TEXT_LENGTH: usize = 8191;

/// Upper bound for names.
const MAX_NAME_LENGTH: usize = 100;

/// Properties of a CloudFormation product.
#[derive(Debug, Clone)]
pub struct CloudFormationProductProps {
    pub product_name: String,
    pub owner: String,
    pub product_versions: Vec<ProductVersion>,
    pub description: Option<String>,
    pub distributor: Option<String>,
    pub support_description: Option<String>,
    pub support_email: Option<String>,
    pub support_url: Option<String>,
    pub message_language: Option<MessageLanguage>,
    pub replace_product_version_ids: Option<bool>,
}

impl CloudFormationProductProps {
    /// Required properties only.
    pub fn new(
        product_name: impl Into<String>,
        owner: impl Into<String>,
        product_versions: Vec<ProductVersion>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            owner: owner.into(),
            product_versions,
            description: None,
            distributor: None,
            support_description: None,
            support_email: None,
            support_url: None,
            message_language: None,
            replace_product_version_ids: None,
        }
    }
}

/// A product added to a synthesis session.
#[derive(Debug, Clone)]
pub struct CloudFormationProduct {
    path: ConstructPath,
    logical_id: String,
}

impl CloudFormationProduct {
    /// Validate `props`, resolve each version's template, and add the product
    /// resource to the session's stack. On error the session is left as it was.
    pub fn new(
        session: &mut SynthesisSession,
        id: &str,
        props: CloudFormationProductProps,
    ) -> Result<Self> {
        validate_construct_id(id)?;
        let path = session.stack_path().child(id);
        validate_props(&path, &props)?;

        let logical_id = path.child("Resource").logical_id()?;
        if session.contains_resource(&logical_id) {
            return Err(Error::DuplicateLogicalId(logical_id));
        }

        // Every fallible step happens before the first commit.
        let prepared = props
            .product_versions
            .iter()
            .map(|version| session.prepare_template(&version.template))
            .collect::<Result<Vec<_>>>()?;

        let mut artifacts = Vec::with_capacity(prepared.len());
        for (version, prepared) in props.product_versions.iter().zip(prepared) {
            let location = session.commit_template(&version.template, prepared);
            tracing::debug!(
                "{}: {} template for version {}",
                path,
                version.template.kind(),
                version.name.as_deref().unwrap_or("(unnamed)")
            );
            artifacts.push(render_version(version, session.template_url(&location)));
        }

        session.add_resource(
            logical_id.clone(),
            json!({
                "Type": RESOURCE_TYPE,
                "Properties": render_properties(&props, artifacts),
            }),
        )?;
        session.stats_mut().record_product(props.product_versions.len());

        tracing::info!(
            "Added product {} ({} version(s)) as {}",
            props.product_name,
            props.product_versions.len(),
            logical_id
        );

        Ok(Self { path, logical_id })
    }

    pub fn path(&self) -> &ConstructPath {
        &self.path
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Token resolving to the product id at deploy time.
    pub fn product_id(&self) -> Value {
        json!({ "Ref": self.logical_id })
    }
}

fn validate_props(path: &ConstructPath, props: &CloudFormationProductProps) -> Result<()> {
    validate_length(path, "product product name", 1, MAX_NAME_LENGTH, Some(props.product_name.as_str()))?;
    validate_length(path, "product owner", 1, MAX_TEXT_LENGTH, Some(props.owner.as_str()))?;
    validate_length(path, "product description", 0, MAX_TEXT_LENGTH, props.description.as_deref())?;
    validate_length(path, "product distributor", 0, MAX_TEXT_LENGTH, props.distributor.as_deref())?;
    validate_email(path, "support email", props.support_email.as_deref())?;
    validate_url(path, "support url", props.support_url.as_deref())?;
    validate_length(
        path,
        "support description",
        0,
        MAX_TEXT_LENGTH,
        props.support_description.as_deref(),
    )?;

    if props.product_versions.is_empty() {
        return Err(Error::validation(
            "product versions",
            path,
            "must contain at least 1 product version",
        ));
    }

    for version in &props.product_versions {
        validate_length(
            path,
            "provisioning artifact name",
            0,
            MAX_NAME_LENGTH,
            version.name.as_deref(),
        )?;
        validate_length(
            path,
            "provisioning artifact description",
            0,
            MAX_TEXT_LENGTH,
            version.description.as_deref(),
        )?;
        if let CloudFormationTemplate::Url(url) = &version.template {
            validate_url(path, "provisioning template url", Some(url.as_str()))?;
        }
    }

    Ok(())
}

fn render_version(version: &ProductVersion, template_url: Value) -> Value {
    let mut artifact = Map::new();
    artifact.insert(
        "DisableTemplateValidation".to_string(),
        Value::Bool(!version.validate_template),
    );
    artifact.insert(
        "Info".to_string(),
        json!({ "LoadTemplateFromURL": template_url }),
    );
    if let Some(name) = &version.name {
        artifact.insert("Name".to_string(), Value::String(name.clone()));
    }
    if let Some(description) = &version.description {
        artifact.insert("Description".to_string(), Value::String(description.clone()));
    }
    Value::Object(artifact)
}

fn render_properties(props: &CloudFormationProductProps, artifacts: Vec<Value>) -> Value {
    let mut properties = Map::new();
    properties.insert("Name".to_string(), Value::String(props.product_name.clone()));
    properties.insert("Owner".to_string(), Value::String(props.owner.clone()));
    properties.insert(
        "ProvisioningArtifactParameters".to_string(),
        Value::Array(artifacts),
    );

    let optional = [
        ("Description", props.description.as_deref()),
        ("Distributor", props.distributor.as_deref()),
        ("SupportDescription", props.support_description.as_deref()),
        ("SupportEmail", props.support_email.as_deref()),
        ("SupportUrl", props.support_url.as_deref()),
        ("AcceptLanguage", props.message_language.map(|l| l.code())),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            properties.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    if let Some(replace) = props.replace_product_version_ids {
        properties.insert("ReplaceProvisioningArtifacts".to_string(), Value::Bool(replace));
    }

    Value::Object(properties)
}
