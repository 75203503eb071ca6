//! Build a synthesis pass from configuration.

use std::collections::HashMap;

use crate::config::{Config, ProductConfig, ProductStackConfig, TemplateSourceConfig};
use crate::error::{Error, Result};
use crate::product::{
    CloudFormationProduct, CloudFormationProductProps, CloudFormationTemplate, ProductStack,
    ProductVersion, ResourceSpec,
};
use crate::synth::assembly::CloudAssembly;
use crate::synth::session::{SessionOptions, SynthesisSession};

/// Run one synthesis pass over every product in `config`.
pub fn synthesize(config: &Config) -> Result<CloudAssembly> {
    let options = SessionOptions {
        asset_bucket: config.output.asset_bucket.clone(),
        asset_prefix: config.output.asset_prefix.clone(),
    };
    let mut session = SynthesisSession::start(&config.stack.name, options)?;

    let product_stacks = config
        .product_stacks
        .iter()
        .map(|stack| Ok::<_, Error>((stack.id.as_str(), build_product_stack(&session, stack)?)))
        .collect::<Result<HashMap<_, _>>>()?;

    for product in &config.products {
        let props = build_props(config, product, &product_stacks)?;
        CloudFormationProduct::new(&mut session, &product.id, props)?;
    }

    Ok(session.finish())
}

fn build_product_stack(
    session: &SynthesisSession,
    stack: &ProductStackConfig,
) -> Result<ProductStack> {
    let mut product_stack = ProductStack::new(session.stack_path(), &stack.id)?;
    for (id, resource) in &stack.resources {
        let mut spec = ResourceSpec::new(&resource.resource_type);
        spec.properties = resource.properties.clone();
        product_stack.add_resource(id, spec)?;
    }

    if product_stack.resource_count() == 0 {
        tracing::warn!("Product stack {} has no resources", product_stack.path());
    }

    Ok(product_stack)
}

fn build_props(
    config: &Config,
    product: &ProductConfig,
    product_stacks: &HashMap<&str, ProductStack>,
) -> Result<CloudFormationProductProps> {
    let versions = product
        .versions
        .iter()
        .map(|version| {
            let template = match &version.template {
                TemplateSourceConfig::Url(url) => CloudFormationTemplate::from_url(url.clone()),
                TemplateSourceConfig::File(path) => {
                    CloudFormationTemplate::from_asset(config.resolve_path(path))
                }
                TemplateSourceConfig::ProductStack(id) => {
                    let stack = product_stacks.get(id.as_str()).ok_or_else(|| {
                        Error::ConfigValidation {
                            field: format!("products.{}.versions", product.id),
                            message: format!("Unknown product stack '{}'", id),
                        }
                    })?;
                    CloudFormationTemplate::from_product_stack(stack.clone())
                }
            };

            Ok::<_, Error>(ProductVersion {
                template,
                name: version.name.clone(),
                description: version.description.clone(),
                validate_template: version.validate_template,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CloudFormationProductProps {
        product_name: product.product_name.clone(),
        owner: product.owner.clone(),
        product_versions: versions,
        description: product.description.clone(),
        distributor: product.distributor.clone(),
        support_description: product.support_description.clone(),
        support_email: product.support_email.clone(),
        support_url: product.support_url.clone(),
        message_language: product.message_language,
        replace_product_version_ids: product.replace_product_version_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::RESOURCE_TYPE;

    fn synth(toml: &str) -> Result<CloudAssembly> {
        synthesize(&Config::from_toml(toml).unwrap())
    }

    #[test]
    fn test_identical_product_stacks_one_asset() {
        let toml = r#"
[[product_stacks]]
id = "v1"
[product_stacks.resources.TopicProduct]
type = "AWS::SNS::Topic"

[[product_stacks]]
id = "v2"
[product_stacks.resources.TopicProduct]
type = "AWS::SNS::Topic"

[[product_stacks]]
id = "v3"
[product_stacks.resources.TopicProduct]
type = "AWS::SNS::Topic"

[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"

[[products.versions]]
name = "v1"
template = { product_stack = "v1" }

[[products.versions]]
name = "v2"
template = { product_stack = "v2" }

[[products.versions]]
name = "v3"
template = { product_stack = "v3" }
"#;
        let assembly = synth(toml).unwrap();

        assert_eq!(assembly.asset_count(), 1);
        assert_eq!(assembly.stats.product_stack_templates, 3);
        assert_eq!(assembly.stats.duplicate_count, 2);

        let (_, product) = assembly.stacks[0].resources_of_type(RESOURCE_TYPE).next().unwrap();
        let artifacts = product["Properties"]["ProvisioningArtifactParameters"]
            .as_array()
            .unwrap();
        assert_eq!(artifacts.len(), 3);
        assert!(artifacts
            .windows(2)
            .all(|w| w[0]["Info"]["LoadTemplateFromURL"] == w[1]["Info"]["LoadTemplateFromURL"]));
    }

    #[test]
    fn test_one_field_difference_two_assets() {
        let toml = r#"
[[product_stacks]]
id = "ProductStackV1"
[product_stacks.resources.SNSTopicProductStack]
type = "AWS::SNS::Topic"

[[product_stacks]]
id = "ProductStackV2"
[product_stacks.resources.SNSTopicProductStack]
type = "AWS::SNS::Topic"
properties = { DisplayName = "a test" }

[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"

[[products.versions]]
template = { product_stack = "ProductStackV1" }

[[products.versions]]
template = { product_stack = "ProductStackV2" }
"#;
        let assembly = synth(toml).unwrap();
        let assets = assembly.stacks[0].assets();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].path, "StackProductStackV111F65963.product.template.json");
        assert_eq!(assets[1].path, "StackProductStackV24832700A.product.template.json");
    }

    #[test]
    fn test_relative_asset_path_resolves_against_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(
            dir.path().join("templates/product1.template.json"),
            br#"{"Resources":{}}"#,
        )
        .unwrap();

        let config_path = dir.path().join("catalog.toml");
        std::fs::write(
            &config_path,
            r#"
[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"

[[products.versions]]
template = { file = "templates/product1.template.json" }
"#,
        )
        .unwrap();

        let assembly = synthesize(&Config::load(&config_path).unwrap()).unwrap();
        assert_eq!(assembly.asset_count(), 1);
        assert_eq!(assembly.stats.asset_templates, 1);
    }

    #[test]
    fn test_validation_error_surfaces() {
        let toml = r#"
[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"
"#;
        let err = synth(toml).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Invalid product versions for resource Stack/MyProduct"));
    }

    #[test]
    fn test_unknown_product_stack() {
        let toml = r#"
[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"

[[products.versions]]
template = { product_stack = "Missing" }
"#;
        assert!(matches!(synth(toml), Err(Error::ConfigValidation { .. })));
    }
}
