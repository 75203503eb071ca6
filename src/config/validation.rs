//! Configuration validation logic.
//!
//! These checks cover the shape of the file itself (names, ids, references).
//! Per-product field checks run when each product is constructed.

use std::collections::HashSet;

use crate::config::loader::{Config, TemplateSourceConfig};
use crate::error::{Error, Result};
use crate::fs::naming::validate_construct_id;
use regex::Regex;

/// Maximum CloudFormation stack name length.
const MAX_STACK_NAME_LENGTH: usize = 128;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_stack_name(&config.stack.name)?;
    validate_asset_bucket(&config.output.asset_bucket)?;

    if config.products.is_empty() {
        return Err(Error::MissingConfig(
            "products (at least one product required)".to_string(),
        ));
    }

    let mut ids = HashSet::new();
    let construct_ids = config
        .product_stacks
        .iter()
        .map(|s| &s.id)
        .chain(config.products.iter().map(|p| &p.id));

    for id in construct_ids {
        validate_construct_id(id).map_err(|e| Error::ConfigValidation {
            field: "id".to_string(),
            message: e.to_string(),
        })?;

        if !ids.insert(id.as_str()) {
            return Err(Error::ConfigValidation {
                field: "id".to_string(),
                message: format!("Construct id '{}' is used more than once", id),
            });
        }
    }

    for product in &config.products {
        for version in &product.versions {
            if let TemplateSourceConfig::ProductStack(stack_id) = &version.template {
                if config.product_stack(stack_id).is_none() {
                    return Err(Error::ConfigValidation {
                        field: format!("products.{}.versions", product.id),
                        message: format!("Unknown product stack '{}'", stack_id),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Validate the parent stack name.
pub fn validate_stack_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MissingConfig("stack.name".to_string()));
    }

    if name.len() > MAX_STACK_NAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "stack.name".to_string(),
            message: format!(
                "Stack name must be at most {} characters (got {})",
                MAX_STACK_NAME_LENGTH,
                name.len()
            ),
        });
    }

    let pattern = Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$")
        .map_err(|e| Error::Config(format!("Invalid stack name pattern: {}", e)))?;

    if !pattern.is_match(name) {
        return Err(Error::ConfigValidation {
            field: "stack.name".to_string(),
            message: format!(
                "Stack name '{}' must start with a letter and contain only alphanumeric characters and hyphens",
                name
            ),
        });
    }

    Ok(())
}

/// Validate the asset bucket name.
pub fn validate_asset_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(Error::MissingConfig("output.asset_bucket".to_string()));
    }

    let pattern = Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$")
        .map_err(|e| Error::Config(format!("Invalid bucket pattern: {}", e)))?;

    if !pattern.is_match(bucket) {
        return Err(Error::ConfigValidation {
            field: "output.asset_bucket".to_string(),
            message: format!("'{}' is not a valid S3 bucket name", bucket),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        Config::from_toml(toml).unwrap()
    }

    const VALID: &str = r#"
[[product_stacks]]
id = "ProductStack"

[[products]]
id = "MyProduct"
product_name = "testProduct"
owner = "testOwner"

[[products.versions]]
template = { product_stack = "ProductStack" }
"#;

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&config(VALID)).is_ok());
    }

    #[test]
    fn test_no_products() {
        let err = validate_config(&config("")).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));
    }

    #[test]
    fn test_unknown_product_stack_reference() {
        let toml = VALID.replace(r#"product_stack = "ProductStack" }"#, r#"product_stack = "Nope" }"#);
        let err = validate_config(&config(&toml)).unwrap_err();
        assert!(err.to_string().contains("Unknown product stack 'Nope'"));
    }

    #[test]
    fn test_duplicate_ids() {
        let toml = VALID.replace(r#"id = "MyProduct""#, r#"id = "ProductStack""#);
        let err = validate_config(&config(&toml)).unwrap_err();
        assert!(err.to_string().contains("used more than once"));
    }

    #[test]
    fn test_stack_names() {
        assert!(validate_stack_name("Stack").is_ok());
        assert!(validate_stack_name("my-stack-1").is_ok());
        assert!(validate_stack_name("").is_err());
        assert!(validate_stack_name("1stack").is_err());
        assert!(validate_stack_name("my_stack").is_err());
        assert!(validate_stack_name(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_asset_bucket_names() {
        assert!(validate_asset_bucket("catalog-synth-assets").is_ok());
        assert!(validate_asset_bucket("").is_err());
        assert!(validate_asset_bucket("Upper_Case").is_err());
    }
}
