//! Products defined outside the synthesized stack, referenced by ARN.

use regex::Regex;

use crate::error::{Error, Result};

/// An existing product referenced by ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedProduct {
    pub product_arn: String,
    pub product_id: String,
}

impl ImportedProduct {
    /// Reference an existing product, e.g.
    /// `arn:aws:catalog:region:account-id:product/prod-djh8932wr`.
    pub fn from_product_arn(arn: &str) -> Result<Self> {
        // arn:partition:service:region:account:resource
        let pattern = Regex::new(r"^arn:[^:]+:[^:]+:[^:]*:[^:]*:(.+)$")
            .map_err(|e| Error::Config(format!("Invalid ARN pattern: {}", e)))?;

        let resource = pattern
            .captures(arn)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::ConfigValidation {
                field: "product_arn".to_string(),
                message: format!("'{}' is not a valid ARN", arn),
            })?;

        let product_id = resource
            .split_once('/')
            .or_else(|| resource.split_once(':'))
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Arn(arn.to_string()))?;

        Ok(Self {
            product_arn: arn.to_string(),
            product_id: product_id.to_string(),
        })
    }
}
