//! Product module.
//!
//! Provides:
//! - Template sources, product stacks and product versions
//! - The CloudFormation product resource
//! - Field validation with construct-path error messages
//! - References to existing products by ARN

pub mod arn;
pub mod resource;
pub mod template;
pub mod validation;

pub use arn::ImportedProduct;
pub use resource::{CloudFormationProduct, CloudFormationProductProps, RESOURCE_TYPE};
pub use template::{CloudFormationTemplate, ProductStack, ProductVersion, ResourceSpec};
