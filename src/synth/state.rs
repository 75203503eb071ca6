//! Synthesis statistics.

use crate::product::template::CloudFormationTemplate;

/// Counters collected during one synthesis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthStats {
    pub product_count: u64,
    pub version_count: u64,

    // Template sources
    pub url_templates: u64,
    pub asset_templates: u64,
    pub product_stack_templates: u64,

    // Deduplication
    pub assets_created: u64,
    pub duplicate_count: u64,
}

impl SynthStats {
    /// Count a product and its versions.
    pub fn record_product(&mut self, versions: usize) {
        self.product_count += 1;
        self.version_count += versions as u64;
    }

    /// Count a template by source.
    pub fn record_template(&mut self, template: &CloudFormationTemplate) {
        match template {
            CloudFormationTemplate::Url(_) => self.url_templates += 1,
            CloudFormationTemplate::Asset(_) => self.asset_templates += 1,
            CloudFormationTemplate::ProductStack(_) => self.product_stack_templates += 1,
        }
    }

    /// Increment created asset count.
    pub fn increment_asset(&mut self) {
        self.assets_created += 1;
    }

    /// Increment duplicate count.
    pub fn increment_duplicate(&mut self) {
        self.duplicate_count += 1;
    }

    /// Templates that needed packaging.
    pub fn packaged_templates(&self) -> u64 {
        self.asset_templates + self.product_stack_templates
    }
}
