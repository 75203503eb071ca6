//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Service Catalog product synthesizer CLI.
#[derive(Parser, Debug)]
#[command(
    name = "catalog-synth",
    version,
    about = "Synthesize AWS Service Catalog products into CloudFormation",
    long_about = "Renders Service Catalog CloudFormation products into a stack template.\n\n\
                  Provisioning templates from local files and product stacks are packaged as\n\
                  assets; identical templates are packaged once."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "catalog.toml")]
    pub config: PathBuf,

    /// Directory the cloud assembly is written to.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the parent stack.
    #[arg(short = 's', long = "stack-name", env = "CATALOG_SYNTH_STACK")]
    pub stack_name: Option<String>,

    /// Bucket that packaged assets are uploaded to.
    #[arg(long = "asset-bucket", env = "CATALOG_SYNTH_ASSET_BUCKET")]
    pub asset_bucket: Option<String>,

    /// Synthesize and report without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Hide progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(dir) = &self.output {
            config.output.directory = Some(dir.clone());
        }

        if let Some(name) = &self.stack_name {
            config.stack.name = name.clone();
        }

        if let Some(bucket) = &self.asset_bucket {
            config.output.asset_bucket = bucket.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides() {
        let args = Args::parse_from([
            "catalog-synth",
            "--output",
            "out",
            "--stack-name",
            "Catalog",
            "--asset-bucket",
            "my-assets",
        ]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.output_directory(), PathBuf::from("out"));
        assert_eq!(config.stack.name, "Catalog");
        assert_eq!(config.output.asset_bucket, "my-assets");
    }

    #[test]
    fn test_defaults_leave_config_alone() {
        let args = Args::parse_from(["catalog-synth"]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(args.config, PathBuf::from("catalog.toml"));
        assert!(!args.dry_run);
        assert_eq!(config.stack.name, "Stack");
    }
}
