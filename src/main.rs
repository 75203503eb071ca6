//! catalog-synth - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use catalog_synth::{
    cli::Args,
    config::{validate_config, Config},
    error::{exit_codes, Result},
    output::{
        create_asset_bar, print_banner, print_config_summary, print_error, print_info,
        print_publish_summary, print_success, print_synth_stats, print_warning,
    },
    synth::{publish_assembly, synthesize, DirectoryPublisher},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let output_dir = config.output_directory();
    if !args.quiet {
        print_config_summary(&config);
    }

    // Synthesize
    let assembly = synthesize(&config)?;
    if !args.quiet {
        print_synth_stats(&assembly);
    }

    if args.dry_run {
        print_warning("Dry run: nothing written");
        return Ok(());
    }

    // Publish
    print_info(&format!("Writing cloud assembly to {}", output_dir.display()));
    let publisher = DirectoryPublisher::new(&output_dir)?;
    let progress = create_asset_bar(assembly.asset_count() as u64, args.quiet);

    let report = publish_assembly(&assembly, &publisher, &progress).await?;
    if !args.quiet {
        print_publish_summary(&report);
    }

    print_success(&format!(
        "Synthesized {} product(s) into {}",
        assembly.stats.product_count,
        output_dir.display()
    ));

    Ok(())
}
