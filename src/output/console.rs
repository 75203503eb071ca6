//! Console output for the synth CLI.

use console::style;

use crate::config::Config;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("DONE").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    println!(
        "{} {}",
        style("catalog-synth").cyan().bold(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!(
        "{}",
        style("Service Catalog products to CloudFormation").dim()
    );
}

/// Print what is about to be synthesized.
pub fn print_config_summary(config: &Config) {
    println!();
    println!("{}", style("Synthesis plan:").bold());
    println!("  Stack:          {}", style(&config.stack.name).green());
    println!("  Asset bucket:   {}", config.output.asset_bucket);
    println!("  Product stacks: {}", config.product_stacks.len());
    for product in &config.products {
        println!(
            "  {} {} ({} version(s))",
            style("-").dim(),
            product.id,
            product.versions.len()
        );
    }
    println!("  Output:         {}", config.output_directory().display());
    println!();
}
