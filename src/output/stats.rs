//! Statistics reporting.

use console::style;

use crate::synth::{CloudAssembly, PublishReport};

/// Print statistics for a synthesis pass.
pub fn print_synth_stats(assembly: &CloudAssembly) {
    let stats = &assembly.stats;

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Synthesis {}:", assembly.session_id)).bold()
    );
    println!("  Products:        {}", stats.product_count);
    println!("  Versions:        {}", stats.version_count);
    println!("  URL templates:   {}", stats.url_templates);
    println!("  Local templates: {}", stats.asset_templates);
    println!("  Product stacks:  {}", stats.product_stack_templates);
    println!("  Assets:          {}", style(stats.assets_created).green());
    if stats.duplicate_count > 0 {
        println!(
            "  Deduplicated:    {} (identical templates)",
            style(stats.duplicate_count).yellow()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print a summary line for a publish run.
pub fn print_publish_summary(report: &PublishReport) {
    println!(
        "Published: {} written, {} unchanged",
        style(report.written).green(),
        style(report.unchanged).yellow()
    );
}
