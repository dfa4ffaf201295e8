//! Check command - validate configuration and content without writing

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use pagesmith_generator::Builder;

use super::{load_config, resolve_dir};

/// Run the check command.
///
/// Loads the content, resolves routes and renders every page in memory,
/// failing on anything that would fail a build. With `strict`, link
/// warnings fail the check too.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let content = resolve_dir(config_path, &config.build.content_dir);
    if !content.is_dir() {
        println!("  ⚠ Content directory {} does not exist", content.display());
    }

    println!("\nChecking content, routes and links...");
    let output = resolve_dir(config_path, &config.build.output_dir);
    let report = Builder::new(config, &content, output)
        .check()
        .wrap_err("Check failed")?;

    println!();
    println!("Summary:");
    println!("  Records:  {}", report.records);
    println!("  Pages:    {}", report.pages);
    println!("  Warnings: {}", report.warnings.len());

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ⚠ {warning}");
        }
    }

    if strict && !report.warnings.is_empty() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            report.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}
