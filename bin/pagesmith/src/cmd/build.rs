//! Build command - generates the site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use pagesmith_generator::Builder;

use super::{load_config, resolve_dir};

/// Run the build command.
///
/// Output and content directories default to the `[build]` section of the
/// configuration, resolved next to the config file.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    content: Option<&Path>,
    site_url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?content, ?site_url, "Starting build");

    let mut config = load_config(config_path)?;

    if let Some(url) = site_url {
        tracing::info!(site_url = url, "Overriding site URL from CLI");
        config.site.url = url.to_string();
        config.validate().wrap_err("Invalid --site-url")?;
    }

    let output = match output {
        Some(dir) => dir.to_path_buf(),
        None => resolve_dir(config_path, &config.build.output_dir),
    };
    let content = match content {
        Some(dir) => dir.to_path_buf(),
        None => resolve_dir(config_path, &config.build.content_dir),
    };

    let stats = Builder::new(config, &content, &output)
        .protect(config_path)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Records:    {}", stats.records);
    println!("  Sections:   {}", stats.sections);
    println!("  Pages:      {}", stats.pages);
    println!("  Sitemap:    {} entries", stats.sitemap_entries);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
