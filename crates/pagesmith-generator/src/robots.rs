//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers.

use pagesmith_core::Config;
use tracing::info;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator<'a> {
    config: &'a Config,
}

impl<'a> RobotsGenerator<'a> {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Generate robots.txt, or `None` when disabled.
    #[must_use]
    pub fn generate(&self) -> Option<String> {
        if !self.config.robots.enabled {
            return None;
        }

        info!("generating robots.txt");

        let mut out = String::from("User-agent: *\n");

        for path in &self.config.robots.disallow {
            out.push_str(&format!("Disallow: {path}\n"));
        }

        for path in &self.config.robots.allow {
            out.push_str(&format!("Allow: {path}\n"));
        }

        out.push_str(&format!("\nSitemap: {}\n", self.config.url_for("sitemap.xml")));
        Some(out)
    }
}
