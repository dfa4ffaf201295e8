//! Site configuration management.
//!
//! The configuration is read once at build start and then passed by
//! reference to every stage that needs it.

use std::{collections::BTreeMap, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    content::Family,
    error::{CoreError, Result},
};

/// Main configuration structure for Pagesmith.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Header navigation.
    #[serde(default)]
    pub nav: NavConfig,

    /// Footer link columns.
    #[serde(default)]
    pub footer: FooterConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Route prefix overrides.
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Link integrity policy.
    #[serde(default)]
    pub links: LinksConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name, appended to every page title.
    pub name: String,

    /// Absolute site URL (e.g., "https://example.com").
    pub url: String,

    /// Short tagline shown in the footer.
    #[serde(default)]
    pub tagline: Option<String>,

    /// Year printed in the copyright line.
    #[serde(default)]
    pub copyright_year: Option<String>,

    /// Document language.
    #[serde(default = "default_language")]
    pub language: String,

    /// Cache-busting suffix for the stylesheet link.
    #[serde(default = "default_css_version")]
    pub css_version: String,

    /// Social preview image path or URL.
    #[serde(default)]
    pub og_image: Option<String>,
}

/// Header navigation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavConfig {
    /// Top-level navigation items.
    #[serde(default)]
    pub items: Vec<NavItem>,

    /// Call-to-action button target.
    #[serde(default)]
    pub cta_href: Option<String>,

    /// Call-to-action button label.
    #[serde(default)]
    pub cta_label: Option<String>,

    /// Heading of the call-to-action section above the footer.
    #[serde(default)]
    pub cta_heading: Option<String>,

    /// Text under the call-to-action heading.
    #[serde(default)]
    pub cta_text: Option<String>,
}

/// A top-level navigation item, optionally with a dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub href: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<NavLink>,
}

/// A plain navigation link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

/// Footer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Link columns, rendered in order.
    #[serde(default)]
    pub columns: Vec<FooterColumn>,
}

/// A titled column of footer links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterColumn {
    pub heading: String,
    #[serde(default)]
    pub links: Vec<NavLink>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding one sub-directory per content family.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Extra attempts for transient write failures.
    #[serde(default = "default_write_retries")]
    pub write_retries: u32,

    /// Fallback last-modified date for records without one of their own.
    #[serde(default)]
    pub last_modified: Option<NaiveDate>,
}

/// Route prefix overrides keyed by family key (e.g. `article = "/posts/"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
}

/// How a class of link defect is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fail the build.
    Error,
    /// Log and continue.
    Warn,
    /// Do not check.
    Ignore,
}

/// Link integrity policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Related links declared by records.
    #[serde(default = "severity_error")]
    pub related: Severity,

    /// Breadcrumb segments.
    #[serde(default = "severity_error")]
    pub breadcrumb: Severity,

    /// Family-specific links by identity (glossary terms, parent regions).
    #[serde(default = "severity_error")]
    pub category: Severity,

    /// Navigation, footer and call-to-action targets.
    #[serde(default = "severity_warn")]
    pub chrome: Severity,

    /// Internal prefixes that are static files rather than pages.
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt is written.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub disallow: Vec<String>,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_css_version() -> String {
    "1".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_write_retries() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn severity_error() -> Severity {
    Severity::Error
}

fn severity_warn() -> Severity {
    Severity::Warn
}

fn default_ignore_prefixes() -> Vec<String> {
    vec!["/assets/".to_string(), "/css/".to_string(), "/js/".to_string()]
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            write_retries: default_write_retries(),
            last_modified: None,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            related: Severity::Error,
            breadcrumb: Severity::Error,
            category: Severity::Error,
            chrome: Severity::Warn,
            ignore_prefixes: default_ignore_prefixes(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }
}

impl Config {
    /// Minimal configuration with only the site identity set.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                name: name.into(),
                url: url.into(),
                tagline: None,
                copyright_year: None,
                language: default_language(),
                css_version: default_css_version(),
                og_image: None,
            },
            nav: NavConfig::default(),
            footer: FooterConfig::default(),
            build: BuildConfig::default(),
            routes: RoutesConfig::default(),
            links: LinksConfig::default(),
            robots: RobotsConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `PAGESMITH__*`
    /// environment variables over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("PAGESMITH").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.name.trim().is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }

        if !self.site.url.starts_with("http://") && !self.site.url.starts_with("https://") {
            return Err(CoreError::config(
                "site.url must start with http:// or https://",
            ));
        }

        if self.site.url.ends_with('/') {
            tracing::warn!("site.url should not have a trailing slash");
        }

        for (key, prefix) in &self.routes.prefixes {
            if Family::from_key(key).is_none() {
                return Err(CoreError::config(format!(
                    "routes.prefixes: unknown family `{key}`"
                )));
            }
            if !prefix.starts_with('/') || !prefix.ends_with('/') {
                return Err(CoreError::config(format!(
                    "routes.prefixes.{key} must start and end with `/` (got `{prefix}`)"
                )));
            }
        }

        Ok(())
    }

    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url())
    }

    /// Route prefix for a family, honoring overrides.
    pub fn prefix_for(&self, family: Family) -> &str {
        self.routes
            .prefixes
            .get(family.key())
            .map(String::as_str)
            .unwrap_or_else(|| family.default_prefix())
    }

    /// Title shown in `<title>`: `"{title} | {site}"`, or just the site name
    /// when the page title is the site name.
    pub fn full_title(&self, title: &str) -> String {
        if title == self.site.name {
            title.to_string()
        } else {
            format!("{title} | {}", self.site.name)
        }
    }
}
