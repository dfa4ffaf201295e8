//! Link integrity checking.
//!
//! Every internal reference a page emits must resolve to a route in the
//! route table. Outbound links are never resolved.

use std::fmt;

use pagesmith_core::{Config, ContentRecord, Severity};
use tracing::warn;

use crate::{
    routes::{RouteTable, record_path},
    structured::Crumb,
};

/// Kind of reference a link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkCategory {
    /// A record's related links.
    Related,
    /// A breadcrumb segment.
    Breadcrumb,
    /// A family-specific reference by identity (glossary term, parent region).
    Category,
    /// Navigation, footer or call-to-action target.
    Chrome,
}

impl LinkCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Breadcrumb => "breadcrumb",
            Self::Category => "category",
            Self::Chrome => "chrome",
        }
    }

    /// Configured severity for this category.
    #[must_use]
    pub fn severity(&self, config: &Config) -> Severity {
        match self {
            Self::Related => config.links.related,
            Self::Breadcrumb => config.links.breadcrumb,
            Self::Category => config.links.category,
            Self::Chrome => config.links.chrome,
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An internal reference whose target has no route.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BrokenLink {
    /// The page (or `chrome`) that emits the link.
    pub source: String,
    pub category: LinkCategory,
    pub target: String,
}

impl BrokenLink {
    pub fn new(source: impl Into<String>, category: LinkCategory, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            category,
            target: target.into(),
        }
    }
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.category)
    }
}

/// Result of checking one or more pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub broken: Vec<BrokenLink>,
}

impl LinkReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.broken.is_empty()
    }

    /// Append another report.
    pub fn merge(&mut self, other: LinkReport) {
        self.broken.extend(other.broken);
    }

    /// Split into error-severity and warn-severity defects, each sorted.
    #[must_use]
    pub fn partition(mut self, config: &Config) -> (Vec<BrokenLink>, Vec<BrokenLink>) {
        self.broken.sort();
        self.broken.dedup();
        self.broken
            .into_iter()
            .filter(|link| link.category.severity(config) != Severity::Ignore)
            .partition(|link| link.category.severity(config) == Severity::Error)
    }
}

/// Checks internal references against a route table.
#[derive(Debug)]
pub struct LinkChecker<'a> {
    config: &'a Config,
    routes: &'a RouteTable,
}

impl<'a> LinkChecker<'a> {
    #[must_use]
    pub fn new(config: &'a Config, routes: &'a RouteTable) -> Self {
        Self { config, routes }
    }

    /// Reduce a link target to an internal path, or `None` when the target
    /// is outbound, non-HTTP, or a static asset.
    #[must_use]
    pub fn internal_path(&self, target: &str) -> Option<String> {
        let target = target.trim();
        let base = self.config.base_url();

        let local = if let Some(rest) = target.strip_prefix(base) {
            if rest.is_empty() {
                "/"
            } else if rest.starts_with('/') {
                rest
            } else {
                // Same host prefix, different host (e.g. `https://example.com.evil`).
                return None;
            }
        } else if target.starts_with('/') && !target.starts_with("//") {
            target
        } else {
            return None;
        };

        let path = local
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");

        if self
            .config
            .links
            .ignore_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return None;
        }

        Some(path.to_string())
    }

    /// Whether an internal path resolves to a page or a generated file.
    #[must_use]
    pub fn resolves(&self, path: &str) -> bool {
        if self.routes.contains_path(path) {
            return true;
        }
        if !path.ends_with('/') && self.routes.contains_path(&format!("{path}/")) {
            return true;
        }
        path == "/sitemap.xml" || (path == "/robots.txt" && self.config.robots.enabled)
    }

    fn check_target(
        &self,
        report: &mut LinkReport,
        source: &str,
        category: LinkCategory,
        target: &str,
    ) {
        match self.internal_path(target) {
            Some(path) if !self.resolves(&path) => {
                report
                    .broken
                    .push(BrokenLink::new(source, category, target));
            }
            _ => {}
        }
    }

    fn enabled(&self, category: LinkCategory) -> bool {
        category.severity(self.config) != Severity::Ignore
    }

    /// Check a breadcrumb trail emitted by `source`.
    #[must_use]
    pub fn check_trail(&self, source: &str, trail: &[Crumb]) -> LinkReport {
        let mut report = LinkReport::default();
        if self.enabled(LinkCategory::Breadcrumb) {
            for crumb in trail {
                self.check_target(&mut report, source, LinkCategory::Breadcrumb, &crumb.path);
            }
        }
        report
    }

    /// Check every internal reference a record page emits.
    #[must_use]
    pub fn check_record(&self, record: &ContentRecord, trail: &[Crumb]) -> LinkReport {
        let source = record.id().to_string();
        let mut report = self.check_trail(&source, trail);

        if self.enabled(LinkCategory::Related) {
            for link in &record.related_links {
                self.check_target(&mut report, &source, LinkCategory::Related, &link.url);
            }
        }

        if self.enabled(LinkCategory::Category) {
            for id in record.payload.category_links() {
                if self.routes.get(&id).is_none() {
                    report.broken.push(BrokenLink::new(
                        source.clone(),
                        LinkCategory::Category,
                        record_path(self.config, id.family, &id.slug),
                    ));
                }
            }
        }

        report
    }

    /// Check navigation, footer and call-to-action targets.
    #[must_use]
    pub fn check_chrome(&self) -> LinkReport {
        let mut report = LinkReport::default();
        if !self.enabled(LinkCategory::Chrome) {
            return report;
        }

        let nav = &self.config.nav;
        let targets = nav
            .items
            .iter()
            .flat_map(|item| {
                std::iter::once(item.href.as_str())
                    .chain(item.children.iter().map(|c| c.href.as_str()))
            })
            .chain(nav.cta_href.as_deref())
            .chain(
                self.config
                    .footer
                    .columns
                    .iter()
                    .flat_map(|col| col.links.iter().map(|l| l.href.as_str())),
            );

        for target in targets {
            self.check_target(&mut report, "chrome", LinkCategory::Chrome, target);
        }
        report
    }
}

/// Log warn-severity defects.
pub fn log_warnings(warnings: &[BrokenLink]) {
    for link in warnings {
        warn!(
            source = %link.source,
            target = %link.target,
            category = %link.category,
            "unresolved internal link"
        );
    }
}
