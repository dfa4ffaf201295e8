//! Sitemap generation.
//!
//! Entries are accumulated while pages are written, then verified against
//! the writer ledger and emitted as a single `sitemap.xml`.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, PoisonError},
};

use chrono::NaiveDate;
use pagesmith_core::{ChangeFreq, Config, ContentRecord, Family};
use tracing::{debug, info};

use crate::{
    error::{BuildError, Result},
    registry::ContentRegistry,
};

/// Priority of section index pages.
pub const SECTION_PRIORITY: f32 = 0.8;

/// Priority of the home page.
pub const HOME_PRIORITY: f32 = 1.0;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Canonical path.
    pub path: String,

    /// Last modification date.
    pub lastmod: Option<NaiveDate>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

impl SitemapEntry {
    /// Entry for a record page.
    #[must_use]
    pub fn for_record(record: &ContentRecord, path: &str, config: &Config) -> Self {
        Self {
            path: path.to_string(),
            lastmod: record.content_date().or(config.build.last_modified),
            changefreq: record.changefreq(),
            priority: record.priority(),
        }
    }

    /// Entry for a section index: newest date among the family's records.
    #[must_use]
    pub fn for_section(
        family: Family,
        path: &str,
        registry: &ContentRegistry,
        config: &Config,
    ) -> Self {
        Self {
            path: path.to_string(),
            lastmod: newest(registry.family(family), config),
            changefreq: ChangeFreq::Weekly,
            priority: SECTION_PRIORITY,
        }
    }

    /// Entry for the home page: newest date across the whole corpus.
    ///
    /// Used for the synthesized home route and for a page record mounted at
    /// the root; an explicit record override still wins.
    #[must_use]
    pub fn for_home(
        record: Option<&ContentRecord>,
        registry: &ContentRegistry,
        config: &Config,
    ) -> Self {
        Self {
            path: "/".to_string(),
            lastmod: newest(registry.records().iter(), config),
            changefreq: record
                .and_then(|r| r.changefreq)
                .unwrap_or(ChangeFreq::Weekly),
            priority: record
                .and_then(|r| r.priority)
                .filter(|p| p.is_finite())
                .unwrap_or(HOME_PRIORITY)
                .clamp(0.0, 1.0),
        }
    }
}

fn newest<'r>(
    records: impl Iterator<Item = &'r ContentRecord>,
    config: &Config,
) -> Option<NaiveDate> {
    records
        .filter_map(|r| r.content_date())
        .max()
        .or(config.build.last_modified)
}

/// Append-only collection of entries, shared across writer threads.
#[derive(Debug, Default)]
pub struct SitemapAccumulator {
    entries: Mutex<Vec<SitemapEntry>>,
}

impl SitemapAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry for a successfully written page.
    pub fn push(&self, entry: SitemapEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the accumulated entries, sorted by path.
    #[must_use]
    pub fn into_sorted(self) -> Vec<SitemapEntry> {
        let mut entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

/// Check that the entries name every written path exactly once and nothing
/// else.
pub fn verify(entries: &[SitemapEntry], ledger: &BTreeSet<String>) -> Result<()> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.path.as_str()).or_default() += 1;
    }

    let duplicates: Vec<String> = counts
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|(path, _)| (*path).to_string())
        .collect();
    let missing_from_sitemap: Vec<String> = ledger
        .iter()
        .filter(|path| !counts.contains_key(path.as_str()))
        .cloned()
        .collect();
    let missing_from_disk: Vec<String> = counts
        .keys()
        .filter(|path| !ledger.contains(**path))
        .map(|path| (*path).to_string())
        .collect();

    if duplicates.is_empty() && missing_from_sitemap.is_empty() && missing_from_disk.is_empty() {
        return Ok(());
    }

    Err(BuildError::SitemapMismatch {
        missing_from_sitemap,
        missing_from_disk,
        duplicates,
    })
}

/// Sitemap XML emitter.
#[derive(Debug)]
pub struct SitemapGenerator<'a> {
    config: &'a Config,
}

impl<'a> SitemapGenerator<'a> {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Sort, verify against the ledger, and render.
    pub fn emit(
        &self,
        accumulator: SitemapAccumulator,
        ledger: &BTreeSet<String>,
    ) -> Result<(String, usize)> {
        let entries = accumulator.into_sorted();
        verify(&entries, ledger)?;
        info!(count = entries.len(), "generating sitemap");
        Ok((self.generate(&entries), entries.len()))
    }

    /// Generate sitemap XML from entries, in the given order.
    #[must_use]
    pub fn generate(&self, entries: &[SitemapEntry]) -> String {
        debug!(count = entries.len(), "rendering sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in entries {
            xml.push_str(&self.entry_to_xml(entry));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Convert an entry to XML.
    fn entry_to_xml(&self, entry: &SitemapEntry) -> String {
        let mut xml = String::from("  <url>\n");

        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&self.config.url_for(&entry.path))
        ));

        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }

        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));

        xml.push_str("  </url>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
