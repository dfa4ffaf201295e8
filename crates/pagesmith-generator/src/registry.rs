//! Content registry.
//!
//! Normalizes the per-family collections into one ordered sequence of
//! validated [`ContentRecord`]s. Collections are concatenated in
//! [`Family::ALL`] order and each collection keeps its source order.

use std::collections::{BTreeMap, HashMap};

use pagesmith_core::{
    ContentRecord, Family, Payload, RawRecord, RecordId, content::is_valid_slug,
};
use tracing::{debug, info};

use crate::error::{BuildError, Result};

/// Raw collections keyed by family, as produced by a content source.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    collections: BTreeMap<Family, Vec<RawRecord>>,
}

impl Corpus {
    /// Create an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to a family's collection.
    pub fn extend(&mut self, family: Family, records: impl IntoIterator<Item = RawRecord>) {
        self.collections.entry(family).or_default().extend(records);
    }

    /// Builder-style variant of [`Corpus::extend`].
    #[must_use]
    pub fn with_collection(
        mut self,
        family: Family,
        records: impl IntoIterator<Item = RawRecord>,
    ) -> Self {
        self.extend(family, records);
        self
    }

    /// Records supplied for a family.
    #[must_use]
    pub fn collection(&self, family: Family) -> &[RawRecord] {
        self.collections
            .get(&family)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of raw records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The validated, ordered corpus for one build.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    records: Vec<ContentRecord>,
    index: HashMap<RecordId, usize>,
}

impl ContentRegistry {
    /// Validate and normalize every collection of the corpus.
    pub fn from_corpus(mut corpus: Corpus) -> Result<Self> {
        let mut registry = Self::default();

        for family in Family::ALL {
            let Some(raw_records) = corpus.collections.remove(&family) else {
                continue;
            };
            debug!(family = %family, count = raw_records.len(), "normalizing collection");

            for (position, raw) in raw_records.into_iter().enumerate() {
                let record = normalize(family, position, raw)?;
                registry.push(record);
            }
        }

        info!(records = registry.len(), "content registry ready");
        Ok(registry)
    }

    /// Build a registry from already validated records, keeping their order.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        let mut registry = Self::default();
        for record in records {
            registry.push(record);
        }
        registry
    }

    fn push(&mut self, record: ContentRecord) {
        // Duplicate identities are reported by the route resolver.
        self.index.entry(record.id()).or_insert(self.records.len());
        self.records.push(record);
    }

    /// All records in registry order.
    #[must_use]
    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    /// Look up a record by identity.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&ContentRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Records of one family, in registry order.
    pub fn family(&self, family: Family) -> impl Iterator<Item = &ContentRecord> {
        self.records.iter().filter(move |r| r.family == family)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Validate a single raw record and tag it with its family.
pub fn normalize(family: Family, position: usize, raw: RawRecord) -> Result<ContentRecord> {
    let slug = raw.slug.map(|s| s.trim().to_string()).unwrap_or_default();
    let label = if slug.is_empty() {
        format!("#{position}")
    } else {
        slug.clone()
    };
    let invalid = |reason: String| BuildError::ContentValidation {
        family,
        record: label.clone(),
        reason,
    };

    if slug.is_empty() {
        return Err(invalid("missing slug".to_string()));
    }
    if !is_valid_slug(&slug) {
        return Err(invalid(format!(
            "slug `{slug}` must be lowercase letters and digits joined by single hyphens"
        )));
    }

    let title = required(raw.title, "title").map_err(&invalid)?;
    let meta_description =
        required(raw.meta_description, "meta_description").map_err(&invalid)?;

    if let Some(priority) = raw.priority {
        if !(0.0..=1.0).contains(&priority) {
            return Err(invalid(format!(
                "priority {priority} must be between 0.0 and 1.0"
            )));
        }
    }

    let payload = Payload::decode(family, raw.extra).map_err(|e| invalid(e.to_string()))?;
    payload.validate().map_err(|e| invalid(e.to_string()))?;

    Ok(ContentRecord {
        family,
        slug,
        title,
        meta_description,
        body: raw.body,
        faqs: raw.faqs,
        related_links: raw.related_links,
        outbound_links: raw.outbound_links,
        last_modified: raw.last_modified,
        priority: raw.priority,
        changefreq: raw.changefreq,
        nav_section: raw.nav_section,
        payload,
    })
}

fn required(value: Option<String>, field: &str) -> std::result::Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("missing {field}")),
    }
}
