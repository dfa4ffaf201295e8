//! Content types and structures.
//!
//! Every page the pipeline emits originates from a [`ContentRecord`]: a set of
//! fields shared by all page families plus a family-specific [`Payload`] that
//! is carried through to the page composer untouched.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Page family a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Blog articles.
    Article,
    /// Head-to-head comparison pages.
    Comparison,
    /// "Alternative to X" pages.
    Alternative,
    /// Glossary terms.
    Glossary,
    /// Location/region pages.
    Region,
    /// Use-case pages.
    UseCase,
    /// Guides and downloadable resources.
    Resource,
    /// Standalone pages mounted at the site root.
    Page,
}

impl Family {
    /// Every family, in registry order.
    pub const ALL: [Family; 8] = [
        Family::Article,
        Family::Comparison,
        Family::Alternative,
        Family::Glossary,
        Family::Region,
        Family::UseCase,
        Family::Resource,
        Family::Page,
    ];

    /// Stable key used in configuration and diagnostics.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Comparison => "comparison",
            Self::Alternative => "alternative",
            Self::Glossary => "glossary",
            Self::Region => "region",
            Self::UseCase => "use-case",
            Self::Resource => "resource",
            Self::Page => "page",
        }
    }

    /// Parse a family from its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Default URL prefix for the family's routes.
    pub fn default_prefix(&self) -> &'static str {
        match self {
            Self::Article => "/blog/",
            Self::Comparison => "/compare/",
            Self::Alternative => "/alternatives/",
            Self::Glossary => "/glossary/",
            Self::Region => "/locations/",
            Self::UseCase => "/use-cases/",
            Self::Resource => "/resources/",
            Self::Page => "/",
        }
    }

    /// Human-readable label for the family's section (breadcrumbs, index pages).
    pub fn section_label(&self) -> &'static str {
        match self {
            Self::Article => "Blog",
            Self::Comparison => "Compare",
            Self::Alternative => "Alternatives",
            Self::Glossary => "Glossary",
            Self::Region => "Locations",
            Self::UseCase => "Use Cases",
            Self::Resource => "Resources",
            Self::Page => "Pages",
        }
    }

    /// Directory (under the content root) holding this family's collection.
    pub fn content_dir(&self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Comparison => "comparisons",
            Self::Alternative => "alternatives",
            Self::Glossary => "glossary",
            Self::Region => "regions",
            Self::UseCase => "use-cases",
            Self::Resource => "resources",
            Self::Page => "pages",
        }
    }

    /// Default sitemap priority for records of this family.
    pub fn default_priority(&self) -> f32 {
        match self {
            Self::Comparison | Self::Alternative | Self::UseCase => 0.7,
            Self::Article | Self::Region | Self::Resource => 0.6,
            Self::Glossary => 0.5,
            Self::Page => 0.8,
        }
    }

    /// Default sitemap change frequency for records of this family.
    pub fn default_changefreq(&self) -> ChangeFreq {
        ChangeFreq::Monthly
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Change frequency hint for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Sitemap protocol spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// Identity of a record: its family plus its slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub family: Family,
    pub slug: String,
}

impl RecordId {
    pub fn new(family: Family, slug: impl Into<String>) -> Self {
        Self {
            family,
            slug: slug.into(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.slug)
    }
}

/// A link target with a visible label.
///
/// Accepts either a `{ url, label }` table (with `text` as an alias for
/// `label`) or a two-element `[url, label]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LinkRepr")]
pub struct Link {
    pub url: String,
    pub label: String,
}

impl Link {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Pair(String, String),
    Table {
        url: String,
        #[serde(alias = "text")]
        label: String,
    },
}

impl From<LinkRepr> for Link {
    fn from(repr: LinkRepr) -> Self {
        match repr {
            LinkRepr::Pair(url, label) | LinkRepr::Table { url, label } => Self { url, label },
        }
    }
}

/// A question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A record as supplied by a content source, before validation.
///
/// Required fields are optional here so that the registry can report which
/// one is missing instead of failing inside the deserializer. Unrecognized
/// keys are kept in `extra` and decoded into the family payload later.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default, alias = "page_title")]
    pub title: Option<String>,

    #[serde(default, alias = "description")]
    pub meta_description: Option<String>,

    #[serde(default, alias = "body_fragments")]
    pub body: Vec<String>,

    #[serde(default)]
    pub faqs: Vec<Faq>,

    #[serde(default)]
    pub related_links: Vec<Link>,

    #[serde(default)]
    pub outbound_links: Vec<Link>,

    /// Content-derived modification date (quoted `YYYY-MM-DD`).
    #[serde(default)]
    pub last_modified: Option<NaiveDate>,

    #[serde(default)]
    pub priority: Option<f32>,

    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,

    /// Overrides the navigation item highlighted on this page.
    #[serde(default)]
    pub nav_section: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated content record.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    pub family: Family,
    pub slug: String,
    pub title: String,
    pub meta_description: String,
    /// Pre-rendered HTML fragments, composed verbatim in order.
    pub body: Vec<String>,
    pub faqs: Vec<Faq>,
    pub related_links: Vec<Link>,
    pub outbound_links: Vec<Link>,
    pub last_modified: Option<NaiveDate>,
    pub priority: Option<f32>,
    pub changefreq: Option<ChangeFreq>,
    pub nav_section: Option<String>,
    pub payload: Payload,
}

impl ContentRecord {
    /// Create a record with the required fields and an empty payload of the
    /// family's kind.
    pub fn new(
        family: Family,
        slug: impl Into<String>,
        title: impl Into<String>,
        meta_description: impl Into<String>,
    ) -> Self {
        Self {
            family,
            slug: slug.into(),
            title: title.into(),
            meta_description: meta_description.into(),
            body: Vec::new(),
            faqs: Vec::new(),
            related_links: Vec::new(),
            outbound_links: Vec::new(),
            last_modified: None,
            priority: None,
            changefreq: None,
            nav_section: None,
            payload: Payload::empty(family),
        }
    }

    pub fn id(&self) -> RecordId {
        RecordId::new(self.family, self.slug.clone())
    }

    /// Modification date derived from the record's own content.
    pub fn content_date(&self) -> Option<NaiveDate> {
        self.last_modified.or_else(|| self.payload.content_date())
    }

    pub fn priority(&self) -> f32 {
        self.priority
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| self.family.default_priority())
            .clamp(0.0, 1.0)
    }

    pub fn changefreq(&self) -> ChangeFreq {
        self.changefreq
            .unwrap_or_else(|| self.family.default_changefreq())
    }
}

/// Article byline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default, alias = "linkedin")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleData {
    #[serde(default, alias = "date_published")]
    pub published: Option<NaiveDate>,
    #[serde(default, alias = "date_modified")]
    pub modified: Option<NaiveDate>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
}

/// One row of a side-by-side comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowRepr")]
pub struct ComparisonRow {
    pub feature: String,
    pub competitor: String,
    pub ours: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowRepr {
    Triple(String, String, String),
    Table {
        feature: String,
        competitor: String,
        ours: String,
    },
}

impl From<RowRepr> for ComparisonRow {
    fn from(repr: RowRepr) -> Self {
        match repr {
            RowRepr::Triple(feature, competitor, ours)
            | RowRepr::Table {
                feature,
                competitor,
                ours,
            } => Self {
                feature,
                competitor,
                ours,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonData {
    #[serde(default, alias = "competitor_name")]
    pub competitor: String,
    #[serde(default, alias = "comparison_table_rows")]
    pub table: Vec<ComparisonRow>,
    #[serde(default)]
    pub verdict: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeData {
    #[serde(default)]
    pub competitor: String,
    #[serde(default)]
    pub competitor_url: Option<String>,
    #[serde(default, alias = "comparison_rows")]
    pub table: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryData {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub short_definition: String,
    /// Slugs of other glossary terms.
    #[serde(default)]
    pub related_terms: Vec<String>,
}

/// A headline figure shown on region pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionData {
    #[serde(default)]
    pub region: String,
    /// Slug of the enclosing region page, if any.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseData {
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default, alias = "use_cases")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Family-specific data carried through to the page composer.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Article(ArticleData),
    Comparison(ComparisonData),
    Alternative(AlternativeData),
    Glossary(GlossaryData),
    Region(RegionData),
    UseCase(UseCaseData),
    Resource(ResourceData),
    Page,
}

impl Payload {
    /// An empty payload of the given family's kind.
    pub fn empty(family: Family) -> Self {
        match family {
            Family::Article => Self::Article(ArticleData::default()),
            Family::Comparison => Self::Comparison(ComparisonData::default()),
            Family::Alternative => Self::Alternative(AlternativeData::default()),
            Family::Glossary => Self::Glossary(GlossaryData::default()),
            Family::Region => Self::Region(RegionData::default()),
            Family::UseCase => Self::UseCase(UseCaseData::default()),
            Family::Resource => Self::Resource(ResourceData::default()),
            Family::Page => Self::Page,
        }
    }

    /// Decode the family payload from the record's extra fields.
    ///
    /// Unknown keys are ignored; only type mismatches on known keys fail.
    pub fn decode(family: Family, extra: Map<String, Value>) -> Result<Self> {
        let value = Value::Object(extra);
        let payload = match family {
            Family::Article => Self::Article(serde_json::from_value(value)?),
            Family::Comparison => Self::Comparison(serde_json::from_value(value)?),
            Family::Alternative => Self::Alternative(serde_json::from_value(value)?),
            Family::Glossary => Self::Glossary(serde_json::from_value(value)?),
            Family::Region => Self::Region(serde_json::from_value(value)?),
            Family::UseCase => Self::UseCase(serde_json::from_value(value)?),
            Family::Resource => Self::Resource(serde_json::from_value(value)?),
            Family::Page => Self::Page,
        };
        Ok(payload)
    }

    /// Family the payload belongs to.
    pub fn family(&self) -> Family {
        match self {
            Self::Article(_) => Family::Article,
            Self::Comparison(_) => Family::Comparison,
            Self::Alternative(_) => Family::Alternative,
            Self::Glossary(_) => Family::Glossary,
            Self::Region(_) => Family::Region,
            Self::UseCase(_) => Family::UseCase,
            Self::Resource(_) => Family::Resource,
            Self::Page => Family::Page,
        }
    }

    /// Records this payload links to by identity rather than by URL.
    pub fn category_links(&self) -> Vec<RecordId> {
        match self {
            Self::Glossary(data) => data
                .related_terms
                .iter()
                .map(|slug| RecordId::new(Family::Glossary, slug.clone()))
                .collect(),
            Self::Region(data) => data
                .parent
                .iter()
                .map(|slug| RecordId::new(Family::Region, slug.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Modification date carried by the payload itself.
    pub fn content_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Article(data) => data.modified.or(data.published),
            _ => None,
        }
    }

    /// Check the payload's required fields.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Comparison(data) if data.competitor.trim().is_empty() => {
                Err(CoreError::payload("comparison is missing `competitor`"))
            }
            Self::Alternative(data) if data.competitor.trim().is_empty() => {
                Err(CoreError::payload("alternative is missing `competitor`"))
            }
            Self::Glossary(data) if data.term.trim().is_empty() => {
                Err(CoreError::payload("glossary term is missing `term`"))
            }
            Self::Region(data) if data.region.trim().is_empty() => {
                Err(CoreError::payload("region page is missing `region`"))
            }
            _ => Ok(()),
        }
    }
}

/// Whether a slug is lowercase ASCII words joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}
