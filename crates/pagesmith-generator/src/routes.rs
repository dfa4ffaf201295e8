//! Route resolution.
//!
//! Maps every record to its canonical path and output file, synthesizes the
//! section index and home routes, and rejects any path claimed twice.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::{Path, PathBuf},
};

use pagesmith_core::{Config, ContentRecord, Family, RecordId};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    error::{BuildError, Result},
    registry::ContentRegistry,
};

/// Slug of the `Page` record that may claim the site root.
pub const HOME_SLUG: &str = "index";

/// What a route renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteOwner {
    /// A content record.
    Record(RecordId),
    /// The generated index of a family's section.
    Section(Family),
    /// The generated home page.
    Home,
}

impl fmt::Display for RouteOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(id) => write!(f, "{id}"),
            Self::Section(family) => write!(f, "section:{family}"),
            Self::Home => f.write_str("home"),
        }
    }
}

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub owner: RouteOwner,
    /// Canonical path, always starting and ending with `/`.
    pub path: String,
    /// Output file relative to the output root.
    pub output_file: PathBuf,
}

impl Route {
    /// Create a route for a path, deriving its output file.
    #[must_use]
    pub fn new(owner: RouteOwner, path: impl Into<String>) -> Self {
        let path = path.into();
        let output_file = output_file_for(&path);
        Self {
            owner,
            path,
            output_file,
        }
    }

    /// Route for a content record.
    #[must_use]
    pub fn for_record(record: &ContentRecord, config: &Config) -> Self {
        let path = record_path(config, record.family, &record.slug);
        Self::new(RouteOwner::Record(record.id()), path)
    }

    /// Family this route belongs to, if any.
    #[must_use]
    pub fn family(&self) -> Option<Family> {
        match &self.owner {
            RouteOwner::Record(id) => Some(id.family),
            RouteOwner::Section(family) => Some(*family),
            RouteOwner::Home => None,
        }
    }
}

/// Canonical path of a record: family prefix, slug, trailing slash.
#[must_use]
pub fn record_path(config: &Config, family: Family, slug: &str) -> String {
    let prefix = config.prefix_for(family);
    if family == Family::Page && slug == HOME_SLUG && prefix == "/" {
        return "/".to_string();
    }
    format!("{prefix}{slug}/")
}

/// Output file for a canonical path: the path without its leading slash,
/// followed by `index.html`.
#[must_use]
pub fn output_file_for(path: &str) -> PathBuf {
    Path::new(path.trim_matches('/')).join("index.html")
}

/// Every route of the build, with forward and reverse lookups.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    by_path: BTreeMap<String, Route>,
    by_owner: HashMap<RouteOwner, String>,
}

impl RouteTable {
    /// Resolve all routes for the registry.
    ///
    /// Record paths are computed in parallel; the uniqueness check then
    /// merges them sequentially in registry order, followed by section
    /// routes in family order and finally the home route, so the pair
    /// reported on a collision is always the same.
    pub fn resolve(registry: &ContentRegistry, config: &Config) -> Result<Self> {
        let resolved: Vec<Route> = registry
            .records()
            .par_iter()
            .map(|record| Route::for_record(record, config))
            .collect();

        let mut table = Self::default();
        for route in resolved {
            table.insert(route)?;
        }

        let mut sections = 0;
        for family in Family::ALL {
            let prefix = config.prefix_for(family);
            if prefix == "/" || registry.family(family).next().is_none() {
                continue;
            }
            table.insert(Route::new(RouteOwner::Section(family), prefix))?;
            sections += 1;
        }

        if !table.contains_path("/") {
            table.insert(Route::new(RouteOwner::Home, "/"))?;
        }

        info!(routes = table.len(), sections, "route table resolved");
        Ok(table)
    }

    /// Insert a route, failing if its path is already claimed.
    pub fn insert(&mut self, route: Route) -> Result<()> {
        if let Some(existing) = self.by_path.get(&route.path) {
            return Err(BuildError::RouteCollision {
                path: route.path.clone(),
                first: existing.owner.to_string(),
                second: route.owner.to_string(),
            });
        }

        debug!(path = %route.path, owner = %route.owner, "route");
        self.by_owner.insert(route.owner.clone(), route.path.clone());
        self.by_path.insert(route.path.clone(), route);
        Ok(())
    }

    /// Forward lookup by record identity.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&Route> {
        self.by_owner(&RouteOwner::Record(id.clone()))
    }

    /// Forward lookup by family and slug.
    #[must_use]
    pub fn lookup(&self, family: Family, slug: &str) -> Option<&Route> {
        self.get(&RecordId::new(family, slug))
    }

    /// Forward lookup by any owner.
    #[must_use]
    pub fn by_owner(&self, owner: &RouteOwner) -> Option<&Route> {
        self.by_owner
            .get(owner)
            .and_then(|path| self.by_path.get(path))
    }

    /// Section index route of a family, if one was synthesized.
    #[must_use]
    pub fn section(&self, family: Family) -> Option<&Route> {
        self.by_owner(&RouteOwner::Section(family))
    }

    /// Reverse lookup: who owns a path.
    #[must_use]
    pub fn owner(&self, path: &str) -> Option<&RouteOwner> {
        self.by_path.get(path).map(|route| &route.owner)
    }

    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// All routes ordered by path.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.by_path.values()
    }

    /// Number of synthesized section routes.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.by_owner
            .keys()
            .filter(|owner| matches!(owner, RouteOwner::Section(_)))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("Provyx", "https://getprovyx.com")
    }

    fn registry(records: Vec<ContentRecord>) -> ContentRegistry {
        ContentRegistry::from_records(records)
    }

    #[test]
    fn test_record_path_and_output_file() {
        let config = config();
        let record = ContentRecord::new(
            Family::Comparison,
            "provyx-vs-veeva-opendata",
            "Provyx vs Veeva",
            "desc",
        );

        let route = Route::for_record(&record, &config);
        assert_eq!(route.path, "/compare/provyx-vs-veeva-opendata/");
        assert_eq!(
            route.output_file,
            PathBuf::from("compare/provyx-vs-veeva-opendata/index.html")
        );
    }

    #[test]
    fn test_root_pages_and_home() {
        let config = config();
        assert_eq!(record_path(&config, Family::Page, "pricing"), "/pricing/");
        assert_eq!(record_path(&config, Family::Page, HOME_SLUG), "/");
        assert_eq!(output_file_for("/"), PathBuf::from("index.html"));
    }

    #[test]
    fn test_prefix_override() {
        let mut config = config();
        config
            .routes
            .prefixes
            .insert("article".to_string(), "/insights/".to_string());
        assert_eq!(record_path(&config, Family::Article, "post"), "/insights/post/");
    }

    #[test]
    fn test_resolve_synthesizes_sections_and_home() {
        let config = config();
        let registry = registry(vec![
            ContentRecord::new(Family::Glossary, "npi-number", "NPI Number", "d"),
            ContentRecord::new(Family::Page, "pricing", "Pricing", "d"),
        ]);

        let table = RouteTable::resolve(&registry, &config).unwrap();
        let paths: Vec<&str> = table.routes().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/", "/glossary/", "/glossary/npi-number/", "/pricing/"]
        );
        assert_eq!(table.owner("/"), Some(&RouteOwner::Home));
        assert_eq!(
            table.section(Family::Glossary).map(|r| r.path.as_str()),
            Some("/glossary/")
        );
        assert!(table.section(Family::Article).is_none());
        assert_eq!(table.section_count(), 1);
    }

    #[test]
    fn test_index_page_claims_home() {
        let config = config();
        let registry = registry(vec![ContentRecord::new(
            Family::Page,
            HOME_SLUG,
            "Provyx",
            "Home",
        )]);

        let table = RouteTable::resolve(&registry, &config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.owner("/"),
            Some(&RouteOwner::Record(RecordId::new(Family::Page, HOME_SLUG)))
        );
    }

    #[test]
    fn test_duplicate_slug_collides() {
        let config = config();
        let registry = registry(vec![
            ContentRecord::new(Family::Article, "same", "First", "d"),
            ContentRecord::new(Family::Article, "same", "Second", "d"),
        ]);

        let err = RouteTable::resolve(&registry, &config).unwrap_err();
        match err {
            BuildError::RouteCollision {
                path,
                first,
                second,
            } => {
                assert_eq!(path, "/blog/same/");
                assert_eq!(first, "article:same");
                assert_eq!(second, "article:same");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_page_colliding_with_section_is_reported() {
        let config = config();
        let registry = registry(vec![
            ContentRecord::new(Family::Page, "compare", "Compare", "d"),
            ContentRecord::new(Family::Comparison, "a-vs-b", "A vs B", "d"),
        ]);

        let err = RouteTable::resolve(&registry, &config).unwrap_err();
        match err {
            BuildError::RouteCollision {
                path,
                first,
                second,
            } => {
                assert_eq!(path, "/compare/");
                assert_eq!(first, "page:compare");
                assert_eq!(second, "section:comparison");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cross_family_collision_via_prefix_override() {
        let mut config = config();
        config
            .routes
            .prefixes
            .insert("use-case".to_string(), "/resources/".to_string());
        let registry = registry(vec![
            ContentRecord::new(Family::UseCase, "guide", "Guide", "d"),
            ContentRecord::new(Family::Resource, "guide", "Guide", "d"),
        ]);

        let err = RouteTable::resolve(&registry, &config).unwrap_err();
        assert!(err.to_string().contains("/resources/guide/"));
        assert!(err.to_string().contains("use-case:guide"));
        assert!(err.to_string().contains("resource:guide"));
    }

    #[test]
    fn test_lookup_by_family_and_slug() {
        let config = config();
        let registry = registry(vec![ContentRecord::new(
            Family::Region,
            "texas",
            "Texas",
            "d",
        )]);
        let table = RouteTable::resolve(&registry, &config).unwrap();

        let route = table.lookup(Family::Region, "texas").unwrap();
        assert_eq!(route.path, "/locations/texas/");
        assert_eq!(route.family(), Some(Family::Region));
        assert!(table.lookup(Family::Region, "ohio").is_none());
    }
}
