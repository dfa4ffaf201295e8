//! Build orchestration.
//!
//! Coordinates the full site build process: registry and route table first,
//! then every page rendered and link-checked in memory, and only then the
//! write phase into a staging directory that replaces the output on success.
//!
//! The output directory may hold files the build does not own (stylesheets,
//! assets). Each build records what it generated in a manifest; files of the
//! previous output that are not in its manifest are carried into the new one.

use std::{
    collections::BTreeSet,
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use pagesmith_core::Config;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    compose::PageComposer,
    error::{BuildError, Result},
    links::{BrokenLink, LinkChecker, LinkReport, log_warnings},
    registry::{ContentRegistry, Corpus},
    robots::RobotsGenerator,
    routes::{Route, RouteOwner, RouteTable},
    sitemap::{SitemapAccumulator, SitemapEntry, SitemapGenerator},
    source::ContentSource,
    structured::StructuredData,
    writer::FileWriter,
};

/// Manifest of generated files, written at the output root.
pub const MANIFEST_FILE: &str = ".pagesmith-manifest";

/// Page served for unknown paths, written at the output root.
pub const NOT_FOUND_FILE: &str = "404.html";

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of content records.
    pub records: usize,

    /// Number of synthesized section index pages.
    pub sections: usize,

    /// Number of HTML pages written.
    pub pages: usize,

    /// Number of sitemap entries.
    pub sitemap_entries: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Outcome of a dry run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Number of content records.
    pub records: usize,

    /// Number of pages that would be written.
    pub pages: usize,

    /// Warn-severity link defects.
    pub warnings: Vec<BrokenLink>,
}

/// A page rendered in memory, ready to be written.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub route: Route,
    pub html: String,
    pub entry: SitemapEntry,
}

/// Where the content comes from.
#[derive(Debug, Clone)]
enum Input {
    Directory(PathBuf),
    Corpus(Corpus),
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    input: Input,
    output_dir: PathBuf,
    protected: Vec<PathBuf>,
}

impl Builder {
    /// Create a builder reading content from a directory.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            input: Input::Directory(content_dir.into()),
            output_dir: output_dir.into(),
            protected: Vec::new(),
        }
    }

    /// Create a builder over an in-memory corpus.
    #[must_use]
    pub fn from_corpus(config: Config, corpus: Corpus, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            input: Input::Corpus(corpus),
            output_dir: output_dir.into(),
            protected: Vec::new(),
        }
    }

    /// Refuse to build into an output directory that contains `path`.
    /// The content directory is always protected.
    #[must_use]
    pub fn protect(mut self, path: impl Into<PathBuf>) -> Self {
        self.protected.push(path.into());
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load and validate the content registry.
    pub fn registry(&self) -> Result<ContentRegistry> {
        let corpus = match &self.input {
            Input::Directory(dir) => ContentSource::new(dir).load()?,
            Input::Corpus(corpus) => corpus.clone(),
        };
        ContentRegistry::from_corpus(corpus)
    }

    /// Resolve the route table without rendering anything.
    pub fn routes(&self) -> Result<RouteTable> {
        let registry = self.registry()?;
        RouteTable::resolve(&registry, &self.config)
    }

    /// Run every check of a build without writing anything.
    pub fn check(&self) -> Result<CheckReport> {
        let registry = self.registry()?;
        let routes = RouteTable::resolve(&registry, &self.config)?;
        let (pages, warnings) = self.render(&registry, &routes)?;

        info!(
            records = registry.len(),
            pages = pages.len(),
            warnings = warnings.len(),
            "check complete"
        );

        Ok(CheckReport {
            records: registry.len(),
            pages: pages.len(),
            warnings,
        })
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            input = %self.input_label(),
            output = %self.output_dir.display(),
            "starting build"
        );

        self.check_output()?;

        // 1. Registry and route table
        let registry = self.registry()?;
        let routes = RouteTable::resolve(&registry, &self.config)?;

        // 2. Render and check every page in memory
        let (pages, _warnings) = self.render(&registry, &routes)?;
        let not_found = PageComposer::new(&self.config, &registry, &routes).compose_not_found()?;

        // 3. Write into staging, then swap into place
        let staging = sibling_dir(&self.output_dir, "staging")?;
        let written = self
            .write_staged(&staging, &pages, &not_found)
            .and_then(|count| self.swap_into_place(&staging).map(|()| count));
        let sitemap_entries = match written {
            Ok(count) => count,
            Err(e) => {
                if staging.exists() {
                    if let Err(cleanup) = fs::remove_dir_all(&staging) {
                        warn!(error = %cleanup, dir = %staging.display(), "failed to remove staging directory");
                    }
                }
                return Err(e);
            }
        };

        let stats = BuildStats {
            records: registry.len(),
            sections: routes.section_count(),
            pages: pages.len(),
            sitemap_entries,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            records = stats.records,
            sections = stats.sections,
            pages = stats.pages,
            sitemap_entries = stats.sitemap_entries,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Fail when replacing the output directory would delete the content
    /// directory or a protected path.
    fn check_output(&self) -> Result<()> {
        let output = match fs::canonicalize(&self.output_dir) {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(_) => lexical_absolute(&self.output_dir)?,
        };

        let content = match &self.input {
            Input::Directory(dir) => Some(dir),
            Input::Corpus(_) => None,
        };
        for candidate in content.into_iter().chain(&self.protected) {
            let resolved = match fs::canonicalize(candidate) {
                Ok(path) => path,
                Err(_) => lexical_absolute(candidate)?,
            };
            if resolved.starts_with(&output) {
                return Err(BuildError::OutputOverlap {
                    output: self.output_dir.clone(),
                    protected: candidate.clone(),
                });
            }
        }
        Ok(())
    }

    fn input_label(&self) -> String {
        match &self.input {
            Input::Directory(dir) => dir.display().to_string(),
            Input::Corpus(_) => "<in-memory corpus>".to_string(),
        }
    }

    /// Render every route and check its links. Fails on the first page error
    /// (in path order) or on any error-severity link defect.
    pub fn render(
        &self,
        registry: &ContentRegistry,
        routes: &RouteTable,
    ) -> Result<(Vec<RenderedPage>, Vec<BrokenLink>)> {
        let composer = PageComposer::new(&self.config, registry, routes);
        let checker = LinkChecker::new(&self.config, routes);
        let all: Vec<&Route> = routes.routes().collect();

        info!(count = all.len(), "rendering pages");

        let results: Vec<Result<(RenderedPage, LinkReport)>> = all
            .par_iter()
            .map(|route| self.render_route(route, registry, &composer, &checker))
            .collect();

        let mut pages = Vec::with_capacity(results.len());
        let mut report = checker.check_chrome();
        for result in results {
            let (page, links) = result?;
            report.merge(links);
            pages.push(page);
        }

        let (errors, warnings) = report.partition(&self.config);
        log_warnings(&warnings);
        if !errors.is_empty() {
            return Err(BuildError::DanglingLinks(errors));
        }

        Ok((pages, warnings))
    }

    fn render_route(
        &self,
        route: &Route,
        registry: &ContentRegistry,
        composer: &PageComposer<'_>,
        checker: &LinkChecker<'_>,
    ) -> Result<(RenderedPage, LinkReport)> {
        let config = &self.config;

        let (html, entry, links) = match &route.owner {
            RouteOwner::Record(id) => {
                let record = registry.get(id).ok_or_else(|| BuildError::ContentValidation {
                    family: id.family,
                    record: id.slug.clone(),
                    reason: "record missing from registry".to_string(),
                })?;
                let data = StructuredData::build(route, &record.title, &record.faqs, config);
                let html = composer.compose_record(record, route, &data)?;
                let links = checker.check_record(record, &data.trail);
                let entry = if route.path == "/" {
                    SitemapEntry::for_home(Some(record), registry, config)
                } else {
                    SitemapEntry::for_record(record, &route.path, config)
                };
                (html, entry, links)
            }
            RouteOwner::Section(family) => {
                let data = StructuredData::build(route, family.section_label(), &[], config);
                let html = composer.compose_section(*family, route, &data)?;
                let links = checker.check_trail(&route.owner.to_string(), &data.trail);
                let entry = SitemapEntry::for_section(*family, &route.path, registry, config);
                (html, entry, links)
            }
            RouteOwner::Home => {
                let data = StructuredData::build(route, &config.site.name, &[], config);
                let html = composer.compose_home(route, &data)?;
                let links = checker.check_trail(&route.owner.to_string(), &data.trail);
                let entry = SitemapEntry::for_home(None, registry, config);
                (html, entry, links)
            }
        };

        Ok((
            RenderedPage {
                route: route.clone(),
                html,
                entry,
            },
            links,
        ))
    }

    /// Write pages, the 404 page, sitemap, robots.txt and the manifest into
    /// the staging directory, then carry over files the previous build did
    /// not generate. Returns the number of sitemap entries.
    fn write_staged(&self, staging: &Path, pages: &[RenderedPage], not_found: &str) -> Result<usize> {
        if staging.exists() {
            debug!(dir = %staging.display(), "removing stale staging directory");
            fs::remove_dir_all(staging).map_err(BuildError::write(staging))?;
        }
        fs::create_dir_all(staging).map_err(BuildError::write(staging))?;

        let mut writer = FileWriter::new(staging, self.config.build.write_retries);
        if self.output_dir.is_dir() {
            writer = writer.with_baseline(&self.output_dir);
        }
        let accumulator = SitemapAccumulator::new();

        pages.par_iter().try_for_each(|page| {
            writer.write_page(&page.route, &page.html)?;
            accumulator.push(page.entry.clone());
            Ok::<_, BuildError>(())
        })?;

        let (sitemap, count) =
            SitemapGenerator::new(&self.config).emit(accumulator, &writer.ledger())?;
        writer.write_file(Path::new("sitemap.xml"), sitemap.as_bytes())?;

        if let Some(robots) = RobotsGenerator::new(&self.config).generate() {
            writer.write_file(Path::new("robots.txt"), robots.as_bytes())?;
        }
        writer.write_file(Path::new(NOT_FOUND_FILE), not_found.as_bytes())?;

        let manifest = format_manifest(&writer.files());
        writer.write_file(Path::new(MANIFEST_FILE), manifest.as_bytes())?;

        self.carry_over(staging)?;

        Ok(count)
    }

    /// Link files of the previous output that its build did not generate
    /// into staging. Anything generated by this build takes precedence.
    fn carry_over(&self, staging: &Path) -> Result<()> {
        let output = &self.output_dir;
        if !output.is_dir() {
            return Ok(());
        }

        let manifest_path = output.join(MANIFEST_FILE);
        let generated = match fs::read_to_string(&manifest_path) {
            Ok(text) => parse_manifest(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(BuildError::write(&manifest_path)(e)),
        };

        let mut carried = 0usize;
        for entry in walkdir::WalkDir::new(output).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(output.as_path()).to_path_buf();
                BuildError::Write {
                    path,
                    source: e.into(),
                }
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(output) else {
                continue;
            };
            if relative == Path::new(MANIFEST_FILE) || generated.contains(relative) {
                continue;
            }

            let target = staging.join(relative);
            if fs::symlink_metadata(&target).is_ok() {
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(BuildError::write(&target))?;
            }
            fs::hard_link(entry.path(), &target)
                .or_else(|_| fs::copy(entry.path(), &target).map(|_| ()))
                .map_err(BuildError::write(&target))?;
            carried += 1;
        }

        if carried > 0 {
            info!(files = carried, "carried over files not generated by the build");
        }
        Ok(())
    }

    /// Replace the output directory with the staging directory. The previous
    /// output is parked at `<output>.previous` until staging is in place and
    /// restored if the final rename fails.
    fn swap_into_place(&self, staging: &Path) -> Result<()> {
        let output = &self.output_dir;
        if !output.exists() {
            return fs::rename(staging, output).map_err(BuildError::write(output));
        }

        let previous = sibling_dir(output, "previous")?;
        if previous.exists() {
            debug!(dir = %previous.display(), "removing stale previous output");
            fs::remove_dir_all(&previous).map_err(BuildError::write(&previous))?;
        }
        fs::rename(output, &previous).map_err(BuildError::write(output))?;

        if let Err(e) = fs::rename(staging, output) {
            if let Err(restore) = fs::rename(&previous, output) {
                warn!(error = %restore, dir = %previous.display(), "failed to restore previous output");
            }
            return Err(BuildError::Write {
                path: output.clone(),
                source: e,
            });
        }

        if let Err(e) = fs::remove_dir_all(&previous) {
            warn!(error = %e, dir = %previous.display(), "failed to remove previous output");
        }
        Ok(())
    }
}

/// Sibling of an output directory: `<output>.<suffix>`.
pub fn sibling_dir(output: &Path, suffix: &str) -> Result<PathBuf> {
    let name = output
        .file_name()
        .ok_or_else(|| BuildError::InvalidOutput(output.to_path_buf()))?;
    let mut sibling = OsString::from(name);
    sibling.push(".");
    sibling.push(suffix);
    Ok(output.with_file_name(sibling))
}

/// One generated path per line, `/`-separated, in sorted order.
fn format_manifest(files: &BTreeSet<PathBuf>) -> String {
    let mut lines: Vec<String> = files
        .iter()
        .map(|path| {
            path.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    lines.sort();
    lines.push(String::new());
    lines.join("\n")
}

fn parse_manifest(text: &str) -> BTreeSet<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Absolute form of a path with `.` and `..` folded, for paths that cannot
/// be canonicalized.
fn lexical_absolute(path: &Path) -> Result<PathBuf> {
    let absolute =
        std::path::absolute(path).map_err(|_| BuildError::InvalidOutput(path.to_path_buf()))?;
    let mut folded = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other),
        }
    }
    Ok(folded)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use pagesmith_core::{Family, Link, RawRecord};
    use tempfile::TempDir;

    use super::*;

    fn raw(slug: &str, title: &str) -> RawRecord {
        RawRecord {
            slug: Some(slug.to_string()),
            title: Some(title.to_string()),
            meta_description: Some(format!("{title} description")),
            ..RawRecord::default()
        }
    }

    fn config() -> Config {
        Config::new("Provyx", "https://getprovyx.com")
    }

    #[test]
    fn test_sibling_dir_appends_suffix() {
        assert_eq!(
            sibling_dir(Path::new("site/public"), "staging").unwrap(),
            PathBuf::from("site/public.staging")
        );
        assert_eq!(
            sibling_dir(Path::new("public"), "previous").unwrap(),
            PathBuf::from("public.previous")
        );
        assert!(sibling_dir(Path::new("/"), "staging").is_err());
    }

    #[test]
    fn test_build_writes_pages_sitemap_and_robots() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        let corpus = Corpus::new()
            .with_collection(Family::Page, [raw("pricing", "Pricing")])
            .with_collection(Family::Resource, [raw("buyers-guide", "Buyer's Guide")]);

        let stats = Builder::from_corpus(config(), corpus, &output).build().unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.sections, 1);
        assert_eq!(stats.pages, 4);
        assert_eq!(stats.sitemap_entries, 4);
        assert!(output.join("index.html").exists());
        assert!(output.join("pricing/index.html").exists());
        assert!(output.join("resources/index.html").exists());
        assert!(output.join("resources/buyers-guide/index.html").exists());
        assert!(output.join("sitemap.xml").exists());
        assert!(output.join("robots.txt").exists());
        assert!(output.join(NOT_FOUND_FILE).exists());
        assert!(!dir.path().join("public.staging").exists());

        let manifest = fs::read_to_string(output.join(MANIFEST_FILE)).unwrap();
        assert_eq!(
            manifest,
            "404.html\nindex.html\npricing/index.html\nresources/buyers-guide/index.html\n\
             resources/index.html\nrobots.txt\nsitemap.xml\n"
        );
    }

    #[test]
    fn test_not_found_page_stays_out_of_sitemap() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        let corpus = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);

        let stats = Builder::from_corpus(config(), corpus, &output).build().unwrap();

        assert_eq!(stats.pages, 2);
        let not_found = fs::read_to_string(output.join(NOT_FOUND_FILE)).unwrap();
        assert!(not_found.contains("Page Not Found"));
        assert!(not_found.contains(r#"<meta name="robots" content="noindex">"#));
        let sitemap = fs::read_to_string(output.join("sitemap.xml")).unwrap();
        assert!(!sitemap.contains("404.html"));
    }

    #[test]
    fn test_rebuild_drops_stale_pages_and_keeps_foreign_files() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        fs::create_dir_all(output.join("css")).unwrap();
        fs::write(output.join("css/styles.css"), "body {}").unwrap();

        let first = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);
        Builder::from_corpus(config(), first, &output).build().unwrap();
        assert!(output.join("about/index.html").exists());
        assert_eq!(fs::read_to_string(output.join("css/styles.css")).unwrap(), "body {}");

        let second = Corpus::new().with_collection(Family::Page, [raw("pricing", "Pricing")]);
        Builder::from_corpus(config(), second, &output).build().unwrap();

        assert!(!output.join("about").exists());
        assert!(output.join("pricing/index.html").exists());
        assert_eq!(fs::read_to_string(output.join("css/styles.css")).unwrap(), "body {}");
        assert!(!dir.path().join("public.previous").exists());
        assert!(!dir.path().join("public.staging").exists());
    }

    #[test]
    fn test_rebuild_keeps_modification_time_of_unchanged_files() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        let corpus = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);
        Builder::from_corpus(config(), corpus.clone(), &output).build().unwrap();

        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        for file in ["robots.txt", "about/index.html"] {
            fs::File::options()
                .write(true)
                .open(output.join(file))
                .unwrap()
                .set_modified(stamp)
                .unwrap();
        }

        Builder::from_corpus(config(), corpus, &output).build().unwrap();

        for file in ["robots.txt", "about/index.html"] {
            let modified = fs::metadata(output.join(file)).unwrap().modified().unwrap();
            assert_eq!(modified, stamp, "{file} was rewritten");
        }
    }

    #[test]
    fn test_output_containing_content_is_refused() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        let content = output.join("content");
        fs::create_dir_all(content.join("pages")).unwrap();
        fs::write(
            content.join("pages/pages.toml"),
            "[[records]]\nslug = \"about\"\ntitle = \"About\"\nmeta_description = \"About us.\"\n",
        )
        .unwrap();
        fs::create_dir_all(output.join("css")).unwrap();
        fs::write(output.join("css/styles.css"), "body {}").unwrap();

        let err = Builder::new(config(), &content, &output).build().unwrap_err();

        assert!(matches!(err, BuildError::OutputOverlap { .. }), "unexpected error: {err}");
        assert!(content.join("pages/pages.toml").exists());
        assert!(output.join("css/styles.css").exists());
        assert!(!output.join("about").exists());
    }

    #[test]
    fn test_output_containing_protected_path_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("site.toml"), "[site]\n").unwrap();
        let corpus = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);

        let err = Builder::from_corpus(config(), corpus, dir.path())
            .protect(dir.path().join("site.toml"))
            .build()
            .unwrap_err();

        match err {
            BuildError::OutputOverlap { protected, .. } => {
                assert_eq!(protected, dir.path().join("site.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.path().join("site.toml").exists());
    }

    #[test]
    fn test_write_failure_names_path_and_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        // A foreign directory where the build writes robots.txt cannot be
        // carried into staging.
        fs::create_dir_all(output.join("robots.txt")).unwrap();
        fs::write(output.join("robots.txt/extra.txt"), "foreign").unwrap();
        fs::write(output.join("index.html"), "previous build").unwrap();

        let corpus = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);
        let err = Builder::from_corpus(config(), corpus, &output)
            .build()
            .unwrap_err();

        match err {
            BuildError::Write { path, .. } => assert!(
                path.ends_with("robots.txt/extra.txt"),
                "unexpected path: {}",
                path.display()
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(output.join("index.html")).unwrap(), "previous build");
        assert_eq!(
            fs::read_to_string(output.join("robots.txt/extra.txt")).unwrap(),
            "foreign"
        );
        assert!(!output.join("about").exists());
        assert!(!dir.path().join("public.staging").exists());
        assert!(!dir.path().join("public.previous").exists());
    }

    #[test]
    fn test_dangling_link_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("keep.txt"), "previous build").unwrap();

        let mut page = raw("about", "About");
        page.related_links = vec![Link::new("/missing/", "Missing")];
        let corpus = Corpus::new().with_collection(Family::Page, [page]);

        let err = Builder::from_corpus(config(), corpus, &output)
            .build()
            .unwrap_err();

        match err {
            BuildError::DanglingLinks(broken) => {
                assert_eq!(broken.len(), 1);
                assert_eq!(broken[0].source, "page:about");
                assert_eq!(broken[0].target, "/missing/");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(output.join("keep.txt").exists());
        assert!(!output.join("about").exists());
        assert!(!dir.path().join("public.staging").exists());
    }

    #[test]
    fn test_check_reports_chrome_warnings_without_writing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        let mut config = config();
        config.nav.cta_href = Some("/contact/".to_string());
        config.nav.cta_label = Some("Contact".to_string());
        let corpus = Corpus::new().with_collection(Family::Page, [raw("about", "About")]);

        let report = Builder::from_corpus(config, corpus, &output).check().unwrap();

        assert_eq!(report.records, 1);
        assert_eq!(report.pages, 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].target, "/contact/");
        assert!(!output.exists());
    }

    #[test]
    fn test_routes_reports_collisions() {
        let corpus = Corpus::new().with_collection(
            Family::Article,
            [raw("same", "First"), raw("same", "Second")],
        );
        let err = Builder::from_corpus(config(), corpus, "unused").routes().unwrap_err();
        assert!(matches!(err, BuildError::RouteCollision { .. }));
    }
}
