//! Page composition.
//!
//! Turns a record (or a synthesized section/home route) plus its structured
//! data into a complete HTML document. Text taken from records and
//! configuration is escaped; body fragments are inserted verbatim.

use pagesmith_core::{
    Config, ContentRecord, Family, Link, Payload,
    content::{ArticleData, ComparisonRow},
};
use tracing::debug;

use crate::{
    error::Result,
    registry::ContentRegistry,
    routes::{Route, RouteTable, record_path},
    structured::{Crumb, StructuredData},
    template::{TemplateContext, TemplateRegistry},
};

/// Site chrome shared by every page: header navigation and footer.
#[derive(Debug, Clone, Copy)]
pub struct Chrome<'a> {
    config: &'a Config,
}

impl<'a> Chrome<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Header with desktop and mobile navigation. The item whose target (or
    /// one of whose children) equals `active` is marked active.
    #[must_use]
    pub fn header(&self, active: Option<&str>) -> String {
        let nav = &self.config.nav;
        let site_name = escape_html(&self.config.site.name);

        let is_active = |href: &str| active == Some(href);

        let desktop_items = nav
            .items
            .iter()
            .map(|item| {
                let active_item =
                    is_active(&item.href) || item.children.iter().any(|c| is_active(&c.href));
                let mut classes = String::from("nav__item");
                if !item.children.is_empty() {
                    classes.push_str(" nav__item--dropdown");
                }
                if active_item {
                    classes.push_str(" nav__item--active");
                }

                let dropdown = if item.children.is_empty() {
                    String::new()
                } else {
                    let links = item
                        .children
                        .iter()
                        .map(|c| {
                            format!(
                                r#"<li><a href="{}" class="nav__dropdown-link">{}</a></li>"#,
                                escape_html(&c.href),
                                escape_html(&c.label)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("");
                    format!(r#"<ul class="nav__dropdown">{links}</ul>"#)
                };

                format!(
                    r#"                    <li class="{classes}"><a href="{}" class="nav__link">{}</a>{dropdown}</li>"#,
                    escape_html(&item.href),
                    escape_html(&item.label)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mobile_items = nav
            .items
            .iter()
            .flat_map(|item| {
                std::iter::once((item.href.as_str(), item.label.as_str())).chain(
                    item.children
                        .iter()
                        .map(|c| (c.href.as_str(), c.label.as_str())),
                )
            })
            .map(|(href, label)| {
                let class = if is_active(href) {
                    "mobile-nav__link mobile-nav__link--active"
                } else {
                    "mobile-nav__link"
                };
                format!(
                    r#"                <li><a href="{}" class="{class}">{}</a></li>"#,
                    escape_html(href),
                    escape_html(label)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let cta = match (&nav.cta_href, &nav.cta_label) {
            (Some(href), Some(label)) => format!(
                r#"<a href="{}" class="btn btn--primary nav__cta">{}</a>"#,
                escape_html(href),
                escape_html(label)
            ),
            _ => String::new(),
        };

        format!(
            r#"    <header class="site-header">
        <div class="container header__inner">
            <a href="/" class="logo">{site_name}</a>
            <nav class="nav" aria-label="Main navigation">
                <ul class="nav__list">
{desktop_items}
                </ul>
            </nav>
            {cta}
            <button class="mobile-menu-toggle" aria-label="Open menu" aria-controls="mobile-nav" aria-expanded="false">
                <span></span><span></span><span></span>
            </button>
        </div>
        <nav class="mobile-nav" id="mobile-nav" aria-label="Mobile navigation">
            <ul class="mobile-nav__list">
{mobile_items}
            </ul>
            {cta}
        </nav>
    </header>"#
        )
    }

    /// Footer with link columns and the copyright line.
    #[must_use]
    pub fn footer(&self) -> String {
        let site = &self.config.site;
        let site_name = escape_html(&site.name);

        let tagline = site
            .tagline
            .as_deref()
            .map(|t| format!(r#"<p class="footer__tagline">{}</p>"#, escape_html(t)))
            .unwrap_or_default();

        let columns = self
            .config
            .footer
            .columns
            .iter()
            .map(|column| {
                let links = column
                    .links
                    .iter()
                    .map(|l| {
                        format!(
                            r#"<li><a href="{}">{}</a></li>"#,
                            escape_html(&l.href),
                            escape_html(&l.label)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("");
                format!(
                    r#"                <div class="footer__column"><h3 class="footer__heading">{}</h3><ul>{links}</ul></div>"#,
                    escape_html(&column.heading)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let copyright = match &site.copyright_year {
            Some(year) => format!("&copy; {} {site_name}. All rights reserved.", escape_html(year)),
            None => format!("&copy; {site_name}. All rights reserved."),
        };

        format!(
            r#"    <footer class="site-footer">
        <div class="container">
            <div class="footer__grid">
                <div class="footer__brand"><a href="/" class="logo">{site_name}</a>{tagline}</div>
{columns}
            </div>
            <p class="footer__copyright">{copyright}</p>
        </div>
    </footer>"#
        )
    }

    /// Call-to-action section shown above the footer. `heading` replaces the
    /// configured heading. Absent unless the navigation has a CTA target and
    /// label.
    #[must_use]
    pub fn cta_section(&self, heading: Option<&str>) -> Option<String> {
        let nav = &self.config.nav;
        let (href, label) = match (&nav.cta_href, &nav.cta_label) {
            (Some(href), Some(label)) => (href, label),
            _ => return None,
        };

        let heading = heading
            .or(nav.cta_heading.as_deref())
            .unwrap_or(label.as_str());
        let text = nav
            .cta_text
            .as_deref()
            .map(|t| format!("\n                    <p class=\"cta-section__text\">{}</p>", escape_html(t)))
            .unwrap_or_default();

        Some(format!(
            r#"        <section class="section cta-section">
            <div class="container">
                <div class="cta-section__header">
                    <h2 class="cta-section__title">{}</h2>{text}
                </div>
                <a href="{}" class="btn btn--white btn--lg">{}</a>
            </div>
        </section>"#,
            escape_html(heading),
            escape_html(href),
            escape_html(label)
        ))
    }
}

/// Composes full HTML documents.
#[derive(Debug)]
pub struct PageComposer<'a> {
    config: &'a Config,
    registry: &'a ContentRegistry,
    routes: &'a RouteTable,
    templates: TemplateRegistry,
}

/// Per-page values for the `base` template.
struct Document<'d> {
    path: &'d str,
    title: &'d str,
    description: &'d str,
    og_type: &'d str,
    active: Option<String>,
    content: String,
    faq: Option<String>,
    links: Option<String>,
    cta: Option<String>,
    noindex: bool,
}

impl<'a> PageComposer<'a> {
    /// Create a composer with the built-in templates.
    #[must_use]
    pub fn new(config: &'a Config, registry: &'a ContentRegistry, routes: &'a RouteTable) -> Self {
        Self::with_templates(config, registry, routes, TemplateRegistry::new())
    }

    /// Create a composer with a custom template registry.
    #[must_use]
    pub fn with_templates(
        config: &'a Config,
        registry: &'a ContentRegistry,
        routes: &'a RouteTable,
        templates: TemplateRegistry,
    ) -> Self {
        Self {
            config,
            registry,
            routes,
            templates,
        }
    }

    #[must_use]
    pub fn chrome(&self) -> Chrome<'a> {
        Chrome::new(self.config)
    }

    /// Compose the page of a content record.
    pub fn compose_record(
        &self,
        record: &ContentRecord,
        route: &Route,
        data: &StructuredData,
    ) -> Result<String> {
        debug!(path = %route.path, "composing record page");

        let mut inner = TemplateContext::new()
            .with_var("family", record.family.key())
            .with_var("heading", escape_html(&record.title))
            .with_var("body", record.body.join("\n"));

        if let Payload::Article(article) = &record.payload {
            if let Some(subtitle) = &article.hero_subtitle {
                inner.insert(
                    "subtitle",
                    format!(r#"<p class="page-hero__subtitle">{}</p>"#, escape_html(subtitle)),
                );
            }
            if let Some(byline) = byline_html(article) {
                inner.insert("byline", byline);
            }
        }
        if let Some(lead) = self.payload_html(record) {
            inner.insert("lead", lead);
        }

        let content = self.templates.render("record", &inner)?;

        let og_type = if record.family == Family::Article {
            "article"
        } else {
            "website"
        };

        let site_name = &self.config.site.name;
        let cta_heading = match &record.payload {
            Payload::Comparison(comparison) => {
                Some(format!("Switch from {} to {site_name}", comparison.competitor))
            }
            Payload::Alternative(alternative) => Some(format!(
                "Try {site_name} as Your {} Alternative",
                alternative.competitor
            )),
            _ => None,
        };

        self.render_document(
            Document {
                path: &route.path,
                title: &record.title,
                description: &record.meta_description,
                og_type,
                active: self.active_target(route, record.nav_section.as_deref()),
                content,
                faq: faq_html(record),
                links: links_html(&record.related_links, &record.outbound_links),
                cta: self.chrome().cta_section(cta_heading.as_deref()),
                noindex: false,
            },
            Some(data),
        )
    }

    /// Compose the index page of a family's section.
    pub fn compose_section(
        &self,
        family: Family,
        route: &Route,
        data: &StructuredData,
    ) -> Result<String> {
        debug!(path = %route.path, family = %family, "composing section page");

        let records: Vec<&ContentRecord> = self.registry.family(family).collect();
        let items = records
            .iter()
            .map(|record| {
                let path = self.path_of(record.family, &record.slug);
                card_html(&path, &record.title, &record.meta_description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let label = family.section_label();
        let inner = TemplateContext::new()
            .with_var("title", escape_html(label))
            .with_var("items", items);
        let content = self.templates.render("section", &inner)?;

        let description = section_description(family, records.len(), &self.config.site.name);

        self.render_document(
            Document {
                path: &route.path,
                title: label,
                description: &description,
                og_type: "website",
                active: self.active_target(route, None),
                content,
                faq: None,
                links: None,
                cta: self.chrome().cta_section(None),
                noindex: false,
            },
            Some(data),
        )
    }

    /// Compose the generated home page.
    pub fn compose_home(&self, route: &Route, data: &StructuredData) -> Result<String> {
        debug!(path = %route.path, "composing home page");

        let site = &self.config.site;
        let sections = Family::ALL
            .iter()
            .filter_map(|&family| {
                let section = self.routes.section(family)?;
                let count = self.registry.family(family).count();
                Some(card_html(
                    &section.path,
                    family.section_label(),
                    &section_description(family, count, &site.name),
                ))
            })
            .collect::<Vec<_>>()
            .join("\n");
        let sections = format!(
            "            <ul class=\"card-list\">\n{sections}\n            </ul>"
        );

        let mut inner = TemplateContext::new()
            .with_var("site_name", escape_html(&site.name))
            .with_var("sections", sections);
        if let Some(tagline) = &site.tagline {
            inner.insert(
                "tagline",
                format!(r#"<p class="page-hero__subtitle">{}</p>"#, escape_html(tagline)),
            );
        }
        let content = self.templates.render("home", &inner)?;

        let description = site.tagline.as_deref().unwrap_or(&site.name);

        self.render_document(
            Document {
                path: &route.path,
                title: &site.name,
                description,
                og_type: "website",
                active: None,
                content,
                faq: None,
                links: None,
                cta: self.chrome().cta_section(None),
                noindex: false,
            },
            Some(data),
        )
    }

    /// Compose the page served for unknown paths. It carries the site chrome
    /// but no breadcrumbs or structured data, and asks not to be indexed.
    pub fn compose_not_found(&self) -> Result<String> {
        debug!("composing not-found page");

        let content = self.templates.render("not_found", &TemplateContext::new())?;

        self.render_document(
            Document {
                path: "/404.html",
                title: "Page Not Found",
                description: "The page you requested could not be found.",
                og_type: "website",
                active: None,
                content,
                faq: None,
                links: None,
                cta: None,
                noindex: true,
            },
            None,
        )
    }

    fn render_document(&self, doc: Document<'_>, data: Option<&StructuredData>) -> Result<String> {
        let site = &self.config.site;
        let chrome = self.chrome();

        let mut ctx = TemplateContext::new()
            .with_var("lang", escape_html(&site.language))
            .with_var("full_title", escape_html(&self.config.full_title(doc.title)))
            .with_var("description", escape_html(doc.description))
            .with_var("canonical_url", escape_html(&self.config.url_for(doc.path)))
            .with_var("og_type", doc.og_type)
            .with_var("site_name", escape_html(&site.name))
            .with_var("css_version", escape_html(&site.css_version))
            .with_var("header", chrome.header(doc.active.as_deref()))
            .with_var("content", doc.content)
            .with_var("footer", chrome.footer());

        if let Some(image) = &site.og_image {
            let url = if image.starts_with('/') {
                self.config.url_for(image)
            } else {
                image.clone()
            };
            ctx.insert(
                "og_image",
                format!(r#"<meta property="og:image" content="{}">"#, escape_html(&url)),
            );
        }
        if doc.noindex {
            ctx.insert("robots", r#"<meta name="robots" content="noindex">"#);
        }
        if let Some(data) = data {
            ctx.insert_non_empty("structured_data", data.script_blocks());
            ctx.insert_non_empty("breadcrumbs", breadcrumb_html(&data.trail).unwrap_or_default());
        }
        ctx.insert_non_empty("faq", doc.faq.unwrap_or_default());
        ctx.insert_non_empty("links", doc.links.unwrap_or_default());
        ctx.insert_non_empty("cta", doc.cta.unwrap_or_default());

        Ok(self.templates.render("base", &ctx)?)
    }

    /// Navigation target to highlight: the record's `nav_section` override,
    /// the family section, or the page itself for root-mounted pages.
    #[must_use]
    pub fn active_target(&self, route: &Route, nav_section: Option<&str>) -> Option<String> {
        if let Some(section) = nav_section {
            let section = section.trim_matches('/');
            return Some(if section.is_empty() {
                "/".to_string()
            } else {
                format!("/{section}/")
            });
        }

        match route.family() {
            Some(family) if self.config.prefix_for(family) != "/" => {
                Some(self.config.prefix_for(family).to_string())
            }
            _ if route.path == "/" => None,
            _ => Some(route.path.clone()),
        }
    }

    fn path_of(&self, family: Family, slug: &str) -> String {
        self.routes
            .lookup(family, slug)
            .map(|r| r.path.clone())
            .unwrap_or_else(|| record_path(self.config, family, slug))
    }

    fn title_of(&self, family: Family, slug: &str) -> String {
        self.registry
            .get(&pagesmith_core::RecordId::new(family, slug))
            .map(|r| r.title.clone())
            .unwrap_or_else(|| slug.to_string())
    }

    /// Family-specific fragments shown between the hero and the body.
    fn payload_html(&self, record: &ContentRecord) -> Option<String> {
        let html = match &record.payload {
            Payload::Article(article) => tags_html(&article.tags),
            Payload::Comparison(data) => {
                let mut html = comparison_table_html(
                    &data.table,
                    &data.competitor,
                    &self.config.site.name,
                );
                if let Some(verdict) = &data.verdict {
                    html.push_str(&format!(
                        "\n            <p class=\"verdict\">{}</p>",
                        escape_html(verdict)
                    ));
                }
                html
            }
            Payload::Alternative(data) => {
                let mut html = comparison_table_html(
                    &data.table,
                    &data.competitor,
                    &self.config.site.name,
                );
                if let Some(url) = &data.competitor_url {
                    html.push_str(&format!(
                        "\n            <p class=\"competitor-link\"><a href=\"{}\" rel=\"nofollow noopener\" target=\"_blank\">Visit {}</a></p>",
                        escape_html(url),
                        escape_html(&data.competitor)
                    ));
                }
                html
            }
            Payload::Glossary(data) => {
                let mut html = if data.short_definition.is_empty() {
                    format!(
                        r#"            <p class="definition"><strong>{}</strong></p>"#,
                        escape_html(&data.term)
                    )
                } else {
                    format!(
                        r#"            <p class="definition"><strong>{}</strong>: {}</p>"#,
                        escape_html(&data.term),
                        escape_html(&data.short_definition)
                    )
                };
                if !data.related_terms.is_empty() {
                    let terms = data
                        .related_terms
                        .iter()
                        .map(|slug| {
                            format!(
                                r#"<a href="{}">{}</a>"#,
                                escape_html(&self.path_of(Family::Glossary, slug)),
                                escape_html(&self.title_of(Family::Glossary, slug))
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    html.push_str(&format!(
                        "\n            <p class=\"related-terms\">Related terms: {terms}</p>"
                    ));
                }
                html
            }
            Payload::Region(data) => {
                let mut html = String::new();
                if !data.stats.is_empty() {
                    let stats = data
                        .stats
                        .iter()
                        .map(|s| {
                            format!(
                                r#"<div class="stat"><span class="stat__value">{}</span><span class="stat__label">{}</span></div>"#,
                                escape_html(&s.value),
                                escape_html(&s.label)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("");
                    html.push_str(&format!(
                        r#"            <div class="stats-grid">{stats}</div>"#
                    ));
                }
                if let Some(parent) = &data.parent {
                    html.push_str(&format!(
                        "\n            <p class=\"region-parent\">Part of <a href=\"{}\">{}</a></p>",
                        escape_html(&self.path_of(Family::Region, parent)),
                        escape_html(&self.title_of(Family::Region, parent))
                    ));
                }
                html
            }
            Payload::UseCase(data) => {
                let mut html = String::new();
                if let Some(audience) = &data.audience {
                    html.push_str(&format!(
                        r#"            <p class="audience">Built for {}</p>"#,
                        escape_html(audience)
                    ));
                }
                if !data.highlights.is_empty() {
                    let items = data
                        .highlights
                        .iter()
                        .map(|h| format!("<li>{}</li>", escape_html(h)))
                        .collect::<Vec<_>>()
                        .join("");
                    html.push_str(&format!(
                        "\n            <ul class=\"highlights\">{items}</ul>"
                    ));
                }
                html
            }
            Payload::Resource(data) => {
                let mut html = String::new();
                if let Some(kind) = &data.kind {
                    html.push_str(&format!(
                        r#"            <span class="badge">{}</span>"#,
                        escape_html(kind)
                    ));
                }
                if let Some(url) = &data.download_url {
                    html.push_str(&format!(
                        "\n            <a class=\"btn btn--primary\" href=\"{}\" rel=\"noopener\">Download</a>",
                        escape_html(url)
                    ));
                }
                html
            }
            Payload::Page => String::new(),
        };

        let html = html.trim_start_matches('\n');
        (!html.is_empty()).then(|| html.to_string())
    }
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Visible breadcrumb navigation; the last crumb is the current page and is
/// not linked. Single-crumb trails (the home page) render nothing.
#[must_use]
pub fn breadcrumb_html(trail: &[Crumb]) -> Option<String> {
    if trail.len() < 2 {
        return None;
    }

    let last = trail.len() - 1;
    let items = trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            if i == last {
                format!(
                    r#"<li class="breadcrumb__item" aria-current="page">{}</li>"#,
                    escape_html(&crumb.label)
                )
            } else {
                format!(
                    r#"<li class="breadcrumb__item"><a href="{}">{}</a></li>"#,
                    escape_html(&crumb.path),
                    escape_html(&crumb.label)
                )
            }
        })
        .collect::<Vec<_>>()
        .join("");

    Some(format!(
        r#"        <nav class="breadcrumb container" aria-label="Breadcrumb"><ol class="breadcrumb__list">{items}</ol></nav>"#
    ))
}

/// FAQ accordion, absent when the record has no FAQs.
#[must_use]
pub fn faq_html(record: &ContentRecord) -> Option<String> {
    if record.faqs.is_empty() {
        return None;
    }

    let items = record
        .faqs
        .iter()
        .map(|faq| {
            format!(
                r#"                <details class="faq-item"><summary class="faq-question">{}</summary><div class="faq-answer"><p>{}</p></div></details>"#,
                escape_html(&faq.question),
                escape_html(&faq.answer)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        r#"        <section class="faq-section section">
            <div class="container">
                <h2>Frequently Asked Questions</h2>
{items}
            </div>
        </section>"#
    ))
}

/// Related and outbound link lists, absent when both are empty.
#[must_use]
pub fn links_html(related: &[Link], outbound: &[Link]) -> Option<String> {
    let list = |links: &[Link], attrs: &str| {
        links
            .iter()
            .map(|l| {
                format!(
                    r#"<li><a href="{}"{attrs}>{}</a></li>"#,
                    escape_html(&l.url),
                    escape_html(&l.label)
                )
            })
            .collect::<Vec<_>>()
            .join("")
    };

    let mut sections = Vec::new();
    if !related.is_empty() {
        sections.push(format!(
            r#"        <section class="related-links"><h2>Related</h2><ul>{}</ul></section>"#,
            list(related, "")
        ));
    }
    if !outbound.is_empty() {
        sections.push(format!(
            r#"        <section class="outbound-links"><h2>Sources</h2><ul>{}</ul></section>"#,
            list(outbound, r#" rel="noopener" target="_blank""#)
        ));
    }

    (!sections.is_empty()).then(|| sections.join("\n"))
}

fn byline_html(article: &ArticleData) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(author) = &article.author {
        let name = match &author.url {
            Some(url) => format!(
                r#"<a href="{}" rel="author">{}</a>"#,
                escape_html(url),
                escape_html(&author.name)
            ),
            None => escape_html(&author.name),
        };
        let credentials = author
            .credentials
            .as_deref()
            .map(|c| format!(", {}", escape_html(c)))
            .unwrap_or_default();
        parts.push(format!("By {name}{credentials}"));
    }
    if let Some(date) = article.published {
        parts.push(format!(
            r#"<time datetime="{}">{}</time>"#,
            date.format("%Y-%m-%d"),
            date.format("%B %-d, %Y")
        ));
    }
    if let Some(date) = article.modified.filter(|m| Some(*m) != article.published) {
        parts.push(format!(
            r#"Updated <time datetime="{}">{}</time>"#,
            date.format("%Y-%m-%d"),
            date.format("%B %-d, %Y")
        ));
    }

    (!parts.is_empty()).then(|| {
        format!(
            r#"<p class="byline">{}</p>"#,
            parts.join(r#" <span class="byline__sep">&middot;</span> "#)
        )
    })
}

fn tags_html(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let tags = tags
        .iter()
        .map(|t| format!(r#"<span class="tag">{}</span>"#, escape_html(t)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#"            <div class="tags">{tags}</div>"#)
}

fn comparison_table_html(rows: &[ComparisonRow], competitor: &str, site_name: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let body = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.feature),
                escape_html(&row.competitor),
                escape_html(&row.ours)
            )
        })
        .collect::<Vec<_>>()
        .join("");
    format!(
        r#"            <table class="comparison-table"><thead><tr><th>Feature</th><th>{}</th><th>{}</th></tr></thead><tbody>{body}</tbody></table>"#,
        escape_html(competitor),
        escape_html(site_name)
    )
}

fn card_html(path: &str, title: &str, description: &str) -> String {
    format!(
        r#"                <li class="card"><a href="{}" class="card__link"><h2 class="card__title">{}</h2><p class="card__description">{}</p></a></li>"#,
        escape_html(path),
        escape_html(title),
        escape_html(description)
    )
}

fn section_description(family: Family, count: usize, site_name: &str) -> String {
    let noun = if count == 1 { "page" } else { "pages" };
    format!(
        "{} from {site_name}: {count} {noun}.",
        family.section_label()
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pagesmith_core::{
        Faq, RecordId,
        config::{NavItem, NavLink},
        content::{AlternativeData, Author, ComparisonData, GlossaryData},
    };

    use super::*;

    fn config() -> Config {
        let mut config = Config::new("Provyx", "https://getprovyx.com");
        config.site.copyright_year = Some("2026".to_string());
        config.site.tagline = Some("Provider data".to_string());
        config.nav.items = vec![
            NavItem {
                href: "/compare/".to_string(),
                label: "Compare".to_string(),
                children: Vec::new(),
            },
            NavItem {
                href: "/resources/".to_string(),
                label: "Resources".to_string(),
                children: vec![NavLink {
                    href: "/glossary/".to_string(),
                    label: "Glossary".to_string(),
                }],
            },
        ];
        config.nav.cta_href = Some("/contact/".to_string());
        config.nav.cta_label = Some("Get Data".to_string());
        config
    }

    fn comparison() -> ContentRecord {
        let mut record = ContentRecord::new(
            Family::Comparison,
            "provyx-vs-veeva",
            "Provyx vs Veeva",
            "Compare Provyx & Veeva.",
        );
        record.payload = Payload::Comparison(ComparisonData {
            competitor: "Veeva".to_string(),
            table: vec![ComparisonRow {
                feature: "Price".to_string(),
                competitor: "$50,000+".to_string(),
                ours: "Pay-per-record".to_string(),
            }],
            verdict: Some("Pick what fits.".to_string()),
        });
        record.body = vec!["<p>Body one</p>".to_string(), "<p>Body two</p>".to_string()];
        record.faqs = vec![Faq::new("Is it <fast>?", "Yes.")];
        record.related_links = vec![Link::new("/compare/", "All comparisons")];
        record.outbound_links = vec![Link::new("https://veeva.com/", "Veeva")];
        record
    }

    struct Fixture {
        config: Config,
        registry: ContentRegistry,
        routes: RouteTable,
    }

    impl Fixture {
        fn new(records: Vec<ContentRecord>) -> Self {
            let config = config();
            let registry = ContentRegistry::from_records(records);
            let routes = RouteTable::resolve(&registry, &config).unwrap();
            Self {
                config,
                registry,
                routes,
            }
        }

        fn composer(&self) -> PageComposer<'_> {
            PageComposer::new(&self.config, &self.registry, &self.routes)
        }

        fn compose(&self, id: &RecordId) -> String {
            let record = self.registry.get(id).unwrap();
            let route = self.routes.get(id).unwrap();
            let data = StructuredData::build(route, &record.title, &record.faqs, &self.config);
            self.composer().compose_record(record, route, &data).unwrap()
        }
    }

    fn position(html: &str, needle: &str) -> usize {
        html.find(needle)
            .unwrap_or_else(|| panic!("missing `{needle}` in output"))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_html(r#""q" 'a'"#), "&quot;q&quot; &#39;a&#39;");
    }

    #[test]
    fn test_record_page_sections_in_order() {
        let record = comparison();
        let fixture = Fixture::new(vec![record.clone()]);
        let html = fixture.compose(&record.id());

        let head = position(&html, "<title>Provyx vs Veeva | Provyx</title>");
        let nav = position(&html, r#"class="site-header""#);
        let crumbs = position(&html, r#"aria-label="Breadcrumb""#);
        let table = position(&html, "comparison-table");
        let body_one = position(&html, "<p>Body one</p>");
        let body_two = position(&html, "<p>Body two</p>");
        let faq = position(&html, "faq-section");
        let related = position(&html, "related-links");
        let outbound = position(&html, "outbound-links");
        let footer = position(&html, r#"class="site-footer""#);

        assert!(head < nav);
        assert!(nav < crumbs);
        assert!(crumbs < table);
        assert!(table < body_one);
        assert!(body_one < body_two);
        assert!(body_two < faq);
        assert!(faq < related);
        assert!(related < outbound);
        let cta = position(&html, "cta-section__title");
        assert!(outbound < cta);
        assert!(cta < footer);
    }

    #[test]
    fn test_cta_heading_names_competitor() {
        let record = comparison();
        let mut alternative = ContentRecord::new(
            Family::Alternative,
            "veeva-alternative",
            "Veeva Alternative",
            "d",
        );
        alternative.payload = Payload::Alternative(AlternativeData {
            competitor: "Veeva".to_string(),
            ..AlternativeData::default()
        });
        let page = ContentRecord::new(Family::Page, "about", "About", "d");
        let fixture = Fixture::new(vec![record.clone(), alternative.clone(), page.clone()]);

        let html = fixture.compose(&record.id());
        assert!(html.contains(r#"<h2 class="cta-section__title">Switch from Veeva to Provyx</h2>"#));
        assert!(html.contains(r#"<a href="/contact/" class="btn btn--white btn--lg">Get Data</a>"#));

        let html = fixture.compose(&alternative.id());
        assert!(html.contains(
            r#"<h2 class="cta-section__title">Try Provyx as Your Veeva Alternative</h2>"#
        ));

        let html = fixture.compose(&page.id());
        assert!(html.contains(r#"<h2 class="cta-section__title">Get Data</h2>"#));
    }

    #[test]
    fn test_cta_section_uses_configured_copy() {
        let mut config = config();
        config.nav.cta_heading = Some("Ready & waiting?".to_string());
        config.nav.cta_text = Some("Tell us what you need.".to_string());
        let chrome = Chrome::new(&config);

        let html = chrome.cta_section(None).unwrap();
        assert!(html.contains("Ready &amp; waiting?"));
        assert!(html.contains(r#"<p class="cta-section__text">Tell us what you need.</p>"#));
        assert!(chrome.cta_section(Some("Override")).unwrap().contains(">Override</h2>"));

        config.nav.cta_href = None;
        assert!(Chrome::new(&config).cta_section(None).is_none());
    }

    #[test]
    fn test_not_found_page_has_chrome_and_no_structured_data() {
        let fixture = Fixture::new(vec![comparison()]);
        let html = fixture.composer().compose_not_found().unwrap();

        assert!(html.contains("<title>Page Not Found | Provyx</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://getprovyx.com/404.html">"#));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(html.contains(r#"class="site-header""#));
        assert!(html.contains(r#"class="site-footer""#));
        assert!(html.contains(r#"<a href="/" class="btn btn--primary btn--lg">Back to Homepage</a>"#));
        assert!(!html.contains("application/ld+json"));
        assert!(!html.contains(r#"aria-label="Breadcrumb""#));
        assert!(!html.contains("cta-section"));
    }

    #[test]
    fn test_record_page_head_metadata() {
        let record = comparison();
        let fixture = Fixture::new(vec![record.clone()]);
        let html = fixture.compose(&record.id());

        assert!(html.contains(r#"<meta name="description" content="Compare Provyx &amp; Veeva.">"#));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://getprovyx.com/compare/provyx-vs-veeva/">"#
        ));
        assert!(html.contains(r#"<meta property="og:type" content="website">"#));
        assert!(html.contains("BreadcrumbList"));
        assert!(html.contains("FAQPage"));
        assert!(html.contains("/css/styles.css?v=1"));
        assert!(html.contains("&copy; 2026 Provyx"));
    }

    #[test]
    fn test_record_text_is_escaped() {
        let record = comparison();
        let fixture = Fixture::new(vec![record.clone()]);
        let html = fixture.compose(&record.id());

        assert!(html.contains("Is it &lt;fast&gt;?"));
        assert!(!html.contains("Is it <fast>?</summary>"));
    }

    #[test]
    fn test_nav_marks_family_section_active() {
        let record = comparison();
        let fixture = Fixture::new(vec![record.clone()]);
        let html = fixture.compose(&record.id());

        assert!(html.contains(
            r#"<li class="nav__item nav__item--active"><a href="/compare/" class="nav__link">Compare</a>"#
        ));
        assert!(html.contains(r#"<a href="/compare/" class="mobile-nav__link mobile-nav__link--active">"#));
        assert!(html.contains(r#"<a href="/contact/" class="btn btn--primary nav__cta">Get Data</a>"#));
    }

    #[test]
    fn test_nav_section_override_activates_dropdown_parent() {
        let mut term = ContentRecord::new(Family::Glossary, "npi", "NPI", "d");
        term.payload = Payload::Glossary(GlossaryData {
            term: "NPI".to_string(),
            ..GlossaryData::default()
        });
        term.nav_section = Some("glossary".to_string());
        let fixture = Fixture::new(vec![term.clone()]);
        let html = fixture.compose(&term.id());

        assert!(html.contains("nav__item nav__item--dropdown nav__item--active"));
    }

    #[test]
    fn test_record_without_faqs_has_no_faq_markup() {
        let record = ContentRecord::new(Family::Page, "about", "About", "About us");
        let fixture = Fixture::new(vec![record.clone()]);
        let html = fixture.compose(&record.id());

        assert!(!html.contains("faq-section"));
        assert!(!html.contains("FAQPage"));
        assert!(!html.contains("related-links"));
    }

    #[test]
    fn test_glossary_related_terms_use_titles_and_paths() {
        let mut term = ContentRecord::new(Family::Glossary, "npi", "NPI", "d");
        term.payload = Payload::Glossary(GlossaryData {
            term: "NPI".to_string(),
            short_definition: "A 10-digit identifier.".to_string(),
            related_terms: vec!["nppes".to_string()],
        });
        let other = ContentRecord::new(Family::Glossary, "nppes", "What is NPPES?", "d");
        let fixture = Fixture::new(vec![term.clone(), other]);
        let html = fixture.compose(&term.id());

        assert!(html.contains("<strong>NPI</strong>: A 10-digit identifier."));
        assert!(html.contains(r#"<a href="/glossary/nppes/">What is NPPES?</a>"#));
    }

    #[test]
    fn test_article_byline() {
        let mut post = ContentRecord::new(Family::Article, "hello", "Hello", "d");
        post.payload = Payload::Article(ArticleData {
            published: NaiveDate::from_ymd_opt(2026, 2, 5),
            author: Some(Author {
                name: "Sam Lee".to_string(),
                credentials: Some("MPH".to_string()),
                url: None,
            }),
            ..ArticleData::default()
        });
        let fixture = Fixture::new(vec![post.clone()]);
        let html = fixture.compose(&post.id());

        assert!(html.contains("By Sam Lee, MPH"));
        assert!(html.contains(r#"<time datetime="2026-02-05">February 5, 2026</time>"#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
    }

    #[test]
    fn test_section_page_lists_records() {
        let fixture = Fixture::new(vec![
            comparison(),
            ContentRecord::new(Family::Comparison, "provyx-vs-iqvia", "Provyx vs IQVIA", "d"),
        ]);
        let route = fixture.routes.section(Family::Comparison).unwrap();
        let data = StructuredData::build(route, "", &[], &fixture.config);
        let html = fixture
            .composer()
            .compose_section(Family::Comparison, route, &data)
            .unwrap();

        assert!(html.contains("<title>Compare | Provyx</title>"));
        let first = position(&html, r#"href="/compare/provyx-vs-veeva/""#);
        let second = position(&html, r#"href="/compare/provyx-vs-iqvia/""#);
        assert!(first < second);
        assert!(html.contains(r#"<li class="breadcrumb__item" aria-current="page">Compare</li>"#));
    }

    #[test]
    fn test_home_page_lists_sections_without_breadcrumb_nav() {
        let fixture = Fixture::new(vec![comparison()]);
        let route = fixture.routes.by_owner(&crate::routes::RouteOwner::Home).unwrap();
        let data = StructuredData::build(route, "", &[], &fixture.config);
        let html = fixture.composer().compose_home(route, &data).unwrap();

        assert!(html.contains("<title>Provyx</title>"));
        assert!(html.contains(r#"<a href="/compare/" class="card__link">"#));
        assert!(!html.contains(r#"aria-label="Breadcrumb""#));
        assert!(html.contains("BreadcrumbList"));
    }

    #[test]
    fn test_active_target() {
        let fixture = Fixture::new(vec![ContentRecord::new(Family::Page, "pricing", "Pricing", "d")]);
        let composer = fixture.composer();
        let route = fixture.routes.lookup(Family::Page, "pricing").unwrap();

        assert_eq!(composer.active_target(route, None).as_deref(), Some("/pricing/"));
        assert_eq!(
            composer.active_target(route, Some("/compare/")).as_deref(),
            Some("/compare/")
        );
    }

    #[test]
    fn test_links_html_empty() {
        assert!(links_html(&[], &[]).is_none());
        let html = links_html(&[], &[Link::new("https://cms.gov/", "CMS")]).unwrap();
        assert!(html.contains(r#"rel="noopener" target="_blank""#));
    }
}
