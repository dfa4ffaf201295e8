//! Structured data: breadcrumb trails and JSON-LD blocks.

use pagesmith_core::{Config, Faq};
use serde_json::{Value, json};

use crate::routes::{Route, RouteOwner};

/// Label of the first breadcrumb.
pub const HOME_LABEL: &str = "Home";

/// One breadcrumb segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

impl Crumb {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Structured data computed for a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredData {
    /// Breadcrumb trail from the home page to this page.
    pub trail: Vec<Crumb>,
    /// `BreadcrumbList` JSON-LD.
    pub breadcrumb_list: Value,
    /// `FAQPage` JSON-LD, absent when the page has no FAQs.
    pub faq_page: Option<Value>,
}

impl StructuredData {
    /// Build the structured data for a route.
    ///
    /// `title` is the leaf label for record routes and is ignored for
    /// section and home routes.
    #[must_use]
    pub fn build(route: &Route, title: &str, faqs: &[Faq], config: &Config) -> Self {
        let trail = breadcrumb_trail(route, title, config);
        let breadcrumb_list = breadcrumb_list(&trail, config);
        Self {
            trail,
            breadcrumb_list,
            faq_page: faq_page(faqs),
        }
    }

    /// JSON-LD `<script>` blocks in head order.
    #[must_use]
    pub fn script_blocks(&self) -> String {
        let mut blocks = vec![script_block(&self.breadcrumb_list)];
        if let Some(faq) = &self.faq_page {
            blocks.push(script_block(faq));
        }
        blocks.join("\n")
    }
}

/// Breadcrumb trail for a route: Home, the family section (when the family
/// is not mounted at the root), then the page itself.
#[must_use]
pub fn breadcrumb_trail(route: &Route, title: &str, config: &Config) -> Vec<Crumb> {
    let mut trail = vec![Crumb::new(HOME_LABEL, "/")];

    match &route.owner {
        RouteOwner::Home => {}
        RouteOwner::Section(family) => {
            trail.push(Crumb::new(family.section_label(), route.path.clone()));
        }
        RouteOwner::Record(_) if route.path == "/" => {}
        RouteOwner::Record(id) => {
            let prefix = config.prefix_for(id.family);
            if prefix != "/" {
                trail.push(Crumb::new(id.family.section_label(), prefix));
            }
            trail.push(Crumb::new(title, route.path.clone()));
        }
    }

    trail
}

/// `BreadcrumbList` with absolute item URLs and positions starting at 1.
#[must_use]
pub fn breadcrumb_list(trail: &[Crumb], config: &Config) -> Value {
    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.label,
                "item": config.url_for(&crumb.path),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `FAQPage` with one question per FAQ in source order, or `None` when
/// there are no FAQs.
#[must_use]
pub fn faq_page(faqs: &[Faq]) -> Option<Value> {
    if faqs.is_empty() {
        return None;
    }

    let questions: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": faq.answer,
                },
            })
        })
        .collect();

    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    }))
}

/// Wrap a JSON-LD value in a script element. `</` is escaped so record text
/// cannot close the element early.
#[must_use]
pub fn script_block(value: &Value) -> String {
    let payload = value.to_string().replace("</", "<\\/");
    format!(r#"    <script type="application/ld+json">{payload}</script>"#)
}

#[cfg(test)]
mod tests {
    use pagesmith_core::{Family, RecordId};

    use super::*;

    fn config() -> Config {
        Config::new("Provyx", "https://getprovyx.com")
    }

    fn record_route(family: Family, slug: &str, path: &str) -> Route {
        Route::new(RouteOwner::Record(RecordId::new(family, slug)), path)
    }

    #[test]
    fn test_trail_for_sectioned_record() {
        let route = record_route(Family::Comparison, "a-vs-b", "/compare/a-vs-b/");
        let trail = breadcrumb_trail(&route, "A vs B", &config());

        assert_eq!(
            trail,
            vec![
                Crumb::new("Home", "/"),
                Crumb::new("Compare", "/compare/"),
                Crumb::new("A vs B", "/compare/a-vs-b/"),
            ]
        );
    }

    #[test]
    fn test_trail_for_root_page_skips_section() {
        let route = record_route(Family::Page, "pricing", "/pricing/");
        let trail = breadcrumb_trail(&route, "Pricing", &config());
        assert_eq!(
            trail,
            vec![Crumb::new("Home", "/"), Crumb::new("Pricing", "/pricing/")]
        );
    }

    #[test]
    fn test_trail_for_section_and_home() {
        let section = Route::new(RouteOwner::Section(Family::Glossary), "/glossary/");
        assert_eq!(breadcrumb_trail(&section, "", &config()).len(), 2);

        let home = Route::new(RouteOwner::Home, "/");
        assert_eq!(
            breadcrumb_trail(&home, "", &config()),
            vec![Crumb::new("Home", "/")]
        );
    }

    #[test]
    fn test_breadcrumb_list_positions_and_urls() {
        let route = record_route(Family::Glossary, "npi", "/glossary/npi/");
        let data = StructuredData::build(&route, "NPI", &[], &config());

        let items = data.breadcrumb_list["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[0]["item"], "https://getprovyx.com/");
        assert_eq!(items[2]["position"], 3);
        assert_eq!(items[2]["name"], "NPI");
        assert_eq!(items[2]["item"], "https://getprovyx.com/glossary/npi/");
    }

    #[test]
    fn test_empty_faqs_emit_no_block() {
        assert!(faq_page(&[]).is_none());

        let route = record_route(Family::Page, "about", "/about/");
        let data = StructuredData::build(&route, "About", &[], &config());
        assert!(!data.script_blocks().contains("FAQPage"));
    }

    #[test]
    fn test_faq_page_keeps_source_order() {
        let faqs = vec![Faq::new("First?", "One."), Faq::new("Second?", "Two.")];
        let value = faq_page(&faqs).unwrap();
        let questions = value["mainEntity"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["name"], "First?");
        assert_eq!(questions[1]["acceptedAnswer"]["text"], "Two.");
    }

    #[test]
    fn test_script_block_escapes_closing_tags() {
        let faqs = vec![Faq::new("Evil?", "</script><script>alert(1)</script>")];
        let block = script_block(&faq_page(&faqs).unwrap());
        assert!(!block.contains("</script><script>"));
        assert!(block.contains(r"<\/script>"));
        assert!(block.ends_with("</script>"));
    }
}
