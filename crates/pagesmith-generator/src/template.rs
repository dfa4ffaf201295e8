//! HTML template system for page generation.
//!
//! Provides a lightweight template system using string interpolation rather than
//! heavy template engines like Tera or Handlebars. Values are inserted as-is;
//! callers escape text before putting it into a context.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Insert a variable only when the value is non-empty.
    pub fn insert_non_empty(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.insert(key, value);
        }
    }

    /// Create context with initial variables.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}

/// A simple template that supports variable interpolation.
///
/// Variables are specified as `{{ variable_name }}` in the template string;
/// `{{ variable_name? }}` renders as empty when the variable is absent.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Inserted values are never rescanned, so content containing `{{` is
    /// emitted verbatim.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = String::with_capacity(self.content.len() * 2);
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;

            let var_name = after[..end].trim();

            // Check for optional variable syntax: {{ variable? }}
            let (var_name, optional) = if let Some(stripped) = var_name.strip_suffix('?') {
                (stripped.trim_end(), true)
            } else {
                (var_name, false)
            };

            if var_name.is_empty() {
                return Err(TemplateError::InvalidSyntax(format!(
                    "empty placeholder in template `{}`",
                    self.name
                )));
            }

            match context.get(var_name) {
                Some(v) => result.push_str(v),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            }

            rest = &after[end + 2..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    /// Register default built-in templates.
    fn register_defaults(&mut self) {
        self.register(Template::new("base", DEFAULT_BASE_TEMPLATE));
        self.register(Template::new("record", DEFAULT_RECORD_TEMPLATE));
        self.register(Template::new("section", DEFAULT_SECTION_TEMPLATE));
        self.register(Template::new("home", DEFAULT_HOME_TEMPLATE));
        self.register(Template::new("not_found", DEFAULT_NOT_FOUND_TEMPLATE));
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Default document template: head, chrome, and the page body slots in
/// their fixed order.
pub const DEFAULT_BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ full_title }}</title>
    <meta name="description" content="{{ description }}">
    <link rel="canonical" href="{{ canonical_url }}">
    {{ robots? }}

    <meta property="og:type" content="{{ og_type }}">
    <meta property="og:url" content="{{ canonical_url }}">
    <meta property="og:title" content="{{ full_title }}">
    <meta property="og:description" content="{{ description }}">
    <meta property="og:site_name" content="{{ site_name }}">
    {{ og_image? }}
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{{ full_title }}">
    <meta name="twitter:description" content="{{ description }}">
{{ structured_data? }}
    <link rel="icon" type="image/svg+xml" href="/assets/logos/favicon.svg">
    <link rel="stylesheet" href="/css/styles.css?v={{ css_version }}">
</head>
<body>
{{ header }}
    <main>
{{ breadcrumbs? }}
{{ content }}
{{ faq? }}
{{ links? }}
{{ cta? }}
    </main>
{{ footer }}
    <script src="/js/main.js"></script>
</body>
</html>
"##;

/// Default record template: hero, family lead-in, then body fragments.
pub const DEFAULT_RECORD_TEMPLATE: &str = r#"        <article class="page page--{{ family }}">
            <header class="page-hero section">
                <div class="container">
                    <h1 class="page-hero__title">{{ heading }}</h1>
                    {{ subtitle? }}
                    {{ byline? }}
                </div>
            </header>
{{ lead? }}
            <div class="content">
{{ body }}
            </div>
        </article>"#;

/// Default section index template (e.g. `/compare/`).
pub const DEFAULT_SECTION_TEMPLATE: &str = r#"        <section class="section-index">
            <header class="page-hero section">
                <div class="container">
                    <h1 class="page-hero__title">{{ title }}</h1>
                    {{ intro? }}
                </div>
            </header>
            <ul class="card-list">
{{ items }}
            </ul>
        </section>"#;

/// Default home template.
pub const DEFAULT_HOME_TEMPLATE: &str = r#"        <section class="home">
            <header class="page-hero section">
                <div class="container">
                    <h1 class="page-hero__title">{{ site_name }}</h1>
                    {{ tagline? }}
                </div>
            </header>
{{ sections }}
        </section>"#;

/// Default not-found page body.
pub const DEFAULT_NOT_FOUND_TEMPLATE: &str = r#"        <section class="page-hero section">
            <div class="container text-center">
                <h1 class="page-hero__title">Page Not Found</h1>
                <p class="page-hero__subtitle">The page you're looking for doesn't exist or has been moved.</p>
                <div class="hero__buttons">
                    <a href="/" class="btn btn--primary btn--lg">Back to Homepage</a>
                </div>
            </div>
        </section>"#;
