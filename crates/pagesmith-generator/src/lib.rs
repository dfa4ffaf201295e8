//! Pagesmith Generator Library
//!
//! The content-to-page build pipeline.
//!
//! # Modules
//!
//! - [`source`] - Loads per-family content collections from disk
//! - [`registry`] - Validates and orders content records
//! - [`routes`] - Canonical paths, output files, collision detection
//! - [`structured`] - Breadcrumb trails and JSON-LD
//! - [`template`] - HTML template system with variable interpolation
//! - [`compose`] - Full page composition
//! - [`links`] - Internal link integrity checking
//! - [`sitemap`] - Sitemap accumulation, verification and XML output
//! - [`robots`] - robots.txt generation
//! - [`writer`] - File writer with retry and ledger
//! - [`build`] - Build orchestration

pub mod build;
pub mod compose;
pub mod error;
pub mod links;
pub mod registry;
pub mod robots;
pub mod routes;
pub mod sitemap;
pub mod source;
pub mod structured;
pub mod template;
pub mod writer;

pub use build::{BuildStats, Builder, CheckReport, MANIFEST_FILE, NOT_FOUND_FILE};
pub use compose::{Chrome, PageComposer};
pub use error::{BuildError, Result};
pub use links::{BrokenLink, LinkCategory, LinkChecker, LinkReport};
pub use registry::{ContentRegistry, Corpus};
pub use robots::RobotsGenerator;
pub use routes::{Route, RouteOwner, RouteTable};
pub use sitemap::{SitemapAccumulator, SitemapEntry, SitemapGenerator};
pub use source::ContentSource;
pub use structured::{Crumb, StructuredData};
pub use template::{Template, TemplateContext, TemplateRegistry};
pub use writer::{FileWriter, WriteOutcome};
