//! Build error type shared by every pipeline stage.

use std::path::{Path, PathBuf};

use pagesmith_core::{CoreError, Family};
use thiserror::Error;

use crate::{links::BrokenLink, template::TemplateError};

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A content record failed structural validation.
    #[error("invalid {family} record `{record}`: {reason}")]
    ContentValidation {
        family: Family,
        /// Slug, or `#<index>` when the slug itself is missing.
        record: String,
        reason: String,
    },

    /// Two route owners resolved to the same canonical path.
    #[error("route collision at `{path}`: claimed by `{first}` and `{second}`")]
    RouteCollision {
        path: String,
        first: String,
        second: String,
    },

    /// Internal links whose targets are not in the route table.
    #[error("{} dangling internal link(s):\n{}", .0.len(), summarize(.0))]
    DanglingLinks(Vec<BrokenLink>),

    /// A page or auxiliary file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The accumulated sitemap disagrees with the writer ledger.
    #[error(
        "sitemap does not match written pages (missing from sitemap: {missing_from_sitemap:?}, \
         missing from disk: {missing_from_disk:?}, duplicates: {duplicates:?})"
    )]
    SitemapMismatch {
        missing_from_sitemap: Vec<String>,
        missing_from_disk: Vec<String>,
        duplicates: Vec<String>,
    },

    /// A content source file could not be read or parsed.
    #[error("cannot load {}: {message}", .path.display())]
    Source { path: PathBuf, message: String },

    /// The output directory would swallow a path the build reads from.
    #[error(
        "output directory {} contains {}; refusing to replace it",
        .output.display(),
        .protected.display()
    )]
    OutputOverlap { output: PathBuf, protected: PathBuf },

    /// The output directory has no usable parent for staging.
    #[error("invalid output directory: {}", .0.display())]
    InvalidOutput(PathBuf),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Core library error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Adapter for `map_err` that attaches the path being written.
    pub fn write(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn summarize(broken: &[BrokenLink]) -> String {
    broken
        .iter()
        .map(|link| format!("  {link}"))
        .collect::<Vec<_>>()
        .join("\n")
}
