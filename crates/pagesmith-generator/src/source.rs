//! Content source loading.
//!
//! Reads one directory per family under the content root. Every `*.toml`,
//! `*.json`, `*.yaml` or `*.yml` file in that directory contributes the
//! records listed under its top-level `records` key. Files are read in file
//! name order so the resulting collection order is stable.

use std::{
    fs,
    path::{Path, PathBuf},
};

use pagesmith_core::{Family, RawRecord};
use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    error::{BuildError, Result},
    registry::Corpus,
};

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Toml,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default)]
    records: Vec<RawRecord>,
}

/// Loads a [`Corpus`] from a content directory.
#[derive(Debug, Clone)]
pub struct ContentSource {
    root: PathBuf,
}

impl ContentSource {
    /// Create a source rooted at the content directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every family's collection.
    pub fn load(&self) -> Result<Corpus> {
        let mut corpus = Corpus::new();

        for family in Family::ALL {
            let records = self.load_family(family)?;
            if !records.is_empty() {
                corpus.extend(family, records);
            }
        }

        info!(
            root = %self.root.display(),
            records = corpus.len(),
            "loaded content"
        );
        Ok(corpus)
    }

    /// Load a single family's collection. A missing directory is empty.
    pub fn load_family(&self, family: Family) -> Result<Vec<RawRecord>> {
        let dir = self.root.join(family.content_dir());
        if !dir.is_dir() {
            debug!(family = %family, dir = %dir.display(), "no content directory");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| BuildError::Source {
                path: dir.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(format) = SourceFormat::from_path(path) else {
                debug!(path = %path.display(), "skipping non-content file");
                continue;
            };

            let loaded = parse_file(path, format)?;
            debug!(path = %path.display(), count = loaded.len(), "read content file");
            records.extend(loaded);
        }

        Ok(records)
    }
}

/// Parse one content file into its raw records.
pub fn parse_file(path: &Path, format: SourceFormat) -> Result<Vec<RawRecord>> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::Source {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_str(&content, format).map_err(|message| BuildError::Source {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse content text of a known format.
pub fn parse_str(content: &str, format: SourceFormat) -> std::result::Result<Vec<RawRecord>, String> {
    let file: RecordFile = match format {
        SourceFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
    };
    Ok(file.records)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b.toml")),
            Some(SourceFormat::Toml)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("b.yml")),
            Some(SourceFormat::Yaml)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("b.json")),
            Some(SourceFormat::Json)
        );
        assert_eq!(SourceFormat::from_path(Path::new("README.md")), None);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_parse_toml_records() {
        let records = parse_str(
            r#"
[[records]]
slug = "what-is-npi"
title = "What is an NPI?"
meta_description = "NPI basics."
last_modified = "2026-01-10"
published = "2026-01-05"
body = ["<p>Hello</p>"]
related_links = [["/glossary/npi/", "NPI"]]

[[records.faqs]]
question = "Is it free?"
answer = "Yes."
"#,
            SourceFormat::Toml,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.slug.as_deref(), Some("what-is-npi"));
        assert_eq!(record.faqs.len(), 1);
        assert_eq!(record.related_links[0].url, "/glossary/npi/");
        assert!(record.last_modified.is_some());
        assert!(record.extra.contains_key("published"));
    }

    #[test]
    fn test_parse_json_and_yaml_records() {
        let json = parse_str(
            r#"{"records": [{"slug": "a", "page_title": "A", "description": "d"}]}"#,
            SourceFormat::Json,
        )
        .unwrap();
        assert_eq!(json[0].title.as_deref(), Some("A"));
        assert_eq!(json[0].meta_description.as_deref(), Some("d"));

        let yaml = parse_str(
            "records:\n  - slug: b\n    title: B\n    meta_description: e\n    priority: 0.9\n",
            SourceFormat::Yaml,
        )
        .unwrap();
        assert_eq!(yaml[0].slug.as_deref(), Some("b"));
        assert_eq!(yaml[0].priority, Some(0.9));
    }

    #[test]
    fn test_file_without_records_is_empty() {
        let records = parse_str("", SourceFormat::Toml).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_reads_family_directories_in_name_order() {
        let dir = TempDir::new().unwrap();
        let glossary = dir.path().join("glossary");
        fs::create_dir_all(&glossary).unwrap();
        fs::write(
            glossary.join("b.toml"),
            "[[records]]\nslug = \"second\"\ntitle = \"B\"\nmeta_description = \"b\"\n",
        )
        .unwrap();
        fs::write(
            glossary.join("a.json"),
            r#"{"records": [{"slug": "first", "title": "A", "meta_description": "a"}]}"#,
        )
        .unwrap();
        fs::write(glossary.join("notes.md"), "ignored").unwrap();

        let corpus = ContentSource::new(dir.path()).load().unwrap();
        let slugs: Vec<_> = corpus
            .collection(Family::Glossary)
            .iter()
            .filter_map(|r| r.slug.as_deref())
            .collect();
        assert_eq!(slugs, vec!["first", "second"]);
        assert!(corpus.collection(Family::Article).is_empty());
    }

    #[test]
    fn test_unparseable_file_names_path() {
        let dir = TempDir::new().unwrap();
        let articles = dir.path().join("articles");
        fs::create_dir_all(&articles).unwrap();
        fs::write(articles.join("broken.toml"), "records = [").unwrap();

        let err = ContentSource::new(dir.path()).load().unwrap_err();
        match err {
            BuildError::Source { path, .. } => assert!(path.ends_with("broken.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_root_is_empty_corpus() {
        let corpus = ContentSource::new("/nonexistent/content").load().unwrap();
        assert!(corpus.is_empty());
    }
}
