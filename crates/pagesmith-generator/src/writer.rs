//! File writer.
//!
//! Persists rendered pages under an output root, retrying transient I/O
//! failures, and keeps a ledger of every canonical path it wrote. When given
//! a baseline (the previous output), files whose bytes did not change are
//! hard-linked from it so their modification times survive a rebuild.

use std::{
    collections::BTreeSet,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    error::{BuildError, Result},
    routes::Route,
};

/// What a write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Bytes were written.
    Written,
    /// The file already held identical bytes.
    Unchanged,
    /// Identical bytes were linked from the baseline.
    Reused,
}

/// Writes files under an output root.
#[derive(Debug)]
pub struct FileWriter {
    root: PathBuf,
    baseline: Option<PathBuf>,
    retries: u32,
    ledger: Mutex<BTreeSet<String>>,
    files: Mutex<BTreeSet<PathBuf>>,
}

impl FileWriter {
    /// Create a writer. `retries` is the number of extra attempts after a
    /// transient failure.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, retries: u32) -> Self {
        Self {
            root: root.into(),
            baseline: None,
            retries,
            ledger: Mutex::new(BTreeSet::new()),
            files: Mutex::new(BTreeSet::new()),
        }
    }

    /// Reuse unchanged files from a previous output tree.
    #[must_use]
    pub fn with_baseline(mut self, baseline: impl Into<PathBuf>) -> Self {
        self.baseline = Some(baseline.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a page to its route's output file and record its path.
    pub fn write_page(&self, route: &Route, html: &str) -> Result<WriteOutcome> {
        let outcome = self.write_file(&route.output_file, html.as_bytes())?;
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route.path.clone());
        Ok(outcome)
    }

    /// Write an auxiliary file (sitemap, robots) without touching the ledger.
    pub fn write_file(&self, relative: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
        let path = self.root.join(relative);
        let previous = self.baseline.as_ref().map(|b| b.join(relative));
        let outcome = with_retry(self.retries, || {
            write_if_changed(&path, previous.as_deref(), bytes)
        })
        .map_err(BuildError::write(&path))?;
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(relative.to_path_buf());
        debug!(path = %path.display(), ?outcome, "wrote file");
        Ok(outcome)
    }

    /// Canonical paths written so far.
    #[must_use]
    pub fn ledger(&self) -> BTreeSet<String> {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every file written so far, relative to the root.
    #[must_use]
    pub fn files(&self) -> BTreeSet<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Whether an I/O error is worth retrying.
#[must_use]
pub fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

/// Run `op`, retrying transient failures up to `retries` extra times.
pub fn with_retry<T>(retries: u32, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if is_transient(e.kind()) && attempt < retries => {
                attempt += 1;
                warn!(error = %e, attempt, "transient write failure, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

fn write_if_changed(path: &Path, baseline: Option<&Path>, bytes: &[u8]) -> io::Result<WriteOutcome> {
    if holds(path, bytes) {
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // The existing file may share its inode with the baseline; never write
    // through it.
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    if let Some(previous) = baseline {
        if holds(previous, bytes) && fs::hard_link(previous, path).is_ok() {
            return Ok(WriteOutcome::Reused);
        }
    }

    fs::write(path, bytes)?;
    Ok(WriteOutcome::Written)
}

fn holds(path: &Path, bytes: &[u8]) -> bool {
    fs::read(path).is_ok_and(|existing| existing == bytes)
}
