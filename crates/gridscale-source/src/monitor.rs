//! Policy directory change monitor.
//!
//! A polling loop that fingerprints every policy file each tick and
//! reports the paths whose contents changed (including files that
//! appeared or disappeared). The monitor never decodes anything — the
//! consumer re-loads the changed files itself, so decode failures stay on
//! the load path where they are reported properly.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::discover::discover;
use crate::error::{SourceError, SourceResult};

/// Watches a policy directory for content changes.
pub struct Monitor {
    dir: PathBuf,
    recursive: bool,
    interval: Duration,
}

impl Monitor {
    /// Create a monitor over `dir`, polling at `interval`.
    pub fn new(dir: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            recursive: false,
            interval,
        }
    }

    /// Also watch subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Run the monitor loop until `shutdown` flips or the change receiver
    /// is dropped. Each tick sends the sorted list of changed paths, if
    /// any, over `changes`.
    pub async fn run(
        self,
        changes: mpsc::Sender<Vec<PathBuf>>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut fingerprints = HashMap::new();
        // Prime the baseline so only edits after startup count as changes.
        if let Err(e) = self.scan(&mut fingerprints) {
            warn!(error = %e, "initial policy scan failed");
        }

        info!(
            dir = %self.dir.display(),
            interval = ?self.interval,
            "policy monitor started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    match self.scan(&mut fingerprints) {
                        Ok(changed) if !changed.is_empty() => {
                            debug!(count = changed.len(), "policy files changed");
                            if changes.send(changed).await.is_err() {
                                // Receiver gone; nobody left to notify.
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "policy scan failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("policy monitor shutting down");
                    break;
                }
            }
        }
    }

    /// Re-fingerprint the directory, replacing `fingerprints` and
    /// returning the paths that differ from the previous pass.
    fn scan(&self, fingerprints: &mut HashMap<PathBuf, String>) -> SourceResult<Vec<PathBuf>> {
        let mut current = HashMap::new();
        for path in discover(&self.dir, self.recursive)? {
            let hash = fingerprint(&path)?;
            current.insert(path, hash);
        }

        let mut changed: Vec<PathBuf> = Vec::new();
        for (path, hash) in &current {
            if fingerprints.get(path) != Some(hash) {
                changed.push(path.clone());
            }
        }
        // Deleted files are changes too.
        for path in fingerprints.keys() {
            if !current.contains_key(path) {
                changed.push(path.clone());
            }
        }
        changed.sort();

        *fingerprints = current;
        Ok(changed)
    }
}

fn fingerprint(path: &Path) -> SourceResult<String> {
    let bytes = fs::read(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
