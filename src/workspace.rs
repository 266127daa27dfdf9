//! Per-iteration workspace directories
//!
//! Each iteration gets an isolated directory with a minimal `package.json`,
//! named after the iteration number and a millisecond timestamp so
//! overlapping or repeated runs can't collide. The directory is removed on
//! drop, on every exit path out of the iteration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ChurnError, Result};

const WORKSPACE_PREFIX: &str = "temp_install";
const MANIFEST_FILE: &str = "package.json";
const MANIFEST_VERSION: &str = "1.0.0";

/// Minimal manifest npm needs to operate in a directory
#[derive(Debug, Serialize)]
struct Manifest {
    name: String,
    version: String,
}

/// Creates isolated workspace directories under a fixed root
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the workspace for one iteration
    ///
    /// Any filesystem failure propagates: a root we can't write to is an
    /// environment problem, not something worth retrying.
    pub fn create(&self, iteration: u32) -> Result<Workspace> {
        let stamp = Utc::now().timestamp_millis();
        let path = self
            .root
            .join(format!("{WORKSPACE_PREFIX}_{iteration}_{stamp}"));

        fs::create_dir_all(&path).map_err(|source| ChurnError::WorkspaceCreate {
            path: path.clone(),
            source,
        })?;

        let manifest = Manifest {
            name: format!("temp-project-{iteration}"),
            version: MANIFEST_VERSION.to_string(),
        };
        let body = serde_json::to_string_pretty(&manifest).map_err(|source| {
            ChurnError::WorkspaceCreate {
                path: path.clone(),
                source: source.into(),
            }
        })?;
        fs::write(path.join(MANIFEST_FILE), body).map_err(|source| {
            ChurnError::WorkspaceCreate {
                path: path.clone(),
                source,
            }
        })?;

        debug!("created workspace {}", path.display());
        Ok(Workspace { path })
    }
}

/// A live workspace directory, removed when dropped
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        remove_workspace(&self.path);
    }
}

/// Best-effort recursive removal of a workspace directory
///
/// Idempotent: an already-absent path is not an error. Other failures are
/// logged and swallowed so cleanup never masks the iteration's own outcome.
pub fn remove_workspace(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => debug!("removed workspace {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to remove workspace {}: {}", path.display(), err),
    }
}
