//! Snapshot store — JSON persistence for serialized guild data.
//!
//! All I/O goes through the `FileSystem` port so the store works with
//! the live adapter in production and an in-memory map in tests. The
//! snapshot is written exactly once per run, after serialization has
//! fully succeeded.

use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::model::Snapshot;

/// File name used when the CLI does not name one.
pub const DEFAULT_SNAPSHOT_FILE: &str = "guildData.json";

/// Resolves the snapshot path from the optional CLI argument.
///
/// A bare name without an extension gets `.json` appended; an absent
/// argument falls back to [`DEFAULT_SNAPSHOT_FILE`].
#[must_use]
pub fn resolve_snapshot_path(name: Option<&str>) -> PathBuf {
    match name {
        None => PathBuf::from(DEFAULT_SNAPSHOT_FILE),
        Some(name) => {
            let path = PathBuf::from(name);
            if path.extension().is_some() {
                path
            } else {
                PathBuf::from(format!("{name}.json"))
            }
        }
    }
}

/// Persistence layer for snapshots.
pub struct SnapshotStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SnapshotStore<'a> {
    /// Creates a store over the context's filesystem port.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns whether a snapshot file exists at the given path.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        self.ctx.fs.exists(path)
    }

    /// Writes a snapshot as a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] if serialization or the
    /// write fails.
    pub fn save(&self, path: &Path, snapshot: &Snapshot) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| PipelineError::Persistence(format!("failed to serialize snapshot: {e}")))?;
        self.ctx.fs.write(path, &json).map_err(|e| {
            PipelineError::Persistence(format!("failed to write {}: {e}", path.display()))
        })
    }

    /// Loads a snapshot from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingBackup`] when no file exists at
    /// the path, or [`PipelineError::Persistence`] when it cannot be
    /// read or parsed.
    pub fn load(&self, path: &Path) -> Result<Snapshot, PipelineError> {
        if !self.ctx.fs.exists(path) {
            return Err(PipelineError::MissingBackup(path.to_path_buf()));
        }
        let contents = self.ctx.fs.read_to_string(path).map_err(|e| {
            PipelineError::Persistence(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PipelineError::Persistence(format!("failed to parse {}: {e}", path.display()))
        })
    }
}
