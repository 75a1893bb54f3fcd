//! Checkpoint/resume over the output file.
//!
//! The CSV at the output path is both the deliverable and the only resume
//! signal. A work unit is done when at least one row names it in
//! `search_area`. Saves rewrite the whole file through a temporary sibling
//! that is synced and then renamed over the destination, so a crash mid-save
//! leaves the previous file intact.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use storepulse_core::ReviewRecord;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CheckpointError {
    #[error("failed to read checkpoint {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write checkpoint {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to replace {path} with the new checkpoint: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Rows recovered from a previous run.
#[derive(Debug, Default)]
pub(crate) struct Resumed {
    pub records: Vec<ReviewRecord>,
    /// Lowercased names of units with at least one persisted row.
    pub done_units: HashSet<String>,
}

impl Resumed {
    pub(crate) fn is_done(&self, unit_name: &str) -> bool {
        self.done_units.contains(&unit_name.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Read previously persisted rows. A missing file is an empty resume.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Read`] if the file exists but a row cannot
    /// be decoded. Resuming past a corrupt file would silently redo or drop
    /// work, so this is fatal.
    pub(crate) fn load(&self) -> Result<Resumed, CheckpointError> {
        if !self.path.exists() {
            return Ok(Resumed::default());
        }

        let read_err = |source| CheckpointError::Read {
            path: self.path.display().to_string(),
            source,
        };
        let mut reader = csv::Reader::from_path(&self.path).map_err(read_err)?;
        let records = reader
            .deserialize::<ReviewRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;

        let done_units = records
            .iter()
            .map(|r| r.search_area.trim())
            .filter(|area| !area.is_empty())
            .map(str::to_lowercase)
            .collect();

        Ok(Resumed {
            records,
            done_units,
        })
    }

    /// Atomically replace the output file with `records`.
    ///
    /// An empty batch writes nothing, leaving any existing file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Write`] if the temporary file cannot be
    /// created or written, and [`CheckpointError::Persist`] if it cannot be
    /// moved into place.
    pub(crate) fn save(&self, records: &[ReviewRecord]) -> Result<usize, CheckpointError> {
        if records.is_empty() {
            return Ok(0);
        }

        let path = self.path.display().to_string();
        let write_err = |source: csv::Error| CheckpointError::Write {
            path: path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| write_err(e.into()))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_err(e.into()))?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            for record in records {
                writer.serialize(record).map_err(write_err)?;
            }
            writer.flush().map_err(|e| write_err(e.into()))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| write_err(e.into()))?;

        tmp.persist(&self.path)
            .map_err(|e| CheckpointError::Persist {
                path: path.clone(),
                source: e.error,
            })?;

        tracing::debug!(path = %path, rows = records.len(), "checkpoint saved");
        Ok(records.len())
    }
}
