//! Heatmap Artifact Writer
//!
//! Writes the bare coin array and the metadata-wrapped document. Both are
//! serialized up front, staged to uniquely named temp files in the output
//! directory, then renamed over the targets so readers never see a
//! half-written file, even when two runs overlap.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::{HeatmapMeta, OutputBundle};

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "data";
/// Bare array artifact
pub const DEFAULT_HEATMAP_FILE: &str = "crypto_heatmap.json";
/// Metadata-wrapped artifact
pub const DEFAULT_META_FILE: &str = "crypto_heatmap_meta.json";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize heatmap: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid heatmap document: {source}")]
    DeserializationError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the two artifacts go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub heatmap_file: String,
    pub meta_file: String,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            heatmap_file: DEFAULT_HEATMAP_FILE.to_string(),
            meta_file: DEFAULT_META_FILE.to_string(),
        }
    }

    pub fn heatmap_path(&self) -> PathBuf {
        self.dir.join(&self.heatmap_file)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(&self.meta_file)
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

/// Writes and reads heatmap artifacts under one directory
#[derive(Debug, Clone)]
pub struct HeatmapWriter {
    paths: OutputPaths,
}

impl HeatmapWriter {
    pub fn new(paths: OutputPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Write both artifacts, replacing any previous run's output
    pub fn write(&self, bundle: &OutputBundle) -> Result<(), PersistError> {
        fs::create_dir_all(&self.paths.dir).map_err(|source| PersistError::DirectoryError {
            path: self.paths.dir.clone(),
            source,
        })?;

        // Compact array for the page, pretty metadata document for humans
        let heatmap = serde_json::to_vec(&bundle.coins)?;
        let meta = serde_json::to_vec_pretty(&bundle.to_meta())?;

        let heatmap_path = self.paths.heatmap_path();
        let meta_path = self.paths.meta_path();

        // Staged files not yet committed are removed on drop
        let heatmap_staged = stage(&self.paths.dir, &heatmap_path, &heatmap)?;
        let meta_staged = stage(&self.paths.dir, &meta_path, &meta)?;

        commit(heatmap_staged, &heatmap_path)?;
        commit(meta_staged, &meta_path)?;

        tracing::info!(
            "Saved {} coins to {} and {}",
            bundle.total_coins(),
            heatmap_path.display(),
            meta_path.display()
        );

        Ok(())
    }

    /// Load the metadata-wrapped artifact
    pub fn load_meta(&self) -> Result<HeatmapMeta, PersistError> {
        load_meta(&self.paths.meta_path())
    }
}

/// Load a metadata-wrapped artifact from disk
pub fn load_meta(path: &Path) -> Result<HeatmapMeta, PersistError> {
    let content = fs::read(path).map_err(|source| PersistError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&content).map_err(|source| PersistError::DeserializationError {
        path: path.to_path_buf(),
        source,
    })
}

/// Hidden prefix for staging files: `.crypto_heatmap.json.XXXXXX.tmp`
fn staging_prefix(target: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    if let Some(name) = target.file_name() {
        prefix.push(name);
    }
    prefix.push(".");
    prefix
}

/// Write `content` to a fresh temp file next to `target`
fn stage(dir: &Path, target: &Path, content: &[u8]) -> Result<NamedTempFile, PersistError> {
    let write_err = |source| PersistError::WriteError { path: target.to_path_buf(), source };

    let mut file = tempfile::Builder::new()
        .prefix(&staging_prefix(target))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    file.write_all(content).map_err(write_err)?;

    // Temp files are created owner-only; the artifacts are served to readers
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    file.as_file().sync_all().map_err(write_err)?;
    Ok(file)
}

fn commit(staged: NamedTempFile, target: &Path) -> Result<(), PersistError> {
    staged.persist(target).map(|_| ()).map_err(|e| PersistError::WriteError {
        path: target.to_path_buf(),
        source: e.error,
    })
}
