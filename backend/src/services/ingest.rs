//! File ingestion service
//!
//! Copies user-selected files into the data directory the populate command
//! reads from. Copies are independent: one bad file never undoes the others.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

/// Errors raised while ingesting files
#[derive(Error, Debug)]
pub enum IngestError {
    /// The data directory could not be created
    #[error("Failed to create data directory {path}: {source}")]
    CreateDataDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Source file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Source exists but is not a regular file
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// Source already is the destination file
    #[error("File is already in the data directory: {0}")]
    SameFile(PathBuf),

    /// Source path ends in `..` or is a root
    #[error("Path has no file name: {0}")]
    NoFileName(PathBuf),

    /// Copy itself failed
    #[error("Failed to copy {path}: {source}")]
    CopyFailed {
        /// Source file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// One file that could not be ingested
#[derive(Debug)]
pub struct IngestFailure {
    /// The file the user selected
    pub path: PathBuf,
    /// Why it was not copied
    pub error: IngestError,
}

/// Outcome of one ingest batch
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Destination paths of the files that were copied
    pub copied: Vec<PathBuf>,
    /// Files that were not copied
    pub failed: Vec<IngestFailure>,
}

impl IngestReport {
    /// Number of files the batch contained
    pub fn total(&self) -> usize {
        self.copied.len() + self.failed.len()
    }
}

/// File ingestion service
pub struct IngestService;

impl IngestService {
    /// Copy `files` into `data_dir`, creating the directory if needed
    ///
    /// File names are preserved and existing files are overwritten. Only a
    /// failure to create `data_dir` fails the whole batch; per-file failures
    /// are collected in the report.
    pub async fn copy_into(data_dir: &Path, files: &[PathBuf]) -> Result<IngestReport, IngestError> {
        fs::create_dir_all(data_dir)
            .await
            .map_err(|source| IngestError::CreateDataDir {
                path: data_dir.to_path_buf(),
                source,
            })?;

        let mut report = IngestReport::default();
        for file in files {
            match Self::copy_one(data_dir, file).await {
                Ok(dest) => {
                    info!(file = %file.display(), dest = %dest.display(), "File added to data directory");
                    report.copied.push(dest);
                }
                Err(error) => {
                    warn!(file = %file.display(), error = %error, "Failed to add file");
                    report.failed.push(IngestFailure {
                        path: file.clone(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn copy_one(data_dir: &Path, file: &Path) -> Result<PathBuf, IngestError> {
        let metadata = fs::metadata(file).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                IngestError::FileNotFound(file.to_path_buf())
            } else {
                IngestError::CopyFailed {
                    path: file.to_path_buf(),
                    source,
                }
            }
        })?;
        if !metadata.is_file() {
            return Err(IngestError::NotAFile(file.to_path_buf()));
        }

        let name = file
            .file_name()
            .ok_or_else(|| IngestError::NoFileName(file.to_path_buf()))?;
        let dest = data_dir.join(name);

        // Copying a file onto itself truncates it before reading
        if Self::is_same_file(file, &dest).await {
            return Err(IngestError::SameFile(file.to_path_buf()));
        }

        fs::copy(file, &dest)
            .await
            .map_err(|source| IngestError::CopyFailed {
                path: file.to_path_buf(),
                source,
            })?;

        Ok(dest)
    }

    async fn is_same_file(file: &Path, dest: &Path) -> bool {
        match (fs::canonicalize(file).await, fs::canonicalize(dest).await) {
            (Ok(source), Ok(dest)) => source == dest,
            _ => false,
        }
    }
}
