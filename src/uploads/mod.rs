//! Upload storage.
//!
//! Files land in a single directory under their client-supplied name.
//! Names are never reused: if `scan.png` is taken the file is stored as
//! `scan-1.png`, then `scan-2.png`, and so on. Each name is claimed with
//! `create_new`, so two concurrent uploads of the same name cannot
//! overwrite each other.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{AppError, Result};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Message returned for any path chat cannot use.
pub const FILE_NOT_FOUND: &str = "File not found.";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the uploads directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `data` under `filename` and return the path it was stored at.
    ///
    /// Directory components in `filename` are dropped.
    pub async fn store(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let name = base_name(filename)
            .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;

        self.ensure_dir()
            .await
            .map_err(|e| AppError::Processing(format!("Cannot create uploads directory: {}", e)))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = self.dir.join(versioned_name(name, attempt));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await;

            match opened {
                Ok(file) => {
                    write_claimed(file, &candidate, data).await?;
                    info!("Stored upload {} ({} bytes)", candidate.display(), data.len());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} already taken", candidate.display());
                }
                Err(e) => {
                    return Err(AppError::Processing(format!(
                        "Cannot write {}: {}",
                        candidate.display(),
                        e
                    )))
                }
            }
        }

        Err(AppError::Processing(format!(
            "No free name left for {}",
            name
        )))
    }

    /// Map a client-supplied path to a file inside the uploads directory.
    ///
    /// Missing files and paths that escape the directory are both reported
    /// as `NotFound`.
    pub async fn resolve(&self, path: &str) -> Result<PathBuf> {
        let not_found = || AppError::NotFound(FILE_NOT_FOUND.to_string());

        let root = tokio::fs::canonicalize(&self.dir)
            .await
            .map_err(|_| not_found())?;

        let resolved = match tokio::fs::canonicalize(path).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(AppError::Processing(e.to_string())),
        };

        if !resolved.starts_with(&root) {
            debug!("Rejected path outside uploads directory: {}", path);
            return Err(not_found());
        }

        Ok(resolved)
    }

    /// Resolve `path` and read the whole file.
    pub async fn read(&self, path: &str) -> Result<Bytes> {
        let resolved = self.resolve(path).await?;
        match tokio::fs::read(&resolved).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(FILE_NOT_FOUND.to_string()))
            }
            Err(e) => Err(AppError::Processing(e.to_string())),
        }
    }
}

/// Fill a freshly claimed file. On failure the partial file is removed so
/// the name does not point at truncated data.
async fn write_claimed<W>(mut file: W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(data).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!("Cannot remove partial upload {}: {}", path.display(), cleanup);
        }
        return Err(AppError::Processing(format!(
            "Cannot write {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Last path component of `filename`, treating `/` and `\` as separators.
fn base_name(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?;
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// `name` for the first attempt, then `stem-N.ext`.
fn versioned_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, attempt, ext),
        _ => format!("{}-{}", name, attempt),
    }
}
