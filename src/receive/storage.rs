//! Collects every file in an upload submission, then writes them out together.
//!
//! Part bodies are held in memory while the submission's combined total stays
//! under the memory budget; anything past that spills to an anonymous temp
//! file. Nothing reaches the destination until the whole batch has been read
//! and accepted.

use anyhow::Context;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use std::future::Future;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::common::constants::IO_TIMEOUT;
use crate::common::AppError;
use crate::utils::security;

/// Bytes of upload data that may still be buffered in memory.
struct MemoryBudget {
    remaining: usize,
}

impl MemoryBudget {
    fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    fn try_take(&mut self, bytes: usize) -> bool {
        match self.remaining.checked_sub(bytes) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }

    fn give_back(&mut self, bytes: usize) {
        self.remaining += bytes;
    }
}

enum Spool {
    Memory(Vec<u8>),
    Disk(File),
}

impl Spool {
    async fn write(&mut self, chunk: &[u8], budget: &mut MemoryBudget) -> std::io::Result<()> {
        match self {
            Spool::Memory(buf) if budget.try_take(chunk.len()) => {
                buf.extend_from_slice(chunk);
            }
            Spool::Memory(buf) => {
                let mut file = spill_file().await?;
                file.write_all(buf).await?;
                file.write_all(chunk).await?;
                budget.give_back(buf.len());
                tracing::debug!(buffered = buf.len(), "Upload part spilled to disk");
                *self = Spool::Disk(file);
            }
            Spool::Disk(file) => file.write_all(chunk).await?,
        }
        Ok(())
    }
}

async fn spill_file() -> std::io::Result<File> {
    let file = tokio::task::spawn_blocking(tempfile::tempfile)
        .await
        .map_err(std::io::Error::other)??;
    Ok(File::from_std(file))
}

/// One received file, held until the batch is accepted.
pub struct UploadEntry {
    file_name: String,
    size: u64,
    data: Spool,
}

impl UploadEntry {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self.data, Spool::Disk(_))
    }

    async fn write_to(self, path: &Path) -> std::io::Result<()> {
        let mut out = File::create(path).await?;
        match self.data {
            Spool::Memory(buf) => out.write_all(&buf).await?,
            Spool::Disk(mut spilled) => {
                spilled.flush().await?;
                spilled.seek(SeekFrom::Start(0)).await?;
                tokio::io::copy(&mut spilled, &mut out).await?;
            }
        }
        out.flush().await?;
        Ok(())
    }
}

/// All file parts of one submission, in the order they were declared.
pub struct UploadBatch {
    entries: Vec<UploadEntry>,
}

impl UploadBatch {
    /// Read every field of the submission. Non-file fields are drained and dropped.
    pub async fn collect(multipart: &mut Multipart, memory_limit: usize) -> Result<Self, AppError> {
        let mut budget = MemoryBudget::new(memory_limit);
        let mut entries = Vec::new();

        while let Some(field) = within_timeout(multipart.next_field()).await? {
            // An empty file input still submits a part, just without a name.
            let Some(declared) = field.file_name().filter(|n| !n.is_empty()) else {
                drain(field).await?;
                continue;
            };

            let file_name = security::upload_file_name(declared).map_err(|e| {
                AppError::BadRequest(format!("invalid file name {declared:?}: {e}"))
            })?;

            let entry = spool_field(field, file_name, &mut budget).await?;
            tracing::debug!(
                file = entry.file_name(),
                bytes = entry.size(),
                spilled = entry.is_spilled(),
                "Upload part received"
            );
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    /// All-or-nothing guard run before anything is written.
    pub fn ensure_allowed(&self, allow_multiple: bool) -> Result<(), AppError> {
        if self.is_empty() {
            return Err(AppError::BadRequest("no file found in upload".to_string()));
        }
        if self.len() > 1 && !allow_multiple {
            return Err(AppError::MultipleFiles);
        }
        Ok(())
    }

    /// Write every entry into `destination`, overwriting same-named files.
    ///
    /// Stops at the first failure. Files written before it are left in place.
    pub async fn persist(self, destination: &Path) -> Result<Vec<PathBuf>, AppError> {
        let mut saved = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let path = destination.join(&entry.file_name);
            let name = entry.file_name.clone();
            entry
                .write_to(&path)
                .await
                .with_context(|| format!("failed to save {name}"))?;

            tracing::info!(path = %path.display(), "Saved upload");
            saved.push(path);
        }

        Ok(saved)
    }
}

async fn spool_field(
    mut field: Field<'_>,
    file_name: String,
    budget: &mut MemoryBudget,
) -> Result<UploadEntry, AppError> {
    let mut data = Spool::Memory(Vec::new());
    let mut size = 0u64;

    while let Some(chunk) = within_timeout(field.chunk()).await? {
        size += chunk.len() as u64;
        data.write(&chunk, budget)
            .await
            .context("failed to buffer upload")?;
    }

    Ok(UploadEntry {
        file_name,
        size,
        data,
    })
}

async fn drain(mut field: Field<'_>) -> Result<(), AppError> {
    while within_timeout(field.chunk()).await?.is_some() {}
    Ok(())
}

/// Each read from the peer must make progress within `IO_TIMEOUT`.
async fn within_timeout<T>(
    read: impl Future<Output = Result<T, MultipartError>>,
) -> Result<T, AppError> {
    match tokio::time::timeout(IO_TIMEOUT, read).await {
        Ok(result) => result.map_err(malformed),
        Err(_) => Err(AppError::Timeout(IO_TIMEOUT.as_secs())),
    }
}

fn malformed(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("malformed upload: {}", err.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_refuses_past_limit_and_recovers() {
        let mut budget = MemoryBudget::new(10);
        assert!(budget.try_take(6));
        assert!(!budget.try_take(5));
        assert!(budget.try_take(4));
        budget.give_back(6);
        assert!(budget.try_take(6));
    }

    #[tokio::test]
    async fn spool_spills_when_budget_runs_out() {
        let mut budget = MemoryBudget::new(4);
        let mut spool = Spool::Memory(Vec::new());

        spool.write(b"abc", &mut budget).await.unwrap();
        assert!(matches!(spool, Spool::Memory(_)));

        spool.write(b"defg", &mut budget).await.unwrap();
        assert!(matches!(spool, Spool::Disk(_)));
        // Memory held by the spilled part is released for later parts.
        assert!(budget.try_take(4));

        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("out.bin");
        let entry = UploadEntry {
            file_name: "out.bin".to_string(),
            size: 7,
            data: spool,
        };
        entry.write_to(&target).await.unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"abcdefg");
    }
}
