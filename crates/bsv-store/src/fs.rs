use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bsv_types::{Block, Cid};

use crate::batch::{BatchFailure, BatchOutcome};
use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// File extension for block payload files.
const BLOCK_EXTENSION: &str = "data";

/// Configuration for [`FsBlockStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsStoreConfig {
    /// `fsync` each block file before it is renamed into place.
    pub sync_on_write: bool,
    /// Reject writes and deletes.
    pub read_only: bool,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            read_only: false,
        }
    }
}

/// Filesystem-backed block store.
///
/// Each block is one file named after the hex form of its multihash, placed in
/// a shard directory named by the two hex characters before the last one:
///
/// ```text
/// <root>/<shard>/<hex multihash>.data
/// ```
///
/// Writes go to a temporary file in the shard directory and are renamed into
/// place, so a reader never observes a partially written block. Blocking
/// filesystem work runs on the tokio blocking pool; a cancelled `put` either
/// lands the whole file or none of it.
pub struct FsBlockStore {
    root: PathBuf,
    config: FsStoreConfig,
}

impl FsBlockStore {
    /// Open (or create) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>, config: FsStoreConfig) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        match tokio::fs::metadata(&root).await {
            Ok(meta) if !meta.is_dir() => return Err(StoreError::NotADirectory(root)),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound && !config.read_only => {
                tokio::fs::create_dir_all(&root).await?;
            }
            Err(e) => return Err(e.into()),
        }
        info!(root = %root.display(), read_only = config.read_only, "opened block store");
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FsStoreConfig {
        &self.config
    }

    /// Path of the file holding the block named by `cid`.
    pub fn path_for(&self, cid: &Cid) -> PathBuf {
        let key = cid.key_hex();
        let n = key.len();
        self.root
            .join(&key[n - 3..n - 1])
            .join(format!("{key}.{BLOCK_EXTENSION}"))
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.config.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

/// Write `data` to `path` atomically via a temp file in the same directory.
fn write_block_file(path: &Path, data: &[u8], sync: bool) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "block path has no parent"))?;
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    if sync {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Backend(format!("blocking task failed: {e}")))
}

#[async_trait]
impl BlockStore for FsBlockStore {
    async fn has(&self, cid: &Cid) -> StoreResult<bool> {
        Ok(tokio::fs::try_exists(self.path_for(cid)).await?)
    }

    async fn get(&self, cid: &Cid) -> StoreResult<Option<Bytes>> {
        match tokio::fs::read(self.path_for(cid)).await {
            Ok(data) if data.is_empty() => Err(StoreError::Corrupt {
                key: cid.key_hex(),
                reason: "empty block file".into(),
            }),
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, block: &Block) -> StoreResult<()> {
        self.check_writable()?;
        if block.cid().is_null() {
            return Err(StoreError::NullKey);
        }
        let path = self.path_for(block.cid());
        let data = block.data().clone();
        let sync = self.config.sync_on_write;
        blocking(move || write_block_file(&path, &data, sync)).await??;
        debug!(cid = %block.cid(), len = block.len(), "stored block");
        Ok(())
    }

    async fn delete(&self, cid: &Cid) -> StoreResult<bool> {
        self.check_writable()?;
        match tokio::fs::remove_file(self.path_for(cid)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the whole batch from a single blocking task.
    async fn put_many(&self, blocks: &[Block]) -> StoreResult<BatchOutcome> {
        if self.config.read_only {
            let failed = blocks
                .iter()
                .enumerate()
                .map(|(index, block)| BatchFailure {
                    index,
                    cid: block.cid().clone(),
                    error: StoreError::ReadOnly,
                })
                .collect();
            return Ok(BatchOutcome::from_parts(Vec::new(), failed));
        }

        let jobs: Vec<(Cid, PathBuf, Bytes)> = blocks
            .iter()
            .map(|b| (b.cid().clone(), self.path_for(b.cid()), b.data().clone()))
            .collect();
        let sync = self.config.sync_on_write;

        let outcome = blocking(move || {
            let mut stored = Vec::with_capacity(jobs.len());
            let mut failed = Vec::new();
            for (index, (cid, path, data)) in jobs.into_iter().enumerate() {
                let result = if cid.is_null() {
                    Err(StoreError::NullKey)
                } else {
                    write_block_file(&path, &data, sync).map_err(StoreError::from)
                };
                match result {
                    Ok(()) => stored.push(cid),
                    Err(error) => failed.push(BatchFailure { index, cid, error }),
                }
            }
            BatchOutcome::from_parts(stored, failed)
        })
        .await?;

        debug!(
            stored = outcome.stored().len(),
            failed = outcome.failed().len(),
            "stored block batch"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for FsBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlockStore")
            .field("root", &self.root)
            .field("read_only", &self.config.read_only)
            .finish()
    }
}
