use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Durable key-value blob store. One writer, no concurrent readers during a
/// write; the store serializes the full collection under a fixed key on
/// every mutation, so last write wins.
pub trait Storage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// On-disk storage: one `<key>.json` file per key inside a data directory.
#[derive(Debug)]
pub struct FileStorage {
    pub data_dir: PathBuf,
}

impl FileStorage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        info!(data_dir = %data_dir.display(), "opened storage");
        Ok(Self { data_dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            debug!(file = %path.display(), "no blob on disk");
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        debug!(file = %path.display(), bytes = raw.len(), "read blob");
        Ok(Some(raw))
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.blob_path(key);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

        debug!(file = %path.display(), bytes = value.len(), "wrote blob");
        Ok(())
    }
}

/// In-memory storage for tests and diskless embedders. Clones share the
/// same map, so a handle kept aside observes writes made through the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
