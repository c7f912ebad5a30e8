//! JSON-file history store
//!
//! A pretty-printed UTF-8 JSON array of previously posted strings. The file
//! is read whole at run start and rewritten whole at run end; there is no
//! locking and no incremental append.

use async_trait::async_trait;
use memo_poster_domain::{HistoryError, HistoryStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// History store backed by a single JSON file
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn load(&self) -> Result<Vec<String>, HistoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // A first run has no history file yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(HistoryError::Io(e)),
        };

        serde_json::from_str(&content).map_err(|e| HistoryError::Parse(e.to_string()))
    }

    async fn save(&self, entries: &[String], cap: usize) -> Result<(), HistoryError> {
        let tail = if entries.len() > cap {
            &entries[entries.len() - cap..]
        } else {
            entries
        };

        let json = serde_json::to_string_pretty(tail)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
