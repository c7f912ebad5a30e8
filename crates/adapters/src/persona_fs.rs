//! Filesystem-based persona loader

use async_trait::async_trait;
use memo_poster_domain::{Persona, PersonaError, PersonaRepo};
use std::path::{Path, PathBuf};

/// Loads the persona document from a YAML file
pub struct FsPersonaRepo {
    path: PathBuf,
}

impl FsPersonaRepo {
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
impl PersonaRepo for FsPersonaRepo {
    async fn load(&self) -> Result<Persona, PersonaError> {
        let content = tokio::fs::read_to_string(&self.path).await?;

        // An empty document is a valid persona with all defaults
        if content.trim().is_empty() {
            return Ok(Persona::default());
        }

        serde_yaml_ng::from_str(&content).map_err(|e| PersonaError::Parse {
            file: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}
