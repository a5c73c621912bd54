use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs;

use crate::error::AppResult;
use crate::store::{PromptMap, PromptStore};
use crate::utils::fs_ops::write_atomic;

/// Store backed by one pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PromptStore for JsonFileStore {
    async fn load(&self) -> AppResult<PromptMap> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PromptMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, prompts: &PromptMap) -> AppResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        prompts.serialize(&mut ser)?;

        write_atomic(&self.path, &buf).await?;
        tracing::debug!(path = %self.path.display(), records = prompts.len(), "Saved prompt store");
        Ok(())
    }
}
