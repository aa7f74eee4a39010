use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gv_core::ExhibitionData;
use tracing::debug;

use crate::CatalogError;

/// Exhibition document stored as a JSON file
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file, parsing off the async runtime
    pub async fn read(&self) -> Result<ExhibitionData, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!("Read {} bytes from {:?}", bytes.len(), self.path);

        let data = tokio::task::spawn_blocking(move || serde_json::from_slice::<ExhibitionData>(&bytes)).await??;
        Ok(data)
    }
}

#[async_trait]
impl gv_core::data::CatalogSource for JsonFileSource {
    async fn load(&self) -> anyhow::Result<ExhibitionData> {
        self.read().await.map_err(|e| e.into())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
