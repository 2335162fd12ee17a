use crate::domain::package::PackageDefinition;
use crate::domain::ports::PackageCatalog;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryCatalog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk catalog layout: `{ "packages": [ ... ] }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub packages: Vec<PackageDefinition>,
}

/// A catalog read once from a JSON file and served from memory.
///
/// The file is parsed and every package validated when it is opened, so a
/// malformed catalog fails at startup rather than at quote time.
#[derive(Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
    inner: InMemoryCatalog,
}

impl JsonFileCatalog {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path).await?;
        let document: CatalogDocument = serde_json::from_str(&raw)?;
        let count = document.packages.len();
        let inner = InMemoryCatalog::from_packages(document.packages)?;
        tracing::debug!(path = %path.display(), packages = count, "loaded catalog");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PackageCatalog for JsonFileCatalog {
    async fn get(&self, slug: &str) -> Result<Option<PackageDefinition>> {
        self.inner.get(slug).await
    }

    async fn all(&self) -> Result<Vec<PackageDefinition>> {
        self.inner.all().await
    }
}
