use super::package::PackageDefinition;
use crate::error::Result;
use async_trait::async_trait;

/// Resolves package slugs to their definitions.
#[async_trait]
pub trait PackageCatalog: Send + Sync {
    async fn get(&self, slug: &str) -> Result<Option<PackageDefinition>>;
    /// Every package, ordered by slug.
    async fn all(&self) -> Result<Vec<PackageDefinition>>;
}

pub type CatalogBox = Box<dyn PackageCatalog>;
pub type CatalogFactory = Box<dyn Fn() -> CatalogBox + Send + Sync>;
