use crate::domain::package::PackageDefinition;
use crate::domain::ports::PackageCatalog;
use crate::error::{PricingError, Result};
use crate::infrastructure::json_file::CatalogDocument;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const BUILTIN_CATALOG: &str = include_str!("../../data/packages.json");

/// A thread-safe in-memory package catalog.
///
/// Uses `Arc<RwLock<BTreeMap<String, PackageDefinition>>>` so clones share the
/// same packages and listings come back in slug order. Every package is
/// validated on the way in.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    packages: Arc<RwLock<BTreeMap<String, PackageDefinition>>>,
}

impl InMemoryCatalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of packages, rejecting invalid definitions
    /// and duplicate slugs.
    pub fn from_packages(packages: impl IntoIterator<Item = PackageDefinition>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for pkg in packages {
            insert_checked(&mut map, pkg)?;
        }
        Ok(Self {
            packages: Arc::new(RwLock::new(map)),
        })
    }

    /// The storefront's own packages, embedded at build time.
    pub fn builtin() -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(BUILTIN_CATALOG)?;
        Self::from_packages(document.packages)
    }

    pub async fn insert(&self, pkg: PackageDefinition) -> Result<()> {
        let mut packages = self.packages.write().await;
        insert_checked(&mut packages, pkg)
    }

    pub async fn len(&self) -> usize {
        self.packages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.packages.read().await.is_empty()
    }
}

fn insert_checked(
    map: &mut BTreeMap<String, PackageDefinition>,
    pkg: PackageDefinition,
) -> Result<()> {
    pkg.validate()?;
    if map.contains_key(&pkg.slug) {
        return Err(PricingError::InvalidCatalog(format!(
            "duplicate package slug {}",
            pkg.slug
        )));
    }
    map.insert(pkg.slug.clone(), pkg);
    Ok(())
}

#[async_trait]
impl PackageCatalog for InMemoryCatalog {
    async fn get(&self, slug: &str) -> Result<Option<PackageDefinition>> {
        let packages = self.packages.read().await;
        Ok(packages.get(slug).cloned())
    }

    async fn all(&self) -> Result<Vec<PackageDefinition>> {
        let packages = self.packages.read().await;
        Ok(packages.values().cloned().collect())
    }
}
