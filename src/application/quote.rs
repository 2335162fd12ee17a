use crate::domain::breakdown::PriceBreakdown;
use crate::domain::money::Currency;
use crate::domain::package::PackageDefinition;
use crate::domain::ports::CatalogBox;
use crate::domain::pricing::{self, PriceRange};
use crate::domain::selection::SelectedOptions;
use crate::error::{PricingError, Result};
use serde::Serialize;

/// A package as shown in a listing, with its price range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageListing {
    pub slug: String,
    pub name: String,
    pub category: Option<String>,
    pub currency: Currency,
    pub range: PriceRange,
}

/// Entry point for pricing requests.
///
/// `QuoteService` resolves package slugs through the catalog and hands the
/// definition to the pure calculator. It holds no state besides the catalog,
/// so one instance can serve any number of concurrent requests.
pub struct QuoteService {
    catalog: CatalogBox,
}

impl QuoteService {
    /// Creates a new `QuoteService` over the given catalog.
    pub fn new(catalog: CatalogBox) -> Self {
        Self { catalog }
    }

    async fn package(&self, slug: &str) -> Result<PackageDefinition> {
        self.catalog
            .get(slug)
            .await?
            .ok_or_else(|| PricingError::PackageNotFound(slug.to_string()))
    }

    /// Prices `options` against the package named by `slug`.
    pub async fn quote(&self, slug: &str, options: &SelectedOptions) -> Result<PriceBreakdown> {
        let pkg = self.package(slug).await?;
        let breakdown = pricing::calculate(&pkg, options)?;
        tracing::debug!(
            package = slug,
            subtotal = breakdown.subtotal.minor_units(),
            discounts = breakdown.discounts.minor_units(),
            total = breakdown.total.minor_units(),
            "priced quote"
        );
        Ok(breakdown)
    }

    pub async fn price_range(&self, slug: &str) -> Result<PriceRange> {
        let pkg = self.package(slug).await?;
        pricing::price_range(&pkg)
    }

    /// Every package in the catalog with its price range, ordered by slug.
    pub async fn listings(&self) -> Result<Vec<PackageListing>> {
        self.catalog
            .all()
            .await?
            .into_iter()
            .map(|pkg| {
                let range = pricing::price_range(&pkg)?;
                Ok(PackageListing {
                    slug: pkg.slug,
                    name: pkg.name,
                    category: pkg.category,
                    currency: pkg.currency,
                    range,
                })
            })
            .collect()
    }
}
