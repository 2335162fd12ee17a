use crate::domain::audit::{self, AuditReport, PackageAudit};
use crate::domain::ports::CatalogBox;
use crate::error::{PricingError, Result};

/// Audits catalog prices against the product list prices.
pub struct AuditService {
    catalog: CatalogBox,
}

impl AuditService {
    pub fn new(catalog: CatalogBox) -> Self {
        Self { catalog }
    }

    pub async fn audit(&self, slug: &str) -> Result<PackageAudit> {
        let pkg = self
            .catalog
            .get(slug)
            .await?
            .ok_or_else(|| PricingError::PackageNotFound(slug.to_string()))?;
        audit::audit_package(&pkg)
    }

    /// Audits every package, in slug order.
    pub async fn report(&self) -> Result<AuditReport> {
        let results = self
            .catalog
            .all()
            .await?
            .iter()
            .map(audit::audit_package)
            .collect::<Result<Vec<_>>>()?;
        let report = AuditReport::from(results);
        tracing::debug!(
            packages = report.summary.total,
            flagged = report.summary.total - report.summary.ok,
            "audited catalog"
        );
        Ok(report)
    }
}
