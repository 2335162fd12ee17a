//! Package price audit.
//!
//! Rebuilds what a package would cost if its parts were bought one by one,
//! takes the bundle discount off, and compares the result with the listed
//! base price. Listed prices that drift too far from that reference are
//! flagged for review.

use super::money::{Currency, Money};
use super::package::{Hardware, PackageDefinition, StorageLabel};
use super::reference_prices::{
    Accessory, CameraGrade, ServiceTier, UpsRating, drive_price, nvr_price,
};
use crate::error::{PricingError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Share of the parts total knocked off for buying them as a package.
pub const BUNDLE_DISCOUNT_PERCENT: u32 = 15;

/// A listed price more than this far below the reference is too low.
const TOO_LOW_BELOW_PERCENT: i64 = -10;
/// A listed price more than this far above the reference is too high.
const TOO_HIGH_ABOVE_PERCENT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditStatus {
    Ok,
    TooLow,
    TooHigh,
    MissingData,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::TooLow => "too-low",
            AuditStatus::TooHigh => "too-high",
            AuditStatus::MissingData => "missing-data",
        }
    }

    /// Status for a listed price `difference_percent` away from the reference.
    /// The band is lopsided: overpricing is tolerated further than
    /// underpricing.
    pub fn classify(difference_percent: Decimal) -> Self {
        if difference_percent < Decimal::from(TOO_LOW_BELOW_PERCENT) {
            AuditStatus::TooLow
        } else if difference_percent > Decimal::from(TOO_HIGH_ABOVE_PERCENT) {
            AuditStatus::TooHigh
        } else {
            AuditStatus::Ok
        }
    }
}

/// Reference cost of each part of a package, before the bundle discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceComponents {
    pub cameras: Money,
    pub nvr: Money,
    pub storage: Money,
    pub ups: Money,
    pub installation: Money,
    pub maintenance: Money,
    pub accessories: Money,
}

impl ReferenceComponents {
    pub fn checked_sum(&self) -> Option<Money> {
        [
            self.cameras,
            self.nvr,
            self.storage,
            self.ups,
            self.installation,
            self.maintenance,
            self.accessories,
        ]
        .into_iter()
        .try_fold(Money::ZERO, Money::checked_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAudit {
    pub package_slug: String,
    pub name: String,
    pub currency: Currency,
    pub listed_price: Money,
    pub components: ReferenceComponents,
    pub bundle_discount: Money,
    pub reference_price: Money,
    /// Listed minus reference, in minor units. Negative when underpriced.
    pub difference: i128,
    /// `difference` as a percentage of the listed price, to two places.
    pub difference_percent: Decimal,
    pub status: AuditStatus,
    pub issues: Vec<String>,
}

/// Audits one package against the product list prices.
pub fn audit_package(pkg: &PackageDefinition) -> Result<PackageAudit> {
    pkg.validate()?;

    let mut issues = Vec::new();
    let mut missing_data = false;

    let unspecified = Hardware::default();
    let hardware = match &pkg.hardware {
        Some(hardware) => hardware,
        None => {
            issues.push("hardware specification is not set".to_string());
            missing_data = true;
            &unspecified
        }
    };

    let cameras = pkg.camera_range.default;
    if cameras == 0 {
        issues.push("default camera count is not set".to_string());
    }

    let capacity_tb = pkg
        .standard_storage
        .as_ref()
        .and_then(StorageLabel::capacity_gb)
        .map(|gb| gb / 1000);
    if capacity_tb.is_none() {
        issues.push("standard storage capacity is not set".to_string());
    }

    let overflow = || {
        PricingError::InvalidCatalog(format!(
            "{}: reference price overflows the money range",
            pkg.slug
        ))
    };

    let components = ReferenceComponents {
        cameras: CameraGrade::for_hardware(hardware, pkg.standard_ai)
            .unit_price()
            .checked_times(cameras)
            .ok_or_else(overflow)?,
        nvr: nvr_price(hardware.nvr_channels),
        storage: drive_price(capacity_tb.unwrap_or(1)),
        ups: hardware
            .ups
            .as_deref()
            .and_then(UpsRating::from_model)
            .map(UpsRating::price)
            .unwrap_or(Money::ZERO),
        installation: if pkg.installation.included {
            Money::ZERO
        } else {
            ServiceTier::for_camera_count(cameras).installation_price()
        },
        maintenance: pkg
            .maintenance
            .filter(|m| !m.optional)
            .map(|_| maintenance_tier(pkg).maintenance_price())
            .unwrap_or(Money::ZERO),
        accessories: pkg
            .addons
            .iter()
            .filter(|addon| !addon.optional)
            .filter_map(|addon| Accessory::from_addon_id(&addon.id))
            .try_fold(Money::ZERO, |acc, accessory| acc.checked_add(accessory.price()))
            .ok_or_else(overflow)?,
    };

    let parts_total = components.checked_sum().ok_or_else(overflow)?;
    let bundle_discount = parts_total
        .percent(Decimal::from(BUNDLE_DISCOUNT_PERCENT))
        .ok_or_else(overflow)?;
    let reference_price = parts_total.saturating_sub(bundle_discount);

    let listed_price = pkg.base;
    let difference =
        i128::from(listed_price.minor_units()) - i128::from(reference_price.minor_units());

    let (difference_percent, status) = if listed_price.is_zero() {
        issues.push("base price is not set".to_string());
        (Decimal::ZERO, AuditStatus::MissingData)
    } else {
        let exact = Decimal::from_i128_with_scale(difference, 0) * Decimal::ONE_HUNDRED
            / Decimal::from(listed_price.minor_units());
        let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let status = AuditStatus::classify(exact);
        match status {
            AuditStatus::TooLow => issues.push(format!(
                "listed price is {}% below the reference price",
                rounded.abs().round_dp(1)
            )),
            AuditStatus::TooHigh => issues.push(format!(
                "listed price is {}% above the reference price",
                rounded.round_dp(1)
            )),
            _ => {}
        }
        let status = if missing_data {
            AuditStatus::MissingData
        } else {
            status
        };
        (rounded, status)
    };

    Ok(PackageAudit {
        package_slug: pkg.slug.clone(),
        name: pkg.name.clone(),
        currency: pkg.currency,
        listed_price,
        components,
        bundle_discount,
        reference_price,
        difference,
        difference_percent,
        status,
        issues,
    })
}

/// Maintenance contracts scale with the kind of customer, then with size.
fn maintenance_tier(pkg: &PackageDefinition) -> ServiceTier {
    match pkg.category.as_deref() {
        Some("Enterprise") => ServiceTier::Enterprise,
        Some("Commercial") => ServiceTier::Advanced,
        _ if pkg.camera_range.default >= 8 => ServiceTier::Standard,
        _ => ServiceTier::Basic,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total: usize,
    pub ok: usize,
    pub too_low: usize,
    pub too_high: usize,
    pub missing_data: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub results: Vec<PackageAudit>,
}

impl From<Vec<PackageAudit>> for AuditReport {
    fn from(results: Vec<PackageAudit>) -> Self {
        let mut summary = AuditSummary {
            total: results.len(),
            ..AuditSummary::default()
        };
        for audit in &results {
            match audit.status {
                AuditStatus::Ok => summary.ok += 1,
                AuditStatus::TooLow => summary.too_low += 1,
                AuditStatus::TooHigh => summary.too_high += 1,
                AuditStatus::MissingData => summary.missing_data += 1,
            }
        }
        Self { summary, results }
    }
}
