//! The package price calculator.
//!
//! `calculate` is a pure function of a package definition and a selection. It
//! either returns a complete breakdown or an error; nothing is partially
//! applied. Checkout and quote generation re-run it server-side rather than
//! trusting a submitted total.

use super::breakdown::{AppliedDiscount, Components, PriceBreakdown};
use super::money::Money;
use super::package::PackageDefinition;
use super::selection::{ResolvedSelection, SelectedOptions};
use crate::error::{PricingError, Result, TierKind};
use serde::Serialize;

pub fn calculate(pkg: &PackageDefinition, options: &SelectedOptions) -> Result<PriceBreakdown> {
    pkg.validate()?;
    validate_selection(pkg, options)?;

    let range = &pkg.camera_range;
    let cameras = options.cameras.unwrap_or(range.default);
    let additional_camera_count = cameras.saturating_sub(range.default);

    // Lookups cannot fail past validation; the fallbacks keep this total.
    let ai_upgrade = options
        .ai_detection
        .and_then(|level| pkg.ai_upgrade_tiers.get(&level).copied())
        .unwrap_or(Money::ZERO);
    let storage_upgrade = options
        .storage
        .as_ref()
        .and_then(|label| pkg.storage_upgrade_tiers.get(label).copied())
        .unwrap_or(Money::ZERO);
    let addons = options
        .selected_addon_ids
        .iter()
        .filter_map(|id| pkg.addon(id))
        .try_fold(Money::ZERO, |acc, addon| acc.checked_add(addon.price))
        .ok_or_else(|| overflow(pkg, "addons"))?;

    let installation = if options.include_installation && !pkg.installation.included {
        pkg.installation.price
    } else {
        Money::ZERO
    };

    let maintenance_applies = pkg
        .maintenance
        .is_some_and(|m| options.include_maintenance || !m.optional);
    let maintenance = match pkg.maintenance {
        Some(m) if maintenance_applies => m.annual,
        _ => Money::ZERO,
    };

    let components = Components {
        base: pkg.base,
        additional_cameras: pkg
            .price_per_additional_camera
            .checked_times(additional_camera_count)
            .ok_or_else(|| overflow(pkg, "additional cameras"))?,
        ai_upgrade,
        storage_upgrade,
        addons,
        installation,
        maintenance,
    };
    let subtotal = components
        .checked_sum()
        .ok_or_else(|| overflow(pkg, "subtotal"))?;

    let resolved = ResolvedSelection {
        cameras,
        ai: options.ai_detection.or(pkg.standard_ai),
        storage: options.storage.as_ref().or(pkg.standard_storage.as_ref()),
        addons: &options.selected_addon_ids,
        installation: options.include_installation || pkg.installation.included,
        maintenance: maintenance_applies,
    };

    let mut applied_discounts = Vec::new();
    let mut discounts = Money::ZERO;
    for rule in &pkg.discount_rules {
        if !rule.predicate.matches(&resolved) {
            continue;
        }
        let amount = subtotal.percent(rule.percentage).ok_or_else(|| {
            PricingError::InvalidCatalog(format!(
                "{}: discount '{}' of {}% cannot be applied to {}",
                pkg.slug,
                rule.predicate,
                rule.percentage,
                subtotal.minor_units()
            ))
        })?;
        discounts = discounts
            .checked_add(amount)
            .ok_or_else(|| overflow(pkg, "discounts"))?;
        applied_discounts.push(AppliedDiscount {
            condition: rule.predicate.to_string(),
            description: rule.description.clone(),
            percentage: rule.percentage,
            amount,
        });
    }

    Ok(PriceBreakdown {
        package_slug: pkg.slug.clone(),
        components,
        subtotal,
        discounts,
        total: subtotal.saturating_sub(discounts),
        currency: pkg.currency,
        applied_discounts,
        cameras,
        additional_camera_count,
        price_per_additional_camera: pkg.price_per_additional_camera,
        ai_detection: options.ai_detection,
        storage: options.storage.clone(),
        addon_ids: options.selected_addon_ids.iter().cloned().collect(),
    })
}

fn overflow(pkg: &PackageDefinition, what: &str) -> PricingError {
    PricingError::InvalidCatalog(format!("{}: {} overflow the money range", pkg.slug, what))
}

fn validate_selection(pkg: &PackageDefinition, options: &SelectedOptions) -> Result<()> {
    if let Some(cameras) = options.cameras {
        let range = &pkg.camera_range;
        if !range.contains(cameras) {
            let bound = if cameras < range.min { "minimum" } else { "maximum" };
            return Err(PricingError::InvalidSelection(format!(
                "cameras must be between {} and {} ({} is beyond the {})",
                range.min, range.max, cameras, bound
            )));
        }
    }

    if let Some(level) = options.ai_detection {
        if !pkg.ai_upgrade_tiers.contains_key(&level) {
            return Err(PricingError::UnknownTier {
                kind: TierKind::Ai,
                tier: level.to_string(),
            });
        }
    }

    if let Some(label) = &options.storage {
        if !pkg.storage_upgrade_tiers.contains_key(label) {
            return Err(PricingError::UnknownTier {
                kind: TierKind::Storage,
                tier: label.to_string(),
            });
        }
    }

    if let Some(unknown) = options
        .selected_addon_ids
        .iter()
        .find(|id| pkg.addon(id).is_none())
    {
        return Err(PricingError::UnknownAddon(unknown.clone()));
    }

    Ok(())
}

/// Lowest and highest totals a package can be configured to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// The "from" price uses the fewest cameras and nothing else; the ceiling picks
/// the most cameras, the dearest AI and storage tiers, every addon and
/// maintenance.
pub fn price_range(pkg: &PackageDefinition) -> Result<PriceRange> {
    let cheapest = SelectedOptions::default().with_cameras(pkg.camera_range.min);

    let mut dearest = SelectedOptions::default()
        .with_cameras(pkg.camera_range.max)
        .with_maintenance(true);
    dearest.ai_detection = pkg
        .ai_upgrade_tiers
        .iter()
        .max_by_key(|(level, price)| (**price, **level))
        .map(|(level, _)| *level);
    dearest.storage = pkg
        .storage_upgrade_tiers
        .iter()
        .max_by_key(|(label, price)| (**price, label.capacity_gb()))
        .map(|(label, _)| label.clone());
    dearest.selected_addon_ids = pkg.addons.iter().map(|a| a.id.clone()).collect();

    let min = calculate(pkg, &cheapest)?.total;
    let max = calculate(pkg, &dearest)?.total;
    Ok(PriceRange {
        min,
        max: max.max(min),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::package::tests::sample_package;
    use crate::domain::package::{AiLevel, CameraRange, Installation, Maintenance};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    /// The package from the pricing scenario: only base, cameras, one AI tier
    /// and one discount rule.
    fn scenario_package() -> PackageDefinition {
        let mut pkg = sample_package();
        pkg.camera_range = CameraRange {
            min: 4,
            max: 16,
            default: 4,
        };
        pkg.ai_upgrade_tiers = BTreeMap::from([(AiLevel::Advanced, Money::new(50000))]);
        pkg.storage_upgrade_tiers.clear();
        pkg.addons.clear();
        pkg.installation = Installation {
            included: true,
            price: Money::ZERO,
        };
        pkg.maintenance = None;
        pkg
    }

    #[test]
    fn test_concrete_scenario() {
        let pkg = scenario_package();
        let options = SelectedOptions::default()
            .with_cameras(8)
            .with_ai(AiLevel::Advanced);

        let b = calculate(&pkg, &options).unwrap();
        assert_eq!(b.components.base, Money::new(229000));
        assert_eq!(b.components.additional_cameras, Money::new(60000));
        assert_eq!(b.components.ai_upgrade, Money::new(50000));
        assert_eq!(b.subtotal, Money::new(339000));
        assert_eq!(b.discounts, Money::new(16950));
        assert_eq!(b.total, Money::new(322050));
        assert_eq!(b.applied_discounts.len(), 1);
        assert_eq!(b.applied_discounts[0].condition, "cameras > 6");
    }

    #[test]
    fn test_no_op_selection() {
        let pkg = sample_package();
        let b = calculate(&pkg, &SelectedOptions::default()).unwrap();
        assert_eq!(b.total, pkg.base);
        assert_eq!(b.subtotal, pkg.base);
        assert_eq!(b.components.addons, Money::ZERO);
        assert_eq!(b.components.installation, Money::ZERO);
        assert_eq!(b.cameras, 4);
    }

    #[test]
    fn test_mandatory_maintenance_is_always_charged() {
        let mut pkg = sample_package();
        pkg.maintenance = Some(Maintenance {
            annual: Money::new(150000),
            optional: false,
        });
        let b = calculate(&pkg, &SelectedOptions::default()).unwrap();
        assert_eq!(b.components.maintenance, Money::new(150000));
        assert_eq!(b.total, pkg.base + Money::new(150000));
    }

    #[test]
    fn test_optional_maintenance_follows_flag() {
        let pkg = sample_package();
        let b = calculate(&pkg, &SelectedOptions::default().with_maintenance(true)).unwrap();
        assert_eq!(b.components.maintenance, Money::new(80000));
    }

    #[test]
    fn test_installation_charged_when_not_bundled() {
        let pkg = sample_package();
        let b = calculate(&pkg, &SelectedOptions::default().with_installation(true)).unwrap();
        assert_eq!(b.components.installation, Money::new(40000));
    }

    #[test]
    fn test_bundled_installation_is_not_double_charged() {
        let mut pkg = sample_package();
        pkg.installation.included = true;
        let with = calculate(&pkg, &SelectedOptions::default().with_installation(true)).unwrap();
        let without = calculate(&pkg, &SelectedOptions::default()).unwrap();
        assert_eq!(with.total, without.total);
        assert_eq!(with.components.installation, Money::ZERO);
    }

    #[test]
    fn test_fewer_cameras_than_default_is_not_refunded() {
        let mut pkg = sample_package();
        pkg.camera_range.default = 6;
        let b = calculate(&pkg, &SelectedOptions::default().with_cameras(4)).unwrap();
        assert_eq!(b.components.additional_cameras, Money::ZERO);
    }

    #[test]
    fn test_camera_bounds() {
        let pkg = sample_package();
        assert!(calculate(&pkg, &SelectedOptions::default().with_cameras(4)).is_ok());
        assert!(calculate(&pkg, &SelectedOptions::default().with_cameras(16)).is_ok());

        let low = calculate(&pkg, &SelectedOptions::default().with_cameras(3));
        match low {
            Err(PricingError::InvalidSelection(msg)) => {
                assert!(msg.contains("cameras must be between 4 and 16"));
                assert!(msg.contains("minimum"));
            }
            other => panic!("expected InvalidSelection, got {other:?}"),
        }

        let high = calculate(&pkg, &SelectedOptions::default().with_cameras(17));
        assert!(matches!(high, Err(PricingError::InvalidSelection(msg)) if msg.contains("maximum")));
    }

    #[test]
    fn test_unknown_tiers_and_addons() {
        let pkg = sample_package();
        assert!(matches!(
            calculate(&pkg, &SelectedOptions::default().with_ai(AiLevel::Enterprise)),
            Err(PricingError::UnknownTier { kind: TierKind::Ai, .. })
        ));
        assert!(matches!(
            calculate(&pkg, &SelectedOptions::default().with_storage("64TB")),
            Err(PricingError::UnknownTier { kind: TierKind::Storage, .. })
        ));
        assert!(matches!(
            calculate(&pkg, &SelectedOptions::default().with_addon("drone")),
            Err(PricingError::UnknownAddon(id)) if id == "drone"
        ));
    }

    #[test]
    fn test_addons_and_storage() {
        let pkg = sample_package();
        let options = SelectedOptions::default()
            .with_storage("8TB")
            .with_addon("ups-house")
            .with_addon("gate-intercom");
        let b = calculate(&pkg, &options).unwrap();
        assert_eq!(b.components.storage_upgrade, Money::new(120000));
        assert_eq!(b.components.addons, Money::new(255000));
        assert_eq!(b.addon_ids, vec!["gate-intercom", "ups-house"]);
    }

    #[test]
    fn test_discounts_are_cumulative() {
        let mut pkg = sample_package();
        pkg.discount_rules.push(crate::domain::package::DiscountRule {
            predicate: "storage >= 8TB".parse().unwrap(),
            percentage: dec!(10),
            description: String::new(),
        });
        let options = SelectedOptions::default()
            .with_cameras(8)
            .with_storage("8TB");
        let b = calculate(&pkg, &options).unwrap();
        // 229000 + 60000 + 120000 = 409000; 5% = 20450; 10% = 40900
        assert_eq!(b.subtotal, Money::new(409000));
        assert_eq!(b.discounts, Money::new(61350));
        assert_eq!(b.total, Money::new(347650));
    }

    #[test]
    fn test_discount_uses_standard_storage_when_none_selected() {
        let mut pkg = sample_package();
        pkg.discount_rules = vec![crate::domain::package::DiscountRule {
            predicate: "storage >= 2TB".parse().unwrap(),
            percentage: dec!(1),
            description: String::new(),
        }];
        let b = calculate(&pkg, &SelectedOptions::default()).unwrap();
        assert_eq!(b.discounts, Money::new(2290));
    }

    #[test]
    fn test_full_discount_clamps_at_zero() {
        let mut pkg = sample_package();
        pkg.discount_rules.push(crate::domain::package::DiscountRule {
            predicate: "cameras >= 4".parse().unwrap(),
            percentage: dec!(100),
            description: String::new(),
        });
        let b = calculate(&pkg, &SelectedOptions::default().with_cameras(8)).unwrap();
        assert_eq!(b.total, Money::ZERO);
    }

    #[test]
    fn test_invalid_definition_fails_loudly() {
        let mut pkg = sample_package();
        pkg.camera_range.min = 10;
        assert!(matches!(
            calculate(&pkg, &SelectedOptions::default()),
            Err(PricingError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_overflowing_prices_are_rejected_not_wrapped() {
        let mut pkg = sample_package();
        pkg.base = Money::new(18_446_744_073_709_551_000);
        pkg.price_per_additional_camera = Money::new(1000);
        let result = calculate(&pkg, &SelectedOptions::default().with_cameras(5));
        assert!(matches!(result, Err(PricingError::InvalidCatalog(_))));
        assert!(matches!(price_range(&pkg), Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_line_items() {
        let pkg = scenario_package();
        let options = SelectedOptions::default()
            .with_cameras(8)
            .with_ai(AiLevel::Advanced);
        let items = calculate(&pkg, &options).unwrap().line_items();
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Base price",
                "Additional cameras (4 x ₪150.00)",
                "AI detection (advanced)"
            ]
        );
    }

    #[test]
    fn test_price_range() {
        let pkg = sample_package();
        let range = price_range(&pkg).unwrap();
        assert_eq!(range.min, Money::new(229000));
        assert!(range.max > range.min);
        assert!(!range.is_fixed());
    }
}
