use super::money::{Currency, Money};
use super::predicate::Predicate;
use crate::error::{PricingError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// AI detection level. Ordered so predicates can compare levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiLevel {
    Basic,
    Advanced,
    Enterprise,
}

impl AiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiLevel::Basic => "basic",
            AiLevel::Advanced => "advanced",
            AiLevel::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Some(AiLevel::Basic),
            "advanced" => Some(AiLevel::Advanced),
            "enterprise" => Some(AiLevel::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for AiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage tier label as it appears in the catalog, e.g. `"4TB"`.
///
/// Surrounding whitespace is dropped however the label is built, so catalog
/// keys and request values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StorageLabel(String);

impl StorageLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Capacity in gigabytes, when the label is of the form `<n>TB` or `<n>GB`.
    pub fn capacity_gb(&self) -> Option<u64> {
        parse_capacity_gb(&self.0)
    }
}

impl From<String> for StorageLabel {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<StorageLabel> for String {
    fn from(label: StorageLabel) -> Self {
        label.0
    }
}

impl fmt::Display for StorageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn parse_capacity_gb(value: &str) -> Option<u64> {
    let upper = value.trim().to_ascii_uppercase();
    let (digits, factor) = if let Some(n) = upper.strip_suffix("TB") {
        (n, 1000)
    } else if let Some(n) = upper.strip_suffix("GB") {
        (n, 1)
    } else {
        return None;
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(factor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl CameraRange {
    pub fn contains(&self, cameras: u32) -> bool {
        (self.min..=self.max).contains(&cameras)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: Money,
    #[serde(default = "default_true")]
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Installation {
    pub included: bool,
    #[serde(default)]
    pub price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    pub annual: Money,
    #[serde(default = "default_true")]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRule {
    #[serde(alias = "condition")]
    pub predicate: Predicate,
    #[serde(alias = "discount")]
    pub percentage: Decimal,
    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}

/// Equipment a package ships with, as listed on its product page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    /// Camera features such as `4MP`, `4K` or `Color Night`.
    #[serde(default)]
    pub camera_types: Vec<String>,
    pub nvr_channels: u32,
    /// Model of the bundled UPS, if one ships with the package.
    #[serde(default)]
    pub ups: Option<String>,
}

/// An immutable catalog entry describing a package and all of its priced options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDefinition {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub currency: Currency,
    pub base: Money,
    pub camera_range: CameraRange,
    #[serde(default)]
    pub price_per_additional_camera: Money,
    #[serde(default)]
    pub ai_upgrade_tiers: BTreeMap<AiLevel, Money>,
    #[serde(default)]
    pub storage_upgrade_tiers: BTreeMap<StorageLabel, Money>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub installation: Installation,
    #[serde(default)]
    pub maintenance: Option<Maintenance>,
    #[serde(default)]
    pub discount_rules: Vec<DiscountRule>,
    /// AI level the package ships with.
    #[serde(default)]
    pub standard_ai: Option<AiLevel>,
    /// Storage the package ships with.
    #[serde(default)]
    pub standard_storage: Option<StorageLabel>,
    /// Only the price audit reads this.
    #[serde(default)]
    pub hardware: Option<Hardware>,
}

impl PackageDefinition {
    pub fn addon(&self, id: &str) -> Option<&Addon> {
        self.addons.iter().find(|a| a.id == id)
    }

    /// Checks the definition against its own invariants.
    ///
    /// A definition that fails here is a data error: pricing it would silently
    /// produce wrong numbers, so callers refuse it outright.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PricingError::InvalidCatalog(msg));

        if self.slug.trim().is_empty() {
            return invalid("package slug must not be empty".to_string());
        }

        let range = &self.camera_range;
        if !(range.min <= range.default && range.default <= range.max) {
            return invalid(format!(
                "{}: camera range must satisfy min <= default <= max (got {}/{}/{})",
                self.slug, range.min, range.default, range.max
            ));
        }

        let mut seen = BTreeSet::new();
        for addon in &self.addons {
            if addon.id.trim().is_empty() {
                return invalid(format!("{}: addon id must not be empty", self.slug));
            }
            if !seen.insert(addon.id.as_str()) {
                return invalid(format!("{}: duplicate addon id {}", self.slug, addon.id));
            }
        }

        for rule in &self.discount_rules {
            if rule.percentage < Decimal::ZERO || rule.percentage > Decimal::ONE_HUNDRED {
                return invalid(format!(
                    "{}: discount percentage {} for '{}' is outside 0..=100",
                    self.slug, rule.percentage, rule.predicate
                ));
            }
            if let Some(missing) = rule
                .predicate
                .referenced_addons()
                .find(|id| self.addon(id).is_none())
            {
                return invalid(format!(
                    "{}: discount rule '{}' references unknown addon {}",
                    self.slug, rule.predicate, missing
                ));
            }
        }

        if self.max_subtotal().is_none() {
            return invalid(format!(
                "{}: fully configured price does not fit the money range",
                self.slug
            ));
        }

        Ok(())
    }

    /// Subtotal with every option at its dearest, or `None` on overflow.
    /// No selection can price above this.
    fn max_subtotal(&self) -> Option<Money> {
        let range = &self.camera_range;
        let cameras = self
            .price_per_additional_camera
            .checked_times(range.max.saturating_sub(range.default))?;
        let ai = self.ai_upgrade_tiers.values().copied().max();
        let storage = self.storage_upgrade_tiers.values().copied().max();
        let addons = self
            .addons
            .iter()
            .try_fold(Money::ZERO, |acc, addon| acc.checked_add(addon.price))?;
        let maintenance = self.maintenance.map(|m| m.annual);

        [
            Some(cameras),
            ai,
            storage,
            Some(addons),
            Some(self.installation.price),
            maintenance,
        ]
        .into_iter()
        .flatten()
        .try_fold(self.base, Money::checked_add)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// The package used throughout the pricing tests.
    pub(crate) fn sample_package() -> PackageDefinition {
        PackageDefinition {
            slug: "house-essential".to_string(),
            name: "House Essential".to_string(),
            category: Some("Residential".to_string()),
            currency: Currency::Ils,
            base: Money::new(229000),
            camera_range: CameraRange {
                min: 4,
                max: 16,
                default: 4,
            },
            price_per_additional_camera: Money::new(15000),
            ai_upgrade_tiers: BTreeMap::from([(AiLevel::Advanced, Money::new(50000))]),
            storage_upgrade_tiers: BTreeMap::from([
                (StorageLabel::new("4TB"), Money::new(50000)),
                (StorageLabel::new("8TB"), Money::new(120000)),
            ]),
            addons: vec![
                Addon {
                    id: "ups-house".to_string(),
                    name: "UPS".to_string(),
                    price: Money::new(75000),
                    optional: true,
                },
                Addon {
                    id: "gate-intercom".to_string(),
                    name: "Gate intercom".to_string(),
                    price: Money::new(180000),
                    optional: true,
                },
            ],
            installation: Installation {
                included: false,
                price: Money::new(40000),
            },
            maintenance: Some(Maintenance {
                annual: Money::new(80000),
                optional: true,
            }),
            discount_rules: vec![DiscountRule {
                predicate: "cameras > 6".parse().unwrap(),
                percentage: dec!(5),
                description: "Volume discount".to_string(),
            }],
            standard_ai: Some(AiLevel::Basic),
            standard_storage: Some(StorageLabel::new("2TB")),
            hardware: Some(Hardware {
                camera_types: vec!["IP".to_string(), "4MP".to_string()],
                nvr_channels: 8,
                ups: None,
            }),
        }
    }

    #[test]
    fn test_sample_package_is_valid() {
        assert!(sample_package().validate().is_ok());
    }

    #[test]
    fn test_invalid_camera_range() {
        let mut pkg = sample_package();
        pkg.camera_range.default = 20;
        assert!(matches!(pkg.validate(), Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_duplicate_addon() {
        let mut pkg = sample_package();
        pkg.addons.push(pkg.addons[0].clone());
        assert!(matches!(pkg.validate(), Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_discount_out_of_range() {
        let mut pkg = sample_package();
        pkg.discount_rules[0].percentage = dec!(150);
        assert!(matches!(pkg.validate(), Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_discount_referencing_unknown_addon() {
        let mut pkg = sample_package();
        pkg.discount_rules.push(DiscountRule {
            predicate: "addon(alarm-basic)".parse().unwrap(),
            percentage: dec!(3),
            description: String::new(),
        });
        assert!(matches!(pkg.validate(), Err(PricingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_amounts_that_overflow_are_rejected() {
        let mut pkg = sample_package();
        pkg.base = Money::new(u64::MAX - 1000);
        pkg.price_per_additional_camera = Money::new(1000);
        pkg.ai_upgrade_tiers.clear();
        pkg.storage_upgrade_tiers.clear();
        pkg.addons.clear();
        pkg.discount_rules.clear();
        pkg.installation.price = Money::ZERO;
        pkg.maintenance = None;
        assert!(matches!(
            pkg.validate(),
            Err(PricingError::InvalidCatalog(msg)) if msg.contains("money range")
        ));

        // The same package with a single camera slot fits exactly.
        pkg.camera_range.max = pkg.camera_range.default + 1;
        assert!(pkg.validate().is_ok());
    }

    #[test]
    fn test_storage_capacity() {
        assert_eq!(StorageLabel::new("4TB").capacity_gb(), Some(4000));
        assert_eq!(StorageLabel::new("512gb").capacity_gb(), Some(512));
        assert_eq!(StorageLabel::new("cloud").capacity_gb(), None);
    }

    #[test]
    fn test_deserialize_catalog_shape() {
        let json = r#"{
            "slug": "apartment-basic",
            "base": 229000,
            "cameraRange": { "min": 2, "max": 3, "default": 2 },
            "pricePerAdditionalCamera": 35000,
            "aiUpgradeTiers": { "basic": 0, "advanced": 20000 },
            "storageUpgradeTiers": { "2TB": 30000 },
            "addons": [{ "id": "ups-basic", "price": 45000 }],
            "installation": { "included": true },
            "discountRules": [{ "condition": "cameras > 2", "discount": 5 }]
        }"#;
        let pkg: PackageDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(pkg.currency, Currency::Ils);
        assert_eq!(pkg.ai_upgrade_tiers[&AiLevel::Advanced], Money::new(20000));
        assert!(pkg.addons[0].optional);
        assert_eq!(pkg.installation.price, Money::ZERO);
        assert_eq!(pkg.discount_rules[0].percentage, dec!(5));
        assert!(pkg.maintenance.is_none());
        assert!(pkg.validate().is_ok());
    }
}
