use super::money::{Currency, Money};
use super::package::{AiLevel, StorageLabel};
use rust_decimal::Decimal;
use serde::Serialize;

/// The seven priced components, in the order they are computed and listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub base: Money,
    pub additional_cameras: Money,
    pub ai_upgrade: Money,
    pub storage_upgrade: Money,
    pub addons: Money,
    pub installation: Money,
    pub maintenance: Money,
}

impl Components {
    pub fn as_array(&self) -> [Money; 7] {
        [
            self.base,
            self.additional_cameras,
            self.ai_upgrade,
            self.storage_upgrade,
            self.addons,
            self.installation,
            self.maintenance,
        ]
    }

    /// Sum of all components, or `None` if it does not fit in `Money`.
    pub fn checked_sum(&self) -> Option<Money> {
        self.as_array()
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add)
    }
}

/// A discount rule that matched, with the amount it took off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub condition: String,
    pub description: String,
    pub percentage: Decimal,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Money,
}

/// Itemized price of a package under a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub package_slug: String,
    pub components: Components,
    pub subtotal: Money,
    pub discounts: Money,
    pub total: Money,
    pub currency: Currency,
    pub applied_discounts: Vec<AppliedDiscount>,
    /// Camera count after defaults were applied.
    pub cameras: u32,
    pub additional_camera_count: u32,
    pub price_per_additional_camera: Money,
    pub ai_detection: Option<AiLevel>,
    pub storage: Option<StorageLabel>,
    pub addon_ids: Vec<String>,
}

impl PriceBreakdown {
    /// Ordered `{label, amount}` view. The base price is always listed; other
    /// components only when they cost something.
    pub fn line_items(&self) -> Vec<LineItem> {
        let c = &self.components;
        let mut items = vec![LineItem {
            label: "Base price".to_string(),
            amount: c.base,
        }];

        let mut push = |amount: Money, label: String| {
            if !amount.is_zero() {
                items.push(LineItem { label, amount });
            }
        };

        push(
            c.additional_cameras,
            format!(
                "Additional cameras ({} x {})",
                self.additional_camera_count,
                self.price_per_additional_camera.display(self.currency)
            ),
        );
        push(
            c.ai_upgrade,
            match self.ai_detection {
                Some(level) => format!("AI detection ({})", level),
                None => "AI detection".to_string(),
            },
        );
        push(
            c.storage_upgrade,
            match &self.storage {
                Some(label) => format!("Storage upgrade ({})", label),
                None => "Storage upgrade".to_string(),
            },
        );
        push(c.addons, format!("Add-ons ({})", self.addon_ids.join(", ")));
        push(c.installation, "Installation".to_string());
        push(c.maintenance, "Annual maintenance".to_string());

        items
    }
}
