use crate::domain::breakdown::{AppliedDiscount, LineItem, PriceBreakdown};
use crate::domain::money::{Currency, Money};
use crate::error::PricingError;
use serde::Serialize;

/// Successful price calculation envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub package_slug: String,
    pub breakdown: Vec<LineItem>,
    pub subtotal: Money,
    pub discounts: Money,
    pub applied_discounts: Vec<AppliedDiscount>,
    pub total: Money,
    pub currency: Currency,
    /// Always true: the total was computed here, not taken from the client.
    pub validated: bool,
}

impl From<&PriceBreakdown> for QuoteResponse {
    fn from(breakdown: &PriceBreakdown) -> Self {
        Self {
            success: true,
            package_slug: breakdown.package_slug.clone(),
            breakdown: breakdown.line_items(),
            subtotal: breakdown.subtotal,
            discounts: breakdown.discounts,
            applied_discounts: breakdown.applied_discounts.clone(),
            total: breakdown.total,
            currency: breakdown.currency,
            validated: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub status: u16,
}

impl From<&PricingError> for ErrorResponse {
    fn from(err: &PricingError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}
