use crate::domain::breakdown::PriceBreakdown;
use crate::domain::money::{Currency, Money};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct QuoteRow<'a> {
    package: &'a str,
    cameras: u32,
    subtotal: Money,
    discounts: Money,
    total: Money,
    currency: Currency,
}

/// Writes one CSV row per priced quote. Amounts are in minor units.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_quote(&mut self, breakdown: &PriceBreakdown) -> Result<()> {
        self.writer.serialize(QuoteRow {
            package: &breakdown.package_slug,
            cameras: breakdown.cameras,
            subtotal: breakdown.subtotal,
            discounts: breakdown.discounts,
            total: breakdown.total,
            currency: breakdown.currency,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
