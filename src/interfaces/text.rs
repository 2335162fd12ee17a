//! Plain-text rendering for terminal output.

use crate::application::quote::PackageListing;
use crate::domain::audit::AuditReport;
use crate::domain::breakdown::PriceBreakdown;
use std::fmt::Write;

const WIDTH: usize = 44;

pub fn render_breakdown(breakdown: &PriceBreakdown) -> String {
    let currency = breakdown.currency;
    let mut out = String::new();

    let _ = writeln!(out, "{}", breakdown.package_slug);
    for item in breakdown.line_items() {
        push_row(&mut out, &item.label, &item.amount.display(currency).to_string());
    }
    push_row(&mut out, "Subtotal", &breakdown.subtotal.display(currency).to_string());
    for discount in &breakdown.applied_discounts {
        let label = if discount.description.is_empty() {
            format!("Discount {}% ({})", discount.percentage, discount.condition)
        } else {
            format!("Discount {}% ({})", discount.percentage, discount.description)
        };
        push_row(&mut out, &label, &format!("-{}", discount.amount.display(currency)));
    }
    push_row(&mut out, "Total", &breakdown.total.display(currency).to_string());
    out
}

pub fn render_listings(listings: &[PackageListing]) -> String {
    let mut out = String::new();
    for listing in listings {
        let min = listing.range.min.display(listing.currency);
        let price = if listing.range.is_fixed() {
            min.to_string()
        } else {
            format!("from {}", min)
        };
        let name = if listing.name.is_empty() {
            &listing.slug
        } else {
            &listing.name
        };
        push_row(&mut out, &format!("{} [{}]", name, listing.slug), &price);
    }
    out
}

pub fn render_audit(report: &AuditReport) -> String {
    let mut out = String::new();
    for audit in &report.results {
        let sign = if audit.difference > 0 { "+" } else { "" };
        push_row(
            &mut out,
            &format!("{} [{}]", audit.package_slug, audit.status.as_str()),
            &format!(
                "{} vs {} ({}{}%)",
                audit.listed_price.display(audit.currency),
                audit.reference_price.display(audit.currency),
                sign,
                audit.difference_percent
            ),
        );
        for issue in &audit.issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }
    let s = &report.summary;
    let _ = writeln!(
        out,
        "{} packages: {} ok, {} too low, {} too high, {} missing data",
        s.total, s.ok, s.too_low, s.too_high, s.missing_data
    );
    out
}

fn push_row(out: &mut String, label: &str, value: &str) {
    let pad = WIDTH.saturating_sub(label.chars().count() + value.chars().count()).max(1);
    let _ = writeln!(out, "{}{}{}", label, " ".repeat(pad), value);
}
