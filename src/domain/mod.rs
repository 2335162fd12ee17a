//! Pricing domain: money, package definitions, selections, the calculator
//! and the price audit.

pub mod audit;
pub mod breakdown;
pub mod money;
pub mod package;
pub mod ports;
pub mod predicate;
pub mod pricing;
pub mod reference_prices;
pub mod selection;
