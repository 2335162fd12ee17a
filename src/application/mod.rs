//! Application layer orchestrating catalog lookups, pricing and price audits.
//!
//! This module defines the `QuoteService`, the entry point for turning a
//! package slug and a customer's selection into an authoritative breakdown, and
//! the `AuditService`, which checks listed prices against product prices.

pub mod audit;
pub mod quote;
