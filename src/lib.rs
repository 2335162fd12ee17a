//! Package pricing for the Spectra security storefront.
//!
//! Turns a catalog package definition and a customer's selection into an
//! itemized, authoritative price breakdown.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
