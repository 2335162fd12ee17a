//! Catalog implementations backing the `PackageCatalog` port.

pub mod in_memory;
pub mod json_file;
