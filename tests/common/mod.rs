#![allow(dead_code)]

use spectra_pricer::domain::package::PackageDefinition;
use spectra_pricer::infrastructure::json_file::CatalogDocument;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub const FIXTURE_CATALOG: &str = "tests/fixtures/catalog.json";

pub fn fixture_packages() -> Vec<PackageDefinition> {
    let raw = std::fs::read_to_string(FIXTURE_CATALOG).expect("Failed to read fixture catalog");
    let document: CatalogDocument =
        serde_json::from_str(&raw).expect("Failed to parse fixture catalog");
    document.packages
}

pub fn fixture_package(slug: &str) -> PackageDefinition {
    fixture_packages()
        .into_iter()
        .find(|p| p.slug == slug)
        .expect("fixture package missing")
}

/// Writes `rows` quote requests for the fixture's camera kit, cycling the
/// camera count through its whole range.
pub fn generate_requests(path: &Path, rows: usize) -> Result<(), Error> {
    let mut file = File::create(path)?;
    for i in 0..rows {
        let cameras = 4 + (i % 13);
        writeln!(
            file,
            r#"{{"packageSlug":"camera-kit","options":{{"cameras":{}}}}}"#,
            cameras
        )?;
    }
    file.flush()?;
    Ok(())
}
