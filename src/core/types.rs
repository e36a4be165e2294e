use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantities removed by a single truck load: product name -> units.
///
/// Ordered by product name so that load descriptions and reports are stable.
pub type LoadManifest = BTreeMap<String, u64>;

/// Packaging used by every factory-produced batch
pub const STANDARD_PACKAGING: &str = "Standard";

/// One batch of factory output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    name: String,
    weight: u32,
    packaging_type: String,
}

impl Product {
    /// Create a new product
    pub fn new(name: impl Into<String>, weight: u32, packaging_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight,
            packaging_type: packaging_type.into(),
        }
    }

    /// Product in standard packaging with unit weight
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(name, 1, STANDARD_PACKAGING)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn packaging_type(&self) -> &str {
        &self.packaging_type
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.weight, self.packaging_type)
    }
}

/// Sum of all quantities in a manifest
pub fn manifest_total(manifest: &LoadManifest) -> u64 {
    manifest.values().sum()
}

/// Render a manifest as `"A: 30, B: 20"`
pub fn describe_manifest(manifest: &LoadManifest) -> String {
    manifest
        .iter()
        .map(|(name, quantity)| format!("{}: {}", name, quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Spreadsheet-style factory name for a zero-based index: A..Z, AA, AB, ...
pub fn factory_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
