use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delivery statistics snapshot for one truck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckStats {
    /// Truck label, e.g. "Truck 1"
    pub label: String,
    /// Maximum units per trip
    pub capacity: u64,
    /// Number of non-empty loads
    pub trips: u64,
    /// Units delivered over all trips
    pub total_delivered: u64,
    /// `total_delivered / trips`, zero without trips
    pub average_load: f64,
    /// Units delivered per product
    pub per_product_totals: BTreeMap<String, u64>,
    /// Description of the most recent load
    pub last_load_description: Option<String>,
}

impl TruckStats {
    /// Average units of `product` per trip
    pub fn product_average(&self, product: &str) -> f64 {
        if self.trips == 0 {
            return 0.0;
        }
        let total = self.per_product_totals.get(product).copied().unwrap_or(0);
        total as f64 / self.trips as f64
    }

    /// Average per trip for every delivered product
    pub fn per_product_averages(&self) -> BTreeMap<String, f64> {
        self.per_product_totals
            .keys()
            .map(|name| (name.clone(), self.product_average(name)))
            .collect()
    }
}

impl std::fmt::Display for TruckStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} with capacity {} units:", self.label, self.capacity)?;
        for (name, total) in &self.per_product_totals {
            writeln!(f, "\tProduct {}: delivered {} units", name, total)?;
        }
        for (name, average) in self.per_product_averages() {
            writeln!(f, "\tAverage delivered of product {}: {:.2}", name, average)?;
        }
        writeln!(f, "\tTotal delivered: {}", self.total_delivered)?;
        writeln!(f, "\tTrips: {}", self.trips)?;
        write!(f, "\tAverage load: {:.2}", self.average_load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> TruckStats {
        TruckStats {
            label: "Truck 1".to_string(),
            capacity: 100,
            trips: 4,
            total_delivered: 300,
            average_load: 75.0,
            per_product_totals: BTreeMap::from([("A".to_string(), 200), ("B".to_string(), 100)]),
            last_load_description: Some("A: 50, B: 25".to_string()),
        }
    }

    #[test]
    fn test_product_averages() {
        let stats = stats();
        assert_eq!(stats.product_average("A"), 50.0);
        assert_eq!(stats.product_average("B"), 25.0);
        assert_eq!(stats.product_average("missing"), 0.0);
    }

    #[test]
    fn test_display_lists_products() {
        let rendered = stats().to_string();
        assert!(rendered.starts_with("Truck 1 with capacity 100 units:"));
        assert!(rendered.contains("Product A: delivered 200 units"));
        assert!(rendered.contains("Trips: 4"));
        assert!(rendered.contains("Average load: 75.00"));
    }
}
