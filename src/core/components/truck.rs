use std::time::Duration;

use super::truck_stats::TruckStats;
use super::warehouse::Warehouse;
use crate::core::event::SimEvent;
use crate::core::types::{describe_manifest, manifest_total, LoadManifest};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a single truck poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Warehouse finished, the delivery loop ends
    Stopped,
    /// Uploads are currently disabled
    Waiting,
    /// Uploads allowed but nothing was left to load
    Empty,
    /// A trip was recorded with this many units
    Delivered(u64),
}

/// Consumer that drains the warehouse while uploads are enabled
#[derive(Debug, Clone)]
pub struct Truck {
    label: String,
    capacity: u64,
    poll_interval: Duration,
    trips: u64,
    total_delivered: u64,
    per_product_totals: LoadManifest,
    last_load_description: Option<String>,
}

impl Truck {
    pub fn new(capacity: u64) -> Self {
        Self {
            label: format!("Truck({})", capacity),
            capacity,
            poll_interval: DEFAULT_POLL_INTERVAL,
            trips: 0,
            total_delivered: 0,
            per_product_totals: LoadManifest::new(),
            last_load_description: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll the warehouse until it finishes, sleeping `poll_interval` before each poll
    pub fn run_delivery_loop(&mut self, warehouse: &Warehouse) {
        log::debug!("[{}] Delivery loop started", self.label);
        loop {
            std::thread::sleep(self.poll_interval);
            if self.poll_once(warehouse) == PollOutcome::Stopped {
                break;
            }
        }
        log::debug!(
            "[{}] Delivery loop stopped after {} trips",
            self.label,
            self.trips
        );
    }

    /// One iteration of the delivery loop, without the sleep
    pub fn poll_once(&mut self, warehouse: &Warehouse) -> PollOutcome {
        if warehouse.is_finished() {
            return PollOutcome::Stopped;
        }
        let manifest = match warehouse.load_truck_if_permitted(self.capacity) {
            Some(manifest) => manifest,
            None => {
                log::debug!("[{}] Uploads disabled, waiting", self.label);
                return PollOutcome::Waiting;
            }
        };
        if manifest.is_empty() {
            return PollOutcome::Empty;
        }

        let total = self.record_load(&manifest);
        warehouse.publish(SimEvent::Delivered {
            truck: self.label.clone(),
            capacity: self.capacity,
            manifest,
        });
        PollOutcome::Delivered(total)
    }

    /// Account one trip. Empty manifests are ignored. Returns the units loaded.
    pub fn record_load(&mut self, manifest: &LoadManifest) -> u64 {
        let total = manifest_total(manifest);
        if total == 0 {
            return 0;
        }

        self.trips += 1;
        self.total_delivered += total;
        for (name, quantity) in manifest {
            *self.per_product_totals.entry(name.clone()).or_insert(0) += quantity;
        }
        self.last_load_description = Some(describe_manifest(manifest));
        total
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn trips(&self) -> u64 {
        self.trips
    }

    pub fn total_delivered(&self) -> u64 {
        self.total_delivered
    }

    pub fn average_load(&self) -> f64 {
        if self.trips == 0 {
            return 0.0;
        }
        self.total_delivered as f64 / self.trips as f64
    }

    pub fn total_product_counts(&self) -> &LoadManifest {
        &self.per_product_totals
    }

    pub fn last_load_description(&self) -> Option<&str> {
        self.last_load_description.as_deref()
    }

    pub fn stats(&self) -> TruckStats {
        TruckStats {
            label: self.label.clone(),
            capacity: self.capacity,
            trips: self.trips,
            total_delivered: self.total_delivered,
            average_load: self.average_load(),
            per_product_totals: self.per_product_totals.clone(),
            last_load_description: self.last_load_description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Product;

    fn manifest(entries: &[(&str, u64)]) -> LoadManifest {
        entries
            .iter()
            .map(|(name, quantity)| (name.to_string(), *quantity))
            .collect()
    }

    #[test]
    fn test_record_load_statistics() {
        let mut truck = Truck::new(100);
        truck.record_load(&manifest(&[("A", 60), ("B", 40)]));
        truck.record_load(&manifest(&[("A", 30)]));
        truck.record_load(&manifest(&[("B", 20), ("C", 5)]));

        assert_eq!(truck.trips(), 3);
        assert_eq!(truck.total_delivered(), 155);
        assert_eq!(truck.average_load(), 155.0 / 3.0);
        assert_eq!(
            truck.total_product_counts(),
            &manifest(&[("A", 90), ("B", 60), ("C", 5)])
        );
        assert_eq!(truck.last_load_description(), Some("B: 20, C: 5"));
    }

    #[test]
    fn test_empty_manifest_is_not_a_trip() {
        let mut truck = Truck::new(100);
        assert_eq!(truck.record_load(&LoadManifest::new()), 0);
        assert_eq!(truck.trips(), 0);
        assert_eq!(truck.average_load(), 0.0);
        assert_eq!(truck.last_load_description(), None);
    }

    #[test]
    fn test_poll_outcomes() {
        let warehouse = Warehouse::new(100);
        let mut truck = Truck::new(30);

        warehouse.add_product(&Product::standard("A"), 40).unwrap();
        assert_eq!(truck.poll_once(&warehouse), PollOutcome::Waiting);

        warehouse.add_product(&Product::standard("A"), 55).unwrap();
        assert!(warehouse.can_upload());
        assert_eq!(truck.poll_once(&warehouse), PollOutcome::Delivered(30));
        assert_eq!(warehouse.current_load(), 65);

        // 65 -> 35 crosses the lower threshold
        assert_eq!(truck.poll_once(&warehouse), PollOutcome::Delivered(30));
        assert!(!warehouse.can_upload());
        assert_eq!(truck.poll_once(&warehouse), PollOutcome::Waiting);

        warehouse.stop();
        assert_eq!(truck.poll_once(&warehouse), PollOutcome::Stopped);
        assert_eq!(truck.trips(), 2);
        assert_eq!(truck.last_load_description(), Some("A: 30"));
    }

    #[test]
    fn test_delivery_loop_exits_after_stop() {
        let warehouse = Warehouse::new(100);
        warehouse.add_product(&Product::standard("A"), 100).unwrap();
        let mut truck = Truck::new(100).with_poll_interval(Duration::from_millis(1));

        std::thread::scope(|s| {
            let handle = s.spawn(|| truck.run_delivery_loop(&warehouse));
            while warehouse.current_load() > 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
            warehouse.stop();
            handle.join().unwrap();
        });

        assert_eq!(truck.trips(), 1);
        assert_eq!(truck.average_load(), 100.0);
        assert_eq!(truck.last_load_description(), Some("A: 100"));
    }
}
