//! Configuration for depot simulation runs
//!
//! This module provides the run parameters (production rates, fleet, horizon),
//! the values derived from them, and validation against the allowed ranges.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::components::{HysteresisBand, ProductionDelay, DEFAULT_POLL_INTERVAL};
use crate::core::errors::ConfigError;
use crate::core::types::factory_name;

/// Allowed ranges, shared with the console driver's prompts.
///
/// Besides the per-field ranges, `SimulationConfig::validate` requires that the
/// derived rates and capacities fit in a `u64`, and that the production tick
/// (`ProductionDelay::base_ms`) is no shorter than the truck poll interval, so
/// trucks poll at least once per produced hour.
pub mod limits {
    pub const MIN_BASE_RATE: u64 = 50;
    pub const MIN_CAPACITY_MULTIPLIER: u64 = 100;
    pub const MIN_FACTORIES: u64 = 3;
    pub const MIN_TRUCKS: u64 = 2;
    pub const MIN_DAYS: u64 = 1;
    pub const MAX_DAYS: u64 = 365;
    pub const MIN_HOURS: u64 = 1;
    pub const MAX_HOURS: u64 = 24;
    /// Upper bound for open-ended integer inputs
    pub const UNBOUNDED: u64 = i32::MAX as u64;
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Hourly output of the first factory (n)
    pub base_rate: u64,
    /// Warehouse capacity in hours of total production (M)
    pub capacity_multiplier: u64,
    /// Number of factories, named A, B, C, ...
    pub factory_count: usize,
    /// One entry per truck
    pub truck_capacities: Vec<u64>,
    /// Simulated days
    pub days: u32,
    /// Production ticks per day
    pub hours_per_day: u32,
    pub production_delay: ProductionDelay,
    /// Pause before each truck poll
    pub poll_interval: Duration,
    pub band: HysteresisBand,
    /// Size of the factory thread pool, one thread per factory if unset
    pub thread_pool_size: Option<usize>,
    /// Seed for production delay jitter
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a configuration with the smallest allowed production setup
    pub fn new() -> Self {
        let mut config = Self {
            base_rate: limits::MIN_BASE_RATE,
            capacity_multiplier: limits::MIN_CAPACITY_MULTIPLIER,
            factory_count: limits::MIN_FACTORIES as usize,
            truck_capacities: Vec::new(),
            days: 1,
            hours_per_day: 24,
            production_delay: ProductionDelay::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            band: HysteresisBand::default(),
            thread_pool_size: None,
            seed: 42,
        };
        let min = config
            .min_truck_capacity_for(limits::MIN_TRUCKS as usize)
            .unwrap_or_default();
        config.truck_capacities = vec![min; limits::MIN_TRUCKS as usize];
        config
    }

    pub fn with_base_rate(mut self, base_rate: u64) -> Self {
        self.base_rate = base_rate;
        self
    }

    pub fn with_capacity_multiplier(mut self, multiplier: u64) -> Self {
        self.capacity_multiplier = multiplier;
        self
    }

    pub fn with_factory_count(mut self, count: usize) -> Self {
        self.factory_count = count;
        self
    }

    pub fn with_truck_capacities(mut self, capacities: Vec<u64>) -> Self {
        self.truck_capacities = capacities;
        self
    }

    pub fn with_horizon(mut self, days: u32, hours_per_day: u32) -> Self {
        self.days = days;
        self.hours_per_day = hours_per_day;
        self
    }

    pub fn with_production_delay(mut self, delay: ProductionDelay) -> Self {
        self.production_delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_band(mut self, band: HysteresisBand) -> Self {
        self.band = band;
        self
    }

    /// Set the thread pool size for factory ticks
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Hourly rate of factory `index`: `base_rate * (1 + 0.1 * index)`, rounded down
    pub fn factory_rate(&self, index: usize) -> Result<u64, ConfigError> {
        (index as u64)
            .checked_add(10)
            .and_then(|tenths| self.base_rate.checked_mul(tenths))
            .map(|rate| rate / 10)
            .ok_or(ConfigError::CapacityOverflow)
    }

    /// Names and rates of all factories
    pub fn factories(&self) -> Result<Vec<(String, u64)>, ConfigError> {
        (0..self.factory_count)
            .map(|i| Ok((factory_name(i), self.factory_rate(i)?)))
            .collect()
    }

    /// Combined output of all factories per hour
    pub fn hourly_production(&self) -> Result<u64, ConfigError> {
        (0..self.factory_count).try_fold(0u64, |total, i| {
            total
                .checked_add(self.factory_rate(i)?)
                .ok_or(ConfigError::CapacityOverflow)
        })
    }

    pub fn warehouse_capacity(&self) -> Result<u64, ConfigError> {
        self.capacity_multiplier
            .checked_mul(self.hourly_production()?)
            .ok_or(ConfigError::CapacityOverflow)
    }

    /// Smallest truck capacity accepted for the configured fleet size
    pub fn min_truck_capacity(&self) -> Result<u64, ConfigError> {
        self.min_truck_capacity_for(self.truck_capacities.len())
    }

    /// Trucks together must carry at least 5% of the warehouse per round
    pub fn min_truck_capacity_for(&self, truck_count: usize) -> Result<u64, ConfigError> {
        let capacity = self.warehouse_capacity()?;
        if truck_count == 0 {
            return Ok(0);
        }
        capacity
            .checked_mul(5)
            .map(|share| share / 100 / truck_count as u64)
            .ok_or(ConfigError::CapacityOverflow)
    }

    pub fn total_hours(&self) -> u64 {
        self.days as u64 * self.hours_per_day as u64
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Check every value against its allowed range, then the derived capacities
    /// and the production tick against the poll interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("base_rate", self.base_rate, limits::MIN_BASE_RATE, limits::UNBOUNDED)?;
        check_range(
            "capacity_multiplier",
            self.capacity_multiplier,
            limits::MIN_CAPACITY_MULTIPLIER,
            limits::UNBOUNDED,
        )?;
        check_range(
            "factory_count",
            self.factory_count as u64,
            limits::MIN_FACTORIES,
            limits::UNBOUNDED,
        )?;
        check_range("days", self.days as u64, limits::MIN_DAYS, limits::MAX_DAYS)?;
        check_range(
            "hours_per_day",
            self.hours_per_day as u64,
            limits::MIN_HOURS,
            limits::MAX_HOURS,
        )?;

        if (self.truck_capacities.len() as u64) < limits::MIN_TRUCKS {
            return Err(ConfigError::TooFewTrucks {
                count: self.truck_capacities.len(),
                min: limits::MIN_TRUCKS as usize,
            });
        }
        let min = self.min_truck_capacity()?;
        for (index, &capacity) in self.truck_capacities.iter().enumerate() {
            if capacity < min || capacity == 0 {
                return Err(ConfigError::TruckCapacityTooSmall {
                    index,
                    capacity,
                    min: min.max(1),
                });
            }
        }

        let tick = Duration::from_millis(self.production_delay.base_ms);
        if tick < self.poll_interval {
            return Err(ConfigError::PollSlowerThanProduction {
                production_ms: self.production_delay.base_ms,
                poll_interval: self.poll_interval,
            });
        }

        self.band.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.factory_count, 3);
        assert_eq!(config.truck_capacities.len(), 2);
    }

    #[test]
    fn test_derived_values() {
        let config = SimulationConfig::new().with_base_rate(50).with_factory_count(3);

        assert_eq!(config.factory_rate(0), Ok(50));
        assert_eq!(config.factory_rate(1), Ok(55));
        assert_eq!(config.factory_rate(2), Ok(60));
        assert_eq!(config.hourly_production(), Ok(165));
        assert_eq!(config.warehouse_capacity(), Ok(16_500));
        assert_eq!(config.min_truck_capacity(), Ok(412));
        assert_eq!(
            config.factories().unwrap(),
            vec![
                ("A".to_string(), 50),
                ("B".to_string(), 55),
                ("C".to_string(), 60)
            ]
        );
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::new()
            .with_horizon(2, 8)
            .with_thread_pool_size(4)
            .with_poll_interval(Duration::from_micros(5_500));

        assert_eq!(config.total_hours(), 16);
        assert_eq!(config.thread_pool_size, Some(4));
        assert_eq!(config.poll_interval(), Duration::from_micros(5_500));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_capacity_overflow() {
        let config = SimulationConfig::new()
            .with_base_rate(i32::MAX as u64)
            .with_capacity_multiplier(i32::MAX as u64);

        assert_eq!(config.min_truck_capacity(), Err(ConfigError::CapacityOverflow));
        assert_eq!(config.validate(), Err(ConfigError::CapacityOverflow));

        let config = SimulationConfig::new().with_capacity_multiplier(u64::MAX);
        assert_eq!(config.warehouse_capacity(), Err(ConfigError::CapacityOverflow));
        let config = SimulationConfig::new().with_base_rate(u64::MAX);
        assert_eq!(config.factory_rate(0), Err(ConfigError::CapacityOverflow));

        // Largest inputs whose capacity still fits
        let config = SimulationConfig::new()
            .with_base_rate(i32::MAX as u64)
            .with_capacity_multiplier(1_000_000);
        assert!(config.warehouse_capacity().is_ok());
    }

    #[test]
    fn test_rejects_poll_slower_than_production() {
        let config = SimulationConfig::new()
            .with_production_delay(ProductionDelay::none())
            .with_horizon(5, 24);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PollSlowerThanProduction {
                production_ms: 0,
                poll_interval: Duration::from_millis(100),
            })
        );

        let config = SimulationConfig::new()
            .with_production_delay(ProductionDelay::new(5, 0))
            .with_poll_interval(Duration::from_micros(5_001));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PollSlowerThanProduction { production_ms: 5, .. })
        ));

        let config = SimulationConfig::new()
            .with_production_delay(ProductionDelay::new(5, 0))
            .with_poll_interval(Duration::from_millis(5));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let config = SimulationConfig::new().with_base_rate(10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "base_rate", .. })
        ));

        let config = SimulationConfig::new().with_horizon(1, 25);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "hours_per_day", .. })
        ));

        let config = SimulationConfig::new().with_horizon(366, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "days", .. })
        ));
    }

    #[test]
    fn test_rejects_small_fleet() {
        let config = SimulationConfig::new().with_truck_capacities(vec![10_000]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewTrucks { count: 1, min: 2 })
        );

        let config = SimulationConfig::new().with_truck_capacities(vec![10_000, 1]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TruckCapacityTooSmall { index: 1, .. })
        ));
    }
}
