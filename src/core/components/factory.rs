use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::warehouse::Warehouse;
use crate::core::errors::WarehouseError;
use crate::core::event::SimEvent;
use crate::core::types::Product;

/// Simulated production latency: a fixed base plus uniform jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionDelay {
    pub base_ms: u64,
    pub jitter_ms: u64,
}

impl ProductionDelay {
    pub fn new(base_ms: u64, jitter_ms: u64) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Delay for one tick, jitter drawn from `rng`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter = if self.jitter_ms > 0 {
            rng.gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        Duration::from_millis(self.base_ms + jitter)
    }
}

impl Default for ProductionDelay {
    fn default() -> Self {
        Self::new(100, 0)
    }
}

/// Producer that deposits a fixed quantity of its own product every tick
#[derive(Debug, Clone)]
pub struct Factory {
    name: String,
    production_rate: u64,
    warehouse: Arc<Warehouse>,
    delay: ProductionDelay,
    seed: u64,
}

impl Factory {
    pub fn new(name: impl Into<String>, production_rate: u64, warehouse: Arc<Warehouse>) -> Self {
        Self {
            name: name.into(),
            production_rate,
            warehouse,
            delay: ProductionDelay::default(),
            seed: 0,
        }
    }

    pub fn with_production_delay(mut self, delay: ProductionDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Seed for the per-tick delay jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run one production tick for the given simulated hour.
    ///
    /// Sleeps the production delay, then deposits `production_rate` units.
    /// Returns the deposited quantity.
    pub fn produce_tick(&self, day: u32, hour: u32) -> Result<u64, WarehouseError> {
        let tick_key = ((day as u64) << 32) | hour as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ tick_key);
        let delay = self.delay.sample(&mut rng);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let product = Product::standard(self.name.clone());
        self.warehouse.add_product(&product, self.production_rate)?;

        self.warehouse.publish(SimEvent::Produced {
            day,
            hour,
            factory: self.name.clone(),
            quantity: self.production_rate,
        });
        Ok(self.production_rate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn production_rate(&self) -> u64 {
        self.production_rate
    }
}
