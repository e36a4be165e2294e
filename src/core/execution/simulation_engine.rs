use std::sync::Arc;

use crate::core::components::{Factory, Truck, Warehouse};
use crate::core::errors::SimulationError;
use crate::core::event_sink::EventSink;
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::cycle_engine::CycleEngine;
use crate::core::execution::report::{FactorySummary, SimulationReport};

/// Stops the warehouse when dropped, so truck loops end even if production unwinds
struct StopOnDrop<'a>(&'a Warehouse);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Whole-run driver: production phase, concurrent delivery, shutdown and aggregation
pub struct SimulationEngine {
    config: SimulationConfig,
    warehouse: Arc<Warehouse>,
    cycle_engine: CycleEngine,
    trucks: Vec<Truck>,
}

impl SimulationEngine {
    /// Validate `config` and build the warehouse, factories and trucks
    pub fn new(config: SimulationConfig, sink: Arc<dyn EventSink>) -> Result<Self, SimulationError> {
        config.validate()?;
        Self::assemble(config, sink)
    }

    /// Build the run without range checks. Crate tests use it to reach states a
    /// validated configuration rules out.
    pub(crate) fn assemble(
        config: SimulationConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, SimulationError> {
        let warehouse = Arc::new(
            Warehouse::with_band(config.warehouse_capacity()?, config.band).with_sink(sink),
        );

        let factories = config
            .factories()?
            .into_iter()
            .enumerate()
            .map(|(i, (name, rate))| {
                Factory::new(name, rate, Arc::clone(&warehouse))
                    .with_production_delay(config.production_delay)
                    .with_seed(config.seed.wrapping_add(i as u64))
            })
            .collect();

        let trucks = config
            .truck_capacities
            .iter()
            .enumerate()
            .map(|(i, &capacity)| {
                Truck::new(capacity)
                    .with_label(format!("Truck {}", i + 1))
                    .with_poll_interval(config.poll_interval())
            })
            .collect();

        let cycle_engine = CycleEngine::new(factories, Arc::clone(&warehouse), config.thread_pool_size)?;

        Ok(Self {
            config,
            warehouse,
            cycle_engine,
            trucks,
        })
    }

    /// Run the simulation to completion.
    ///
    /// Trucks poll on their own threads for the whole run. The warehouse is
    /// stopped once production ends, successfully or not, and every truck is
    /// joined before the result is returned.
    pub fn run(mut self) -> Result<SimulationReport, SimulationError> {
        log::info!(
            "Warehouse capacity {} units, {} factories, {} trucks, {} days x {} hours",
            self.warehouse.capacity(),
            self.config.factory_count,
            self.trucks.len(),
            self.config.days,
            self.config.hours_per_day
        );

        let warehouse: &Warehouse = &self.warehouse;
        let cycle_engine = &mut self.cycle_engine;
        let trucks = &mut self.trucks;
        let (days, hours_per_day) = (self.config.days, self.config.hours_per_day);

        let (production, joins) = std::thread::scope(|s| {
            let handles: Vec<_> = trucks
                .iter_mut()
                .map(|truck| {
                    let label = truck.label().to_string();
                    (label, s.spawn(move || truck.run_delivery_loop(warehouse)))
                })
                .collect();

            let stop_guard = StopOnDrop(warehouse);
            let production = cycle_engine.run(days, hours_per_day);
            drop(stop_guard);

            let joins: Vec<Result<(), SimulationError>> = handles
                .into_iter()
                .map(|(label, handle)| {
                    handle
                        .join()
                        .map_err(|_| SimulationError::TruckPanicked { label })
                })
                .collect();
            (production, joins)
        });

        let days = production?;
        for join in joins {
            join?;
        }
        log::info!("Production finished after {} hour ticks", self.cycle_engine.current_hour());

        Ok(SimulationReport {
            capacity: self.warehouse.capacity(),
            factories: self
                .cycle_engine
                .factories()
                .iter()
                .map(|factory| FactorySummary {
                    name: factory.name().to_string(),
                    production_rate: factory.production_rate(),
                })
                .collect(),
            days,
            trucks: self.trucks.iter().map(Truck::stats).collect(),
            final_load: self.warehouse.current_load(),
        })
    }

    pub fn warehouse(&self) -> &Arc<Warehouse> {
        &self.warehouse
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }
}
