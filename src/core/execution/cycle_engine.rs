use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

use crate::core::components::{Factory, Warehouse};
use crate::core::errors::{SimulationError, WarehouseError};
use crate::core::event::SimEvent;
use crate::core::execution::report::{DayReport, HourSnapshot};

/// Production phase driver
///
/// Runs one tick of every factory per simulated hour on a dedicated thread pool.
/// The parallel iterator completes only once every factory has deposited, which
/// is the per-hour join barrier before the load is sampled.
pub struct CycleEngine {
    factories: Vec<Factory>,
    warehouse: Arc<Warehouse>,
    pool: ThreadPool,
    /// Completed hour ticks
    current_hour: u64,
}

impl CycleEngine {
    /// Create a cycle engine.
    ///
    /// Without an explicit `pool_size` the pool gets one thread per factory so
    /// that all ticks of an hour sleep concurrently.
    pub fn new(
        factories: Vec<Factory>,
        warehouse: Arc<Warehouse>,
        pool_size: Option<usize>,
    ) -> Result<Self, SimulationError> {
        let threads = pool_size.unwrap_or(factories.len()).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("factory-{}", i))
            .build()
            .map_err(|err| SimulationError::ThreadPool(err.to_string()))?;

        Ok(Self {
            factories,
            warehouse,
            pool,
            current_hour: 0,
        })
    }

    /// Tick every factory once in parallel, then sample the warehouse load
    pub fn run_hour(&mut self, day: u32, hour: u32) -> Result<HourSnapshot, WarehouseError> {
        let factories = &self.factories;
        let results: Vec<Result<u64, WarehouseError>> = self.pool.install(|| {
            factories
                .par_iter()
                .map(|factory| factory.produce_tick(day, hour))
                .collect()
        });
        self.current_hour += 1;

        let mut produced = 0;
        for result in results {
            produced += result?;
        }

        Ok(HourSnapshot {
            day,
            hour,
            produced,
            load: self.warehouse.current_load(),
        })
    }

    /// Run `days` x `hours_per_day` ticks, stopping at the first failed deposit
    pub fn run(&mut self, days: u32, hours_per_day: u32) -> Result<Vec<DayReport>, WarehouseError> {
        let mut reports = Vec::with_capacity(days as usize);
        for day in 1..=days {
            let mut hours = Vec::with_capacity(hours_per_day as usize);
            for hour in 1..=hours_per_day {
                hours.push(self.run_hour(day, hour)?);
            }

            let report = DayReport { day, hours };
            self.warehouse.publish(SimEvent::DayClosed {
                day,
                load: report.closing_load(),
            });
            reports.push(report);
        }
        Ok(reports)
    }

    /// Get the number of completed hour ticks
    pub fn current_hour(&self) -> u64 {
        self.current_hour
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }
}
