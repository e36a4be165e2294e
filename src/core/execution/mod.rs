pub mod config;
pub mod cycle_engine;
pub mod report;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use cycle_engine::CycleEngine;
pub use report::{DayReport, FactorySummary, HourSnapshot, SimulationReport};
pub use simulation_engine::SimulationEngine;
