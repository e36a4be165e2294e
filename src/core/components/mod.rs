pub mod factory;
pub mod truck;
pub mod truck_stats;
pub mod warehouse;

// Re-export commonly used types
pub use factory::{Factory, ProductionDelay};
pub use truck::{PollOutcome, Truck, DEFAULT_POLL_INTERVAL};
pub use truck_stats::TruckStats;
pub use warehouse::{HysteresisBand, Warehouse};
