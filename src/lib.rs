pub mod console;
pub mod core;

// Re-export commonly used types
pub use crate::core::components::{Factory, HysteresisBand, PollOutcome, Truck, TruckStats, Warehouse};
pub use crate::core::errors::{ConfigError, SimulationError, WarehouseError};
pub use crate::core::event::SimEvent;
pub use crate::core::event_sink::{ChannelSink, EventSink, LogSink, RecordingSink};
pub use crate::core::execution::{SimulationConfig, SimulationEngine, SimulationReport};
pub use crate::core::types::{LoadManifest, Product};
