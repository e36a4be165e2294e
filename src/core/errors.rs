use std::time::Duration;

/// Errors raised by warehouse mutations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    /// Deposit of zero units
    EmptyDeposit,
    /// Deposit would push the load past capacity. Indicates a misconfigured run.
    CapacityExceeded {
        capacity: u64,
        current_load: u64,
        requested: u64,
    },
    /// Deposit after the warehouse was stopped
    Closed,
}

impl std::fmt::Display for WarehouseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseError::EmptyDeposit => write!(f, "Deposit quantity must be positive"),
            WarehouseError::CapacityExceeded {
                capacity,
                current_load,
                requested,
            } => write!(
                f,
                "Capacity exceeded: {} + {} > {}",
                current_load, requested, capacity
            ),
            WarehouseError::Closed => write!(f, "Warehouse is closed"),
        }
    }
}

impl std::error::Error for WarehouseError {}

/// Errors found while validating a simulation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    TooFewTrucks {
        count: usize,
        min: usize,
    },
    TruckCapacityTooSmall {
        index: usize,
        capacity: u64,
        min: u64,
    },
    InvalidBand {
        upper: u8,
        lower: u8,
    },
    /// Factory rates or the warehouse capacity do not fit in a `u64`
    CapacityOverflow,
    /// Trucks would sleep through whole production ticks
    PollSlowerThanProduction {
        production_ms: u64,
        poll_interval: Duration,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} = {} is out of range, expected {}..={}",
                field, value, min, max
            ),
            ConfigError::TooFewTrucks { count, min } => {
                write!(f, "At least {} trucks required, got {}", min, count)
            }
            ConfigError::TruckCapacityTooSmall {
                index,
                capacity,
                min,
            } => write!(
                f,
                "Truck {} capacity {} is below the minimum of {}",
                index + 1,
                capacity,
                min
            ),
            ConfigError::InvalidBand { upper, lower } => write!(
                f,
                "Invalid hysteresis band: need 0 < lower ({}) < upper ({}) <= 100",
                lower, upper
            ),
            ConfigError::CapacityOverflow => {
                write!(f, "Production rates and capacity multiplier are too large")
            }
            ConfigError::PollSlowerThanProduction {
                production_ms,
                poll_interval,
            } => write!(
                f,
                "Poll interval {:?} is longer than the {} ms production tick",
                poll_interval, production_ms
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that abort a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    Config(ConfigError),
    Warehouse(WarehouseError),
    /// Factory thread pool could not be built
    ThreadPool(String),
    TruckPanicked { label: String },
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Config(err) => write!(f, "Configuration error: {}", err),
            SimulationError::Warehouse(err) => write!(f, "Warehouse error: {}", err),
            SimulationError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
            SimulationError::TruckPanicked { label } => {
                write!(f, "Delivery loop of {} panicked", label)
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(err) => Some(err),
            SimulationError::Warehouse(err) => Some(err),
            SimulationError::ThreadPool(_) | SimulationError::TruckPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

impl From<WarehouseError> for SimulationError {
    fn from(err: WarehouseError) -> Self {
        SimulationError::Warehouse(err)
    }
}
