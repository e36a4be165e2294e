use serde::{Deserialize, Serialize};

use crate::core::components::TruckStats;

/// Warehouse load sampled after one hour's join barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSnapshot {
    pub day: u32,
    pub hour: u32,
    /// Units deposited by all factories this hour
    pub produced: u64,
    pub load: u64,
}

/// Per-day production summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub day: u32,
    pub hours: Vec<HourSnapshot>,
}

impl DayReport {
    /// Load at the end of the day's last hour
    pub fn closing_load(&self) -> u64 {
        self.hours.last().map(|snapshot| snapshot.load).unwrap_or(0)
    }

    pub fn produced(&self) -> u64 {
        self.hours.iter().map(|snapshot| snapshot.produced).sum()
    }
}

/// Factory identity and rate, as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySummary {
    pub name: String,
    pub production_rate: u64,
}

/// Everything known about a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub capacity: u64,
    pub factories: Vec<FactorySummary>,
    pub days: Vec<DayReport>,
    pub trucks: Vec<TruckStats>,
    pub final_load: u64,
}

impl SimulationReport {
    pub fn total_produced(&self) -> u64 {
        self.days.iter().map(DayReport::produced).sum()
    }

    pub fn total_delivered(&self) -> u64 {
        self.trucks.iter().map(|truck| truck.total_delivered).sum()
    }

    pub fn total_trips(&self) -> u64 {
        self.trucks.iter().map(|truck| truck.trips).sum()
    }
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Warehouse capacity: {} units", self.capacity)?;
        for day in &self.days {
            writeln!(f, "Day {}: warehouse load {} units", day.day, day.closing_load())?;
        }
        writeln!(f)?;
        writeln!(f, "Delivery statistics:")?;
        for truck in &self.trucks {
            writeln!(f, "{}", truck)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Produced {} units, delivered {} units in {} trips, {} units left in the warehouse",
            self.total_produced(),
            self.total_delivered(),
            self.total_trips(),
            self.final_load
        )
    }
}
