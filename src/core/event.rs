use serde::{Deserialize, Serialize};

use super::types::LoadManifest;

/// Observable simulation events.
///
/// State transitions in the core publish these instead of printing, so the
/// reporting side can be swapped out (logging, channel, recording in tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Load reached the upper threshold while uploads were disabled
    UploadEnabled { load: u64, capacity: u64 },
    /// Load fell below the lower threshold while uploads were enabled
    UploadDisabled { load: u64, capacity: u64 },
    /// A factory finished one production tick
    Produced {
        day: u32,
        hour: u32,
        factory: String,
        quantity: u64,
    },
    /// A truck completed a trip
    Delivered {
        truck: String,
        capacity: u64,
        manifest: LoadManifest,
    },
    /// Warehouse load sampled at the end of a day
    DayClosed { day: u32, load: u64 },
    /// First call to `Warehouse::stop`
    WarehouseStopped,
}

impl SimEvent {
    /// Short event name, used for filtering
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::UploadEnabled { .. } => "upload_enabled",
            SimEvent::UploadDisabled { .. } => "upload_disabled",
            SimEvent::Produced { .. } => "produced",
            SimEvent::Delivered { .. } => "delivered",
            SimEvent::DayClosed { .. } => "day_closed",
            SimEvent::WarehouseStopped => "warehouse_stopped",
        }
    }
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimEvent::UploadEnabled { load, capacity } => write!(
                f,
                "Warehouse at {}/{}: upper threshold reached, uploads enabled",
                load, capacity
            ),
            SimEvent::UploadDisabled { load, capacity } => write!(
                f,
                "Warehouse at {}/{}: below lower threshold, uploads stopped",
                load, capacity
            ),
            SimEvent::Produced {
                day,
                hour,
                factory,
                quantity,
            } => write!(
                f,
                "Day {}, hour {}. Factory {} produced {} units of product {}",
                day, hour, factory, quantity, factory
            ),
            SimEvent::Delivered {
                truck,
                capacity,
                manifest,
            } => write!(
                f,
                "{} (capacity {}) loaded: {}",
                truck,
                capacity,
                super::types::describe_manifest(manifest)
            ),
            SimEvent::DayClosed { day, load } => {
                write!(f, "Day {}: warehouse load {} units", day, load)
            }
            SimEvent::WarehouseStopped => write!(f, "Production cycle finished"),
        }
    }
}
