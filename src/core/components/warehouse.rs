use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::errors::{ConfigError, WarehouseError};
use crate::core::event::SimEvent;
use crate::core::event_sink::{EventSink, NullSink};
use crate::core::types::{LoadManifest, Product};

/// Load thresholds, in percent of capacity, that gate truck uploads.
///
/// Uploads switch on once the load reaches `upper_percent` and switch off once it
/// drops below `lower_percent`. Loads inside the band never change the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HysteresisBand {
    upper_percent: u8,
    lower_percent: u8,
}

impl HysteresisBand {
    pub const DEFAULT_UPPER: u8 = 95;
    pub const DEFAULT_LOWER: u8 = 50;

    /// Create a band, requiring `0 < lower < upper <= 100`
    pub fn new(upper_percent: u8, lower_percent: u8) -> Result<Self, ConfigError> {
        let band = Self {
            upper_percent,
            lower_percent,
        };
        band.validate()?;
        Ok(band)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower_percent == 0
            || self.lower_percent >= self.upper_percent
            || self.upper_percent > 100
        {
            return Err(ConfigError::InvalidBand {
                upper: self.upper_percent,
                lower: self.lower_percent,
            });
        }
        Ok(())
    }

    pub fn upper_percent(&self) -> u8 {
        self.upper_percent
    }

    pub fn lower_percent(&self) -> u8 {
        self.lower_percent
    }

    // A zero-capacity warehouse never holds stock, so it never opens uploads
    fn reaches_upper(&self, load: u64, capacity: u64) -> bool {
        capacity > 0 && load as u128 * 100 >= self.upper_percent as u128 * capacity as u128
    }

    fn below_lower(&self, load: u64, capacity: u64) -> bool {
        (load as u128 * 100) < self.lower_percent as u128 * capacity as u128
    }
}

impl Default for HysteresisBand {
    fn default() -> Self {
        Self {
            upper_percent: Self::DEFAULT_UPPER,
            lower_percent: Self::DEFAULT_LOWER,
        }
    }
}

/// Mutable part of the warehouse, always accessed under one lock
#[derive(Debug, Default)]
struct WarehouseState {
    current_load: u64,
    stock: BTreeMap<String, u64>,
    can_upload: bool,
    finished: bool,
}

/// Bounded stock shared by factories and trucks.
///
/// Every mutation runs under a single mutex: the capacity check, the stock
/// update and the hysteresis re-evaluation happen as one step, so concurrent
/// callers always observe `sum(stock) == current_load <= capacity`.
pub struct Warehouse {
    capacity: u64,
    band: HysteresisBand,
    state: Mutex<WarehouseState>,
    sink: Arc<dyn EventSink>,
}

impl Warehouse {
    /// Create an empty warehouse with the default 95%/50% band
    pub fn new(capacity: u64) -> Self {
        Self::with_band(capacity, HysteresisBand::default())
    }

    pub fn with_band(capacity: u64, band: HysteresisBand) -> Self {
        Self {
            capacity,
            band,
            state: Mutex::new(WarehouseState::default()),
            sink: Arc::new(NullSink),
        }
    }

    /// Publish transitions and stop notices to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    // Mutations validate before writing, so state behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, WarehouseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deposit `quantity` units of `product`.
    ///
    /// Fails without changing anything when the deposit is empty, the warehouse
    /// is closed, or the new load would exceed capacity.
    pub fn add_product(&self, product: &Product, quantity: u64) -> Result<(), WarehouseError> {
        if quantity == 0 {
            return Err(WarehouseError::EmptyDeposit);
        }

        let mut state = self.lock();
        if state.finished {
            return Err(WarehouseError::Closed);
        }
        let new_load = state
            .current_load
            .checked_add(quantity)
            .filter(|load| *load <= self.capacity)
            .ok_or(WarehouseError::CapacityExceeded {
                capacity: self.capacity,
                current_load: state.current_load,
                requested: quantity,
            })?;

        *state.stock.entry(product.name().to_string()).or_insert(0) += quantity;
        state.current_load = new_load;
        self.update_upload_flag(&mut state);
        Ok(())
    }

    /// Remove up to `truck_capacity` units.
    ///
    /// Products are taken in ascending name order, each exhausted before the
    /// next is touched. Returns an empty manifest when nothing can be removed.
    pub fn load_truck(&self, truck_capacity: u64) -> LoadManifest {
        let mut state = self.lock();
        self.take_load(&mut state, truck_capacity)
    }

    /// Like `load_truck`, but only while uploads are enabled.
    ///
    /// The flag check and the removal happen under the same lock, so no load
    /// is taken after another truck has already closed the band. Returns `None`
    /// when uploads are disabled.
    pub fn load_truck_if_permitted(&self, truck_capacity: u64) -> Option<LoadManifest> {
        let mut state = self.lock();
        if !state.finished && !state.can_upload {
            return None;
        }
        Some(self.take_load(&mut state, truck_capacity))
    }

    fn take_load(&self, state: &mut WarehouseState, truck_capacity: u64) -> LoadManifest {
        let mut manifest = LoadManifest::new();
        if state.finished {
            return manifest;
        }

        let mut remaining = truck_capacity;
        for (name, available) in state.stock.iter_mut() {
            if remaining == 0 {
                break;
            }
            let taken = (*available).min(remaining);
            if taken > 0 {
                *available -= taken;
                remaining -= taken;
                manifest.insert(name.clone(), taken);
            }
        }
        state.stock.retain(|_, quantity| *quantity > 0);

        let removed = truck_capacity - remaining;
        state.current_load -= removed;
        self.update_upload_flag(state);
        manifest
    }

    /// Mark production as finished. Repeated calls are no-ops.
    pub fn stop(&self) {
        let mut state = self.lock();
        if state.finished {
            log::warn!("Warehouse already stopped");
            return;
        }
        state.finished = true;
        self.sink.emit(SimEvent::WarehouseStopped);
    }

    fn update_upload_flag(&self, state: &mut WarehouseState) {
        if !state.can_upload && self.band.reaches_upper(state.current_load, self.capacity) {
            state.can_upload = true;
            self.sink.emit(SimEvent::UploadEnabled {
                load: state.current_load,
                capacity: self.capacity,
            });
        } else if state.can_upload && self.band.below_lower(state.current_load, self.capacity) {
            state.can_upload = false;
            self.sink.emit(SimEvent::UploadDisabled {
                load: state.current_load,
                capacity: self.capacity,
            });
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn current_load(&self) -> u64 {
        self.lock().current_load
    }

    pub fn can_upload(&self) -> bool {
        self.lock().can_upload
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    /// Copy of the current stock per product
    pub fn stock_snapshot(&self) -> BTreeMap<String, u64> {
        self.lock().stock.clone()
    }

    /// Emit an event through the warehouse's sink
    pub(crate) fn publish(&self, event: SimEvent) {
        self.sink.emit(event);
    }
}

impl std::fmt::Debug for Warehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Warehouse")
            .field("capacity", &self.capacity)
            .field("band", &self.band)
            .field("current_load", &state.current_load)
            .field("stock", &state.stock)
            .field("can_upload", &state.can_upload)
            .field("finished", &state.finished)
            .finish()
    }
}
