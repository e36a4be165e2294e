use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};

use super::event::SimEvent;

/// Receiver for simulation events.
///
/// Sinks are shared across factory and truck threads. Warehouse transitions are
/// published while its lock is held, so implementations must not call back into
/// the warehouse.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SimEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SimEvent) {}
}

/// Renders events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SimEvent) {
        match &event {
            SimEvent::Delivered { .. } | SimEvent::Produced { .. } => {
                log::info!("{}", event)
            }
            SimEvent::UploadEnabled { .. }
            | SimEvent::UploadDisabled { .. }
            | SimEvent::DayClosed { .. }
            | SimEvent::WarehouseStopped => log::info!("[Warehouse] {}", event),
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SimEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<SimEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events of a single kind, see [`SimEvent::kind`]
    pub fn events_of_kind(&self, kind: &str) -> Vec<SimEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.kind() == kind)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SimEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Forwards events to an mpsc channel. A dropped receiver is ignored.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Mutex<Sender<SimEvent>>,
}

impl ChannelSink {
    pub fn new(sender: Sender<SimEvent>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: SimEvent) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if sender.send(event).is_err() {
            log::debug!("Event receiver dropped, discarding event");
        }
    }
}
