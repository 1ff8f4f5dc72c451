use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{tick, Receiver};

use crate::haptics::HapticActuator;
use crate::types::{DeviceInfo, Slot};

/// Raw state of one physical button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawButton {
    pub pressed: bool,
    pub value: f32,
}

/// Raw per-tick sample of one device.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub slot: Slot,
    /// Monotonic source timestamp, in milliseconds.
    pub timestamp: f64,
    /// Buttons in raw slot order. May be shorter than the mapping table.
    pub buttons: Vec<RawButton>,
    /// Axes in raw order: left x/y, right x/y, then the triggers.
    pub axes: Vec<f32>,
}

impl Snapshot {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            ..Self::default()
        }
    }

    /// Axis value, or `0.0` when the device did not report it.
    #[inline]
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }
}

/// A device that appeared, along with its optional actuator.
#[derive(Clone)]
pub struct Device {
    pub info: DeviceInfo,
    pub actuator: Option<Arc<dyn HapticActuator>>,
}

impl Device {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            actuator: None,
        }
    }

    pub fn with_actuator(mut self, actuator: Arc<dyn HapticActuator>) -> Self {
        self.actuator = Some(actuator);
        self
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("info", &self.info)
            .field("actuator", &self.actuator.is_some())
            .finish()
    }
}

/// Connection change reported by an input source.
#[derive(Debug, Clone)]
pub enum DeviceSignal {
    Connected(Device),
    Disconnected(Slot),
}

/// Raw hardware input.
pub trait InputSource {
    /// Moves pending connect/disconnect signals into `out`, in arrival order.
    fn drain_signals(&mut self, out: &mut Vec<DeviceSignal>);
    /// Current snapshot list. `None` entries are empty slots.
    fn snapshots(&mut self) -> &[Option<Snapshot>];
}

/// Blocks until the next frame should be processed.
pub trait FrameScheduler {
    fn next_frame(&mut self);
}

/// Fixed-rate scheduler backed by a `crossbeam-channel` ticker.
pub struct IntervalScheduler {
    ticker: Receiver<std::time::Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            ticker: tick(interval),
        }
    }
}

impl FrameScheduler for IntervalScheduler {
    fn next_frame(&mut self) {
        // The ticker never disconnects while the receiver is alive.
        let _ = self.ticker.recv();
    }
}
