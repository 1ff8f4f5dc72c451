//! Gamepad input state machine.
//!
//! Turns polled controller snapshots into debounced button, stick and axis
//! events. A [`Registry`] owns the connected [`Controller`]s and drives the
//! poll loop over an [`InputSource`].

extern crate self as padstate;

mod controller;
mod deadzone;
mod diagnostics;
mod dispatch;
mod error;
mod events;
mod haptics;
mod kind;
mod registry;
mod settings;
mod slot;
mod source;
mod types;

pub use padstate_slot_derive::Slot;

pub use crate::controller::Controller;
pub use crate::deadzone::{
    angle_from_rest, apply_circular_dead_zone, apply_dead_zone, apply_drift_dead_zone,
    DriftLatch,
};
pub use crate::diagnostics::{DiagnosticSink, LogSink};
pub use crate::dispatch::{
    EventDispatcher, LegacyListener, Listener, ListenerId, ListenerOptions,
};
pub use crate::error::{Error, Result};
pub use crate::events::{ButtonAction, ControllerEvent, EventKind, LegacyEvent, LegacyKind};
pub use crate::haptics::{HapticActuator, VibrationEffect, VibrationKind, VibrationPreset};
pub use crate::kind::detect_kind;
pub use crate::registry::{
    ControllerCallback, ControllerEntry, Registry, SettingsResolver, StopHandle,
};
pub use crate::settings::{check_dead_zone, ControllerSettings, StickFilter};
pub use crate::slot::{SlotMapped, SlotSet};
pub use crate::source::{
    Device, DeviceSignal, FrameScheduler, InputSource, IntervalScheduler, RawButton, Snapshot,
};
pub use crate::types::{
    AnalogPosition, Axis, Button, ButtonState, Capabilities, ControllerKind, DeviceInfo, Mapping,
    Slot, Stick,
};
