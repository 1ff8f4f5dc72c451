use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ahash::AHashMap;

use crate::controller::Controller;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::dispatch::panic_message;
use crate::error::Result;
use crate::settings::ControllerSettings;
use crate::source::{Device, DeviceSignal, FrameScheduler, InputSource, Snapshot};
use crate::types::{DeviceInfo, Slot};

/// Registry-level callback receiving a connected or disconnected controller.
pub type ControllerCallback = Box<dyn FnMut(&mut Controller)>;
/// Picks the settings applied to a newly connected device.
pub type SettingsResolver = Box<dyn Fn(&DeviceInfo) -> ControllerSettings>;

/// Cloneable, thread-safe handle that stops [`Registry::run`].
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Controller with its registry metadata.
#[derive(Debug, Clone, Copy)]
pub struct ControllerEntry<'a> {
    pub controller: &'a Controller,
    pub is_main: bool,
    /// Position in connection order, `0` is the earliest.
    pub connection_index: usize,
}

/// Owns the connected controllers and drives the poll loop.
pub struct Registry {
    controllers: AHashMap<Slot, Controller>,
    connection_order: Vec<Slot>,
    pinned: Option<Slot>,
    unassigned: Vec<Slot>,
    on_connect: Option<ControllerCallback>,
    on_disconnect: Option<ControllerCallback>,
    resolve_settings: SettingsResolver,
    sink: Arc<dyn DiagnosticSink>,
    stop: StopHandle,
    signals: Vec<DeviceSignal>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(LogSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            controllers: AHashMap::new(),
            connection_order: Vec::new(),
            pinned: None,
            unassigned: Vec::new(),
            on_connect: None,
            on_disconnect: None,
            resolve_settings: Box::new(|_| ControllerSettings::default()),
            sink,
            stop: StopHandle(Arc::new(AtomicBool::new(false))),
            signals: Vec::new(),
        }
    }

    /// Sets the settings resolver used for devices connected from now on.
    pub fn set_settings_resolver<F>(&mut self, resolver: F)
    where
        F: Fn(&DeviceInfo) -> ControllerSettings + 'static,
    {
        self.resolve_settings = Box::new(resolver);
    }

    /// Sets the connect callback, replacing the previous one.
    ///
    /// Controllers that connected while no callback was set are delivered
    /// immediately, in connection order.
    pub fn on_connect<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Controller) + 'static,
    {
        self.on_connect = Some(Box::new(callback));
        let buffered = std::mem::take(&mut self.unassigned);
        for slot in buffered {
            if let Some(controller) = self.controllers.get_mut(&slot) {
                invoke(self.on_connect.as_mut(), controller, "connect", &*self.sink);
            }
        }
    }

    /// Sets the disconnect callback, replacing the previous one.
    pub fn on_disconnect<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Controller) + 'static,
    {
        self.on_disconnect = Some(Box::new(callback));
    }

    /// Registers a newly appeared device.
    ///
    /// A device reusing a live slot replaces the stale controller, which is
    /// disconnected first.
    pub fn connect(&mut self, device: Device) -> Result<()> {
        let slot = device.info.slot;
        let settings = (self.resolve_settings)(&device.info);
        let mut controller = Controller::new(device, settings, self.sink.clone())?;

        if self.controllers.contains_key(&slot) {
            self.sink.warn(&format!(
                "Slot {slot} connected again without a disconnect, replacing the controller"
            ));
            self.disconnect(slot);
        }

        log::debug!(
            "Controller connected: slot={slot} kind={} id={}",
            controller.kind(),
            controller.info().id
        );
        if self.on_connect.is_some() {
            invoke(self.on_connect.as_mut(), &mut controller, "connect", &*self.sink);
        } else {
            self.unassigned.push(slot);
        }
        self.controllers.insert(slot, controller);
        self.connection_order.push(slot);
        Ok(())
    }

    /// Removes the controller of a vanished device and returns it.
    pub fn disconnect(&mut self, slot: Slot) -> Option<Controller> {
        let mut controller = self.controllers.remove(&slot)?;
        invoke(self.on_disconnect.as_mut(), &mut controller, "disconnect", &*self.sink);

        self.connection_order.retain(|s| *s != slot);
        self.unassigned.retain(|s| *s != slot);
        if self.pinned == Some(slot) {
            self.pinned = self.connection_order.first().copied();
        }
        log::debug!("Controller disconnected: slot={slot}");
        Some(controller)
    }

    pub fn handle_signal(&mut self, signal: DeviceSignal) {
        match signal {
            DeviceSignal::Connected(device) => {
                let slot = device.info.slot;
                if let Err(e) = self.connect(device) {
                    self.sink
                        .error(&format!("Failed to register controller on slot {slot}: {e}"));
                }
            }
            DeviceSignal::Disconnected(slot) => {
                if self.disconnect(slot).is_none() {
                    log::debug!("Disconnect for unknown slot {slot} ignored");
                }
            }
        }
    }

    /// Feeds one tick of snapshots to the matching controllers.
    ///
    /// Empty entries and entries without a controller are skipped.
    pub fn poll_gamepad_state(&mut self, snapshots: &[Option<Snapshot>]) {
        for snapshot in snapshots.iter().flatten() {
            if let Some(controller) = self.controllers.get_mut(&snapshot.slot) {
                controller.update(snapshot);
            }
        }
    }

    /// Processes pending connection signals, then polls the source once.
    pub fn pump<S: InputSource + ?Sized>(&mut self, source: &mut S) {
        let mut signals = std::mem::take(&mut self.signals);
        source.drain_signals(&mut signals);
        for signal in signals.drain(..) {
            self.handle_signal(signal);
        }
        self.signals = signals;

        self.poll_gamepad_state(source.snapshots());
    }

    /// Runs the poll loop until [`Registry::stop`] is called.
    pub fn run<S, F>(&mut self, source: &mut S, scheduler: &mut F)
    where
        S: InputSource + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        while !self.is_stopped() {
            self.pump(source);
            if self.is_stopped() {
                break;
            }
            scheduler.next_frame();
        }
        log::debug!("Poll loop stopped");
    }

    /// Stops the poll loop. A stopped registry does not run again.
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Pins the main controller. Returns `false` for an unknown slot.
    pub fn set_main_controller(&mut self, slot: Slot) -> bool {
        if !self.controllers.contains_key(&slot) {
            return false;
        }
        self.pinned = Some(slot);
        true
    }

    fn main_slot(&self) -> Option<Slot> {
        self.pinned.or_else(|| self.connection_order.first().copied())
    }

    /// The pinned controller, or the earliest connected one.
    pub fn main_controller(&self) -> Option<&Controller> {
        self.main_slot().and_then(|slot| self.controllers.get(&slot))
    }

    pub fn main_controller_mut(&mut self) -> Option<&mut Controller> {
        let slot = self.main_slot()?;
        self.controllers.get_mut(&slot)
    }

    pub fn controller(&self, slot: Slot) -> Option<&Controller> {
        self.controllers.get(&slot)
    }

    pub fn controller_mut(&mut self, slot: Slot) -> Option<&mut Controller> {
        self.controllers.get_mut(&slot)
    }

    /// Controllers in connection order.
    pub fn controllers(&self) -> impl Iterator<Item = &Controller> + '_ {
        self.connection_order
            .iter()
            .filter_map(|slot| self.controllers.get(slot))
    }

    pub fn controllers_with_metadata(&self) -> Vec<ControllerEntry<'_>> {
        let main = self.main_slot();
        self.connection_order
            .iter()
            .enumerate()
            .filter_map(|(connection_index, slot)| {
                self.controllers.get(slot).map(|controller| ControllerEntry {
                    controller,
                    is_main: main == Some(*slot),
                    connection_index,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

fn invoke(
    callback: Option<&mut ControllerCallback>,
    controller: &mut Controller,
    name: &str,
    sink: &dyn DiagnosticSink,
) {
    let Some(callback) = callback else {
        return;
    };
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(controller))) {
        sink.error(&format!(
            "'{name}' callback panicked for slot {}: {}",
            controller.slot(),
            panic_message(payload.as_ref())
        ));
    }
}
