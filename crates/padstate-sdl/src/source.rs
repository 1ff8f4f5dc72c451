use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use crossbeam_channel::{unbounded, Receiver, Sender};
use padstate::{
    Button, Capabilities, Device, DeviceInfo, DeviceSignal, Error, InputSource, Mapping,
    RawButton, Result, Slot, SlotMapped, Snapshot,
};
use sdl2::controller::GameController;
use sdl2::event::Event;
use sdl2::sensor::SensorType;
use sdl2::{EventPump, GameControllerSubsystem, Sdl};

use crate::command::{Command, SdlRumble};
use crate::mapping::{button_source, device_id, normalize_axis, ButtonSource, AXES};

/// Trigger value above which the raw trigger button reads as pressed.
const TRIGGER_PRESSED: f32 = 0.1;

struct OpenDevice {
    slot: Slot,
    info: DeviceInfo,
    controller: GameController,
}

/// [`InputSource`] over SDL2 game controllers.
///
/// SDL state is not thread-safe, so the source must stay on the thread that
/// created it. Rumble requests from other threads are queued and executed
/// on the next [`InputSource::drain_signals`].
pub struct SdlSource {
    _sdl: Sdl,
    controller_subsystem: GameControllerSubsystem,
    event_pump: EventPump,
    /// Open devices by SDL instance id.
    devices: AHashMap<u32, OpenDevice>,
    /// Indexed by slot. A connected device always has an entry.
    snapshots: Vec<Option<Snapshot>>,
    cmd_tx: Sender<Command>,
    cmd_rx: Receiver<Command>,
    scheduled: Vec<Command>,
    signals: Vec<DeviceSignal>,
    started: Instant,
}

impl SdlSource {
    /// Initializes SDL and enumerates the controllers that are already plugged in.
    pub fn new() -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::Backend)?;
        let controller_subsystem = sdl.game_controller().map_err(Error::Backend)?;
        let event_pump = sdl.event_pump().map_err(Error::Backend)?;
        let (cmd_tx, cmd_rx) = unbounded();

        let mut source = Self {
            _sdl: sdl,
            controller_subsystem,
            event_pump,
            devices: AHashMap::new(),
            snapshots: Vec::new(),
            cmd_tx,
            cmd_rx,
            scheduled: Vec::new(),
            signals: Vec::new(),
            started: Instant::now(),
        };

        let count = source
            .controller_subsystem
            .num_joysticks()
            .map_err(Error::Backend)?;
        for index in 0..count {
            source.open(index);
        }
        Ok(source)
    }

    /// Devices that are currently connected, in slot order.
    pub fn devices(&self) -> Vec<&DeviceInfo> {
        let mut devices: Vec<_> = self.devices.values().map(|d| &d.info).collect();
        devices.sort_by_key(|info| info.slot);
        devices
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn free_slot(&self) -> Slot {
        self.snapshots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.snapshots.len()) as Slot
    }

    fn open(&mut self, index: u32) {
        if !self.controller_subsystem.is_game_controller(index) {
            return;
        }
        let controller = match self.controller_subsystem.open(index) {
            Ok(controller) => controller,
            Err(e) => {
                log::warn!("Failed to open controller {index}: {e}");
                return;
            }
        };
        let instance = controller.instance_id();
        if self.devices.contains_key(&instance) {
            return;
        }

        let slot = self.free_slot();
        let info = DeviceInfo {
            slot,
            id: device_id(
                controller.vendor_id(),
                controller.product_id(),
                &controller.name(),
            ),
            mapping: Mapping::Standard,
            capabilities: Capabilities {
                haptics: controller.has_rumble(),
                motion: controller.has_sensor(SensorType::Accelerometer)
                    || controller.has_sensor(SensorType::Gyroscope),
            },
            button_count: Button::COUNT,
            timestamp: self.now_ms(),
        };

        let mut device = Device::new(info.clone());
        if info.capabilities.haptics {
            device = device.with_actuator(Arc::new(SdlRumble::new(instance, self.cmd_tx.clone())));
        }

        let index = slot as usize;
        if index >= self.snapshots.len() {
            self.snapshots.resize(index + 1, None);
        }
        self.snapshots[index] = Some(Snapshot {
            buttons: vec![RawButton::default(); Button::COUNT],
            axes: vec![0.0; AXES.len()],
            ..Snapshot::new(slot)
        });
        self.devices.insert(
            instance,
            OpenDevice {
                slot,
                info,
                controller,
            },
        );
        self.signals.push(DeviceSignal::Connected(device));
    }

    fn close(&mut self, instance: u32) {
        let Some(device) = self.devices.remove(&instance) else {
            return;
        };
        if let Some(entry) = self.snapshots.get_mut(device.slot as usize) {
            *entry = None;
        }
        self.scheduled.retain(|cmd| cmd.instance() != instance);
        self.signals.push(DeviceSignal::Disconnected(device.slot));
    }

    fn run_commands(&mut self) {
        self.scheduled.extend(self.cmd_rx.try_iter());
        let now = Instant::now();
        let devices = &mut self.devices;
        self.scheduled.retain(|cmd| {
            if !cmd.is_due(now) {
                return true;
            }
            let Some(device) = devices.get_mut(&cmd.instance()) else {
                return false;
            };
            let result = match *cmd {
                Command::Rumble { low, high, ms, .. } => {
                    device.controller.set_rumble(low, high, ms)
                }
                Command::StopRumble { .. } => device.controller.set_rumble(0, 0, 0),
            };
            if let Err(e) = result {
                log::warn!("Failed to set rumble on slot {}: {e}", device.slot);
            }
            false
        });
    }

    fn sample(&mut self) {
        let timestamp = self.now_ms();
        for device in self.devices.values() {
            let Some(Some(snapshot)) = self.snapshots.get_mut(device.slot as usize) else {
                continue;
            };
            snapshot.timestamp = timestamp;
            for (value, axis) in snapshot.axes.iter_mut().zip(AXES) {
                *value = normalize_axis(device.controller.axis(axis));
            }
            for &button in Button::ALL {
                let raw = match button_source(button) {
                    ButtonSource::Digital(sdl_button) => {
                        let pressed = device.controller.button(sdl_button);
                        RawButton {
                            pressed,
                            value: if pressed { 1.0 } else { 0.0 },
                        }
                    }
                    ButtonSource::Trigger(axis) => {
                        let value = snapshot.axes[axis].abs();
                        RawButton {
                            pressed: value > TRIGGER_PRESSED,
                            value,
                        }
                    }
                };
                snapshot.buttons[button.slot()] = raw;
            }
        }
    }
}

impl InputSource for SdlSource {
    fn drain_signals(&mut self, out: &mut Vec<DeviceSignal>) {
        let events: Vec<Event> = self.event_pump.poll_iter().collect();
        for event in events {
            match event {
                Event::ControllerDeviceAdded { which, .. } => self.open(which),
                Event::ControllerDeviceRemoved { which, .. } => self.close(which),
                _ => {}
            }
        }
        self.run_commands();
        out.append(&mut self.signals);
    }

    fn snapshots(&mut self) -> &[Option<Snapshot>] {
        self.sample();
        &self.snapshots
    }
}
