use colored::Colorize;
use padstate::{
    detect_kind, Controller, ControllerEvent, DeviceInfo, EventKind, IntervalScheduler, Registry,
    Slot,
};
use padstate_profile::{Profile, ProfileError};
use padstate_sdl::SdlSource;
use thiserror::Error;

use crate::{print_debug, print_info, print_warning};

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("controller error: {0}")]
    Controller(#[from] padstate::Error),
    #[error("signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Builds a registry that applies the profile to every connected controller
/// and prints the configured events.
pub fn build_registry(profile: &Profile) -> Registry {
    let mut registry = Registry::new();

    let settings = profile.clone();
    registry.set_settings_resolver(move |info| settings.settings_for(info));

    let events = profile.events.clone();
    let rumble = profile.connect_rumble;
    registry.on_connect(move |controller| {
        print_info!(
            "{} connected on slot {}",
            controller.display_name(),
            controller.slot()
        );
        attach_printers(controller, &events);

        let Some(preset) = rumble else {
            return;
        };
        if !controller.has_haptic_support() {
            return;
        }
        if let Err(e) = controller.vibrate(preset.effect()) {
            print_warning!("connect rumble failed on slot {}: {e}", controller.slot());
        }
    });
    registry.on_disconnect(|controller| {
        print_info!(
            "{} disconnected from slot {}",
            controller.display_name(),
            controller.slot()
        );
    });
    registry
}

fn attach_printers(controller: &mut Controller, events: &[EventKind]) {
    let slot = controller.slot();
    for &kind in events {
        controller.add_listener(kind, move |event| {
            if matches!(event, ControllerEvent::AxisChange { .. }) {
                print_debug!("{}", format_event(slot, event));
            } else {
                print_info!("{}", format_event(slot, event));
            }
        });
    }
}

/// Log line for an event of the controller on `slot`.
pub fn format_event(slot: Slot, event: &ControllerEvent) -> String {
    format!("[{slot}] {event}")
}

/// Summary line for `padstated devices`.
pub fn describe_device(info: &DeviceInfo) -> String {
    let mut capabilities = Vec::new();
    if info.capabilities.haptics {
        capabilities.push("haptics");
    }
    if info.capabilities.motion {
        capabilities.push("motion");
    }
    let capabilities = if capabilities.is_empty() {
        "none".to_string()
    } else {
        capabilities.join(", ")
    };
    format!(
        "{}: {} [{}] capabilities: {capabilities}",
        info.slot,
        info.id,
        detect_kind(info)
    )
}

/// Runs the poll loop over the SDL backend until Ctrl+C.
pub fn run(profile: &Profile) -> Result<(), DaemonError> {
    let mut source = SdlSource::new()?;
    let mut registry = build_registry(profile);

    let stop = registry.stop_handle();
    ctrlc::set_handler(move || stop.stop())?;

    let mut scheduler = IntervalScheduler::new(profile.tick);
    print_info!(
        "padstated started, polling every {}ms",
        profile.tick.as_millis()
    );
    registry.run(&mut source, &mut scheduler);
    print_info!("padstated stopped");
    Ok(())
}

/// Prints the controllers that are plugged in right now.
pub fn list_devices() -> Result<(), DaemonError> {
    let source = SdlSource::new()?;
    let devices = source.devices();
    if devices.is_empty() {
        print_info!("No controllers connected");
    }
    for info in devices {
        print_info!("{}", describe_device(info));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use padstate::{
        Button, Capabilities, Device, Mapping, RawButton, SlotMapped, Snapshot, Stick,
    };
    use padstate_profile::{parse_profile, DeviceOverride};

    use super::*;

    fn info(slot: Slot, id: &str) -> DeviceInfo {
        DeviceInfo {
            slot,
            id: id.to_string(),
            mapping: Mapping::Standard,
            capabilities: Capabilities {
                haptics: true,
                motion: false,
            },
            button_count: 17,
            timestamp: 0.0,
        }
    }

    #[test]
    fn registry_applies_device_overrides() {
        let profile = Profile {
            devices: vec![DeviceOverride {
                pattern: "dualshock".into(),
                dead_zone: None,
                left_dead_zone: Some(0.3),
                right_dead_zone: None,
            }],
            ..Profile::default()
        };
        let mut registry = build_registry(&profile);
        registry.connect(Device::new(info(0, "054C-05C4-DualShock 4"))).unwrap();
        registry.connect(Device::new(info(1, "Xbox Wireless Controller"))).unwrap();

        assert_eq!(registry.controller(0).unwrap().left_dead_zone(), 0.3);
        assert_eq!(registry.controller(1).unwrap().left_dead_zone(), 0.1);
    }

    #[test]
    fn printers_do_not_consume_events() {
        let profile =
            parse_profile("version: 1\nevents: [buttondown, buttonup, axischange]\n").unwrap();
        let mut registry = build_registry(&profile);
        registry.connect(Device::new(info(0, "pad"))).unwrap();

        let seen = Rc::new(RefCell::new(0));
        let count = seen.clone();
        registry
            .controller_mut(0)
            .unwrap()
            .add_listener(EventKind::ButtonDown, move |_| *count.borrow_mut() += 1);

        let mut buttons = vec![RawButton::default(); Button::COUNT];
        buttons[Button::Start.slot()] = RawButton {
            pressed: true,
            value: 1.0,
        };
        registry.poll_gamepad_state(&[Some(Snapshot {
            buttons,
            axes: vec![0.8, 0.0],
            ..Snapshot::new(0)
        })]);

        assert_eq!(*seen.borrow(), 1);
        assert!(registry.controller(0).unwrap().is_stick_held(Stick::Left));
    }

    #[test]
    fn format_event_line() {
        let line = format_event(2, &ControllerEvent::Grab(Stick::Left));
        assert_eq!(line, "[2] grab(LEFT)");
    }

    #[test]
    fn describe_device_line() {
        let line = describe_device(&info(1, "Xbox Wireless Controller"));
        assert_eq!(
            line,
            "1: Xbox Wireless Controller [Xbox] capabilities: haptics"
        );
    }
}
