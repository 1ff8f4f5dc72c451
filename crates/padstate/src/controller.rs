use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{after, bounded, Receiver};

use crate::deadzone::{
    angle_from_rest, apply_circular_dead_zone, apply_drift_dead_zone, DriftLatch,
};
use crate::diagnostics::DiagnosticSink;
use crate::dispatch::{EventDispatcher, ListenerId, ListenerOptions};
use crate::error::{Error, Result};
use crate::events::{ButtonAction, ControllerEvent, EventKind, LegacyEvent, LegacyKind};
use crate::haptics::{HapticActuator, VibrationEffect, VibrationPreset};
use crate::kind::detect_kind;
use crate::settings::{check_dead_zone, ControllerSettings, StickFilter};
use crate::slot::SlotSet;
use crate::source::{Device, Snapshot};
use crate::types::{
    AnalogPosition, Button, ButtonState, ControllerKind, DeviceInfo, Mapping, Slot, Stick,
};
use crate::SlotMapped;

/// Trigger axis value above which the trigger counts as pressed.
const TRIGGER_PRESS_THRESHOLD: f32 = 0.1;
/// Smallest button value change that is reported while the pressed flag stays.
const BUTTON_VALUE_EPSILON: f32 = 0.01;
/// Filtered stick magnitude above which the stick is held.
const STICK_HOLD_THRESHOLD: f32 = 0.1;
/// Smallest filtered axis change that is reported.
const AXIS_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default)]
struct StickState {
    position: AnalogPosition,
    held: bool,
    drift: DriftLatch,
}

/// State machine of one connected device.
///
/// Each update tick diffs the raw sample against the stored state and fires
/// events for the changes. State records are allocated once and updated in
/// place.
pub struct Controller {
    info: DeviceInfo,
    kind: ControllerKind,
    settings: ControllerSettings,
    buttons: [ButtonState; Button::COUNT],
    sticks: [StickState; Stick::COUNT],
    timestamp: f64,
    dispatcher: EventDispatcher,
    actuator: Option<Arc<dyn HapticActuator>>,
    sink: Arc<dyn DiagnosticSink>,
    pending: Vec<ControllerEvent>,
}

impl Controller {
    pub fn new(
        device: Device,
        settings: ControllerSettings,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        settings.validate()?;
        let kind = detect_kind(&device.info);
        Ok(Self {
            timestamp: device.info.timestamp,
            info: device.info,
            kind,
            settings,
            buttons: [ButtonState::default(); Button::COUNT],
            sticks: [StickState::default(); Stick::COUNT],
            dispatcher: EventDispatcher::new(sink.clone()),
            actuator: device.actuator,
            sink,
            pending: Vec::with_capacity(16),
        })
    }

    pub fn slot(&self) -> Slot {
        self.info.slot
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Source timestamp of the last processed sample, in milliseconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn display_name(&self) -> String {
        if self.info.mapping == Mapping::Standard {
            return format!("{} Controller (Standard)", self.kind);
        }
        if self.info.id.is_empty() {
            "Unknown Controller".to_string()
        } else {
            self.info.id.clone()
        }
    }

    pub fn has_haptic_support(&self) -> bool {
        self.actuator.is_some()
    }

    pub fn has_motion_support(&self) -> bool {
        self.info.capabilities.motion
    }

    pub fn has_touchpad_support(&self) -> bool {
        self.kind == ControllerKind::PlayStation && self.info.button_count >= 17
    }

    pub fn button_state(&self, button: Button) -> ButtonState {
        self.buttons[button.slot()]
    }

    /// Every button with its state, in slot order.
    pub fn button_states(&self) -> impl Iterator<Item = (Button, ButtonState)> + '_ {
        Button::ALL
            .iter()
            .map(|button| (*button, self.buttons[button.slot()]))
    }

    /// Strict lookup by canonical button name, case-insensitive.
    pub fn is_button_pressed(&self, name: &str) -> Result<bool> {
        let button =
            Button::from_name(name.trim()).ok_or_else(|| Error::UnknownButton(name.to_string()))?;
        Ok(self.buttons[button.slot()].pressed)
    }

    pub fn pressed(&self) -> SlotSet<Button> {
        self.button_states()
            .filter(|(_, state)| state.pressed)
            .map(|(button, _)| button)
            .collect()
    }

    /// Display names of the pressed buttons, in slot order.
    pub fn pressed_names(&self) -> Vec<&'static str> {
        self.pressed()
            .iter()
            .map(|button| button.display_name(self.kind))
            .collect()
    }

    pub fn stick(&self, stick: Stick) -> AnalogPosition {
        self.sticks[stick.slot()].position
    }

    pub fn is_stick_held(&self, stick: Stick) -> bool {
        self.sticks[stick.slot()].held
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn dead_zone(&self) -> f32 {
        self.settings.dead_zone
    }

    pub fn left_dead_zone(&self) -> f32 {
        self.settings.left_dead_zone
    }

    pub fn right_dead_zone(&self) -> f32 {
        self.settings.right_dead_zone
    }

    /// Sets the threshold used by the drift-compensated filter.
    pub fn set_dead_zone(&mut self, value: f32) -> Result<()> {
        self.settings.dead_zone = check_dead_zone(value)?;
        Ok(())
    }

    pub fn set_left_dead_zone(&mut self, value: f32) -> Result<()> {
        self.settings.left_dead_zone = check_dead_zone(value)?;
        Ok(())
    }

    pub fn set_right_dead_zone(&mut self, value: f32) -> Result<()> {
        self.settings.right_dead_zone = check_dead_zone(value)?;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: StickFilter) {
        self.settings.filter = filter;
    }

    pub fn add_listener<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.add_listener_with(kind, ListenerOptions::default(), callback)
    }

    pub fn add_listener_with<F>(
        &mut self,
        kind: EventKind,
        options: ListenerOptions,
        callback: F,
    ) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.dispatcher.add_listener(kind, options, Box::new(callback))
    }

    /// Registers a listener by event name, e.g. `"buttondown"` or `"AxisChange"`.
    pub fn add_named_listener<F>(&mut self, name: &str, callback: F) -> Result<ListenerId>
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        let kind = name.parse::<EventKind>()?;
        Ok(self.add_listener(kind, callback))
    }

    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.dispatcher.remove_listener(kind, id)
    }

    /// Sets the single legacy callback for `kind`, replacing the previous one.
    pub fn on<F>(&mut self, kind: LegacyKind, callback: F)
    where
        F: FnMut(&LegacyEvent) + 'static,
    {
        self.dispatcher.on(kind, Box::new(callback));
    }

    pub fn off(&mut self, kind: LegacyKind) {
        self.dispatcher.off(kind);
    }

    /// Starts a vibration effect.
    ///
    /// The returned channel fires once `start_delay + duration` has elapsed.
    /// Devices without an actuator return [`Error::Unsupported`].
    pub fn vibrate(&self, effect: VibrationEffect) -> Result<Receiver<Instant>> {
        let actuator = self.actuator.as_ref().ok_or(Error::Unsupported)?;
        let effect = effect.normalized()?;
        actuator.play_effect(&effect)?;
        Ok(after(effect.total()))
    }

    /// Plays a named preset, optionally after `start_delay`.
    pub fn vibrate_preset(
        &self,
        name: &str,
        start_delay: Option<Duration>,
    ) -> Result<Receiver<Instant>> {
        let preset = name.parse::<VibrationPreset>()?;
        self.vibrate(VibrationEffect {
            start_delay: start_delay.unwrap_or_default(),
            ..preset.effect()
        })
    }

    /// Plays the steps one after another on a background thread.
    ///
    /// The returned channel receives `()` after the last step has finished.
    pub fn vibrate_pattern(&self, steps: Vec<VibrationEffect>) -> Result<Receiver<()>> {
        let actuator = self.actuator.clone().ok_or(Error::Unsupported)?;
        let steps = steps
            .into_iter()
            .map(VibrationEffect::normalized)
            .collect::<Result<Vec<_>>>()?;

        let (done_tx, done_rx) = bounded(1);
        let sink = self.sink.clone();
        let slot = self.slot();
        thread::Builder::new()
            .name(format!("padstate-vibration-{slot}"))
            .spawn(move || {
                for step in &steps {
                    if let Err(e) = actuator.play_effect(step) {
                        sink.warn(&format!("Vibration pattern on slot {slot} aborted: {e}"));
                        break;
                    }
                    thread::sleep(step.total());
                }
                let _ = done_tx.send(());
            })
            .map_err(|e| Error::Backend(e.to_string()))?;
        Ok(done_rx)
    }

    /// Stops any running effect. A device without an actuator only produces
    /// a warning.
    pub fn stop_vibration(&self) -> Result<()> {
        match &self.actuator {
            Some(actuator) => actuator.reset(),
            None => {
                self.sink.warn(&format!(
                    "Controller {} has no haptic actuator, nothing to stop",
                    self.slot()
                ));
                Ok(())
            }
        }
    }

    pub(crate) fn update(&mut self, snapshot: &Snapshot) {
        self.timestamp = snapshot.timestamp;
        self.diff_buttons(snapshot);
        self.diff_sticks(snapshot);
        for event in self.pending.drain(..) {
            self.dispatcher.fire(&event);
        }
    }

    fn diff_buttons(&mut self, snapshot: &Snapshot) {
        for &button in Button::ALL {
            let slot = button.slot();
            let raw = snapshot.buttons.get(slot);
            let trigger = button
                .trigger_axis()
                .and_then(|axis| snapshot.axes.get(axis));

            let (pressed, value) = match (trigger, raw) {
                (Some(axis), _) => {
                    let value = sanitize(axis.abs());
                    (value > TRIGGER_PRESS_THRESHOLD, value)
                }
                (None, Some(raw)) => (raw.pressed, sanitize(raw.value)),
                (None, None) => continue,
            };

            let state = &mut self.buttons[slot];
            let was_pressed = state.pressed;
            let changed =
                pressed != was_pressed || (value - state.value).abs() > BUTTON_VALUE_EPSILON;
            state.pressed = pressed;
            state.value = value;
            if !changed {
                continue;
            }

            let name = button.display_name(self.kind);
            let action = match (was_pressed, pressed) {
                (false, true) => {
                    self.pending.push(ControllerEvent::ButtonDown {
                        button,
                        name,
                        value,
                    });
                    ButtonAction::Pressed
                }
                (true, false) => {
                    self.pending.push(ControllerEvent::ButtonUp {
                        button,
                        name,
                        value,
                    });
                    ButtonAction::Released
                }
                _ => ButtonAction::Held,
            };
            self.pending.push(ControllerEvent::ButtonPress {
                button,
                name,
                value,
                was_pressed,
            });
            self.pending.push(ControllerEvent::Button {
                button,
                name,
                value,
                action,
            });
        }
    }

    fn diff_sticks(&mut self, snapshot: &Snapshot) {
        for &stick in Stick::ALL {
            let (axis_x, axis_y) = stick.axes();
            let x = finite_or_rest(snapshot.axis(axis_x.slot()));
            let y = finite_or_rest(snapshot.axis(axis_y.slot()));
            let state = &mut self.sticks[stick.slot()];

            let filtered = match self.settings.filter {
                StickFilter::Circular => {
                    apply_circular_dead_zone(x, y, self.settings.dead_zone_for(stick))
                }
                StickFilter::DriftCompensated => {
                    apply_drift_dead_zone(x, y, &mut state.drift, self.settings.dead_zone)
                }
            };

            let held = filtered.magnitude > STICK_HOLD_THRESHOLD;
            if held != state.held {
                state.held = held;
                self.pending.push(if held {
                    ControllerEvent::Grab(stick)
                } else {
                    ControllerEvent::Drop(stick)
                });
            }

            let previous = state.position;
            if (filtered.x - previous.x).abs() <= AXIS_EPSILON
                && (filtered.y - previous.y).abs() <= AXIS_EPSILON
            {
                continue;
            }
            let angle = angle_from_rest(filtered.x, filtered.y);
            state.position = AnalogPosition { angle, ..filtered };

            self.pending.push(ControllerEvent::AxisChange {
                axis: axis_x,
                value: filtered.x,
                angle,
                repeat: true,
            });
            self.pending.push(ControllerEvent::AxisChange {
                axis: axis_y,
                value: filtered.y,
                angle,
                repeat: true,
            });
        }
    }
}

/// Non-finite axis readings count as a stick at rest.
fn finite_or_rest(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("slot", &self.info.slot)
            .field("kind", &self.kind)
            .field("id", &self.info.id)
            .field("pressed", &self.pressed_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use super::*;
    use crate::diagnostics::testing::RecordingSink;
    use crate::haptics::testing::RecordingActuator;
    use crate::source::RawButton;
    use crate::types::{Axis, Capabilities};

    fn info(slot: Slot, id: &str) -> DeviceInfo {
        DeviceInfo {
            slot,
            id: id.to_string(),
            mapping: Mapping::Standard,
            capabilities: Capabilities::default(),
            button_count: 17,
            timestamp: 0.0,
        }
    }

    fn controller_with(id: &str, settings: ControllerSettings) -> (Controller, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let controller = Controller::new(Device::new(info(0, id)), settings, sink.clone())
            .expect("valid settings");
        (controller, sink)
    }

    fn controller(id: &str) -> Controller {
        controller_with(id, ControllerSettings::default()).0
    }

    fn record(controller: &mut Controller) -> Rc<RefCell<Vec<ControllerEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &kind in EventKind::ALL {
            let log = log.clone();
            controller.add_listener(kind, move |event| log.borrow_mut().push(event.clone()));
        }
        log
    }

    fn buttons(pressed: &[(usize, f32)]) -> Vec<RawButton> {
        let mut raw = vec![RawButton::default(); Button::COUNT];
        for &(slot, value) in pressed {
            raw[slot] = RawButton {
                pressed: value > 0.0,
                value,
            };
        }
        raw
    }

    fn sample(buttons: Vec<RawButton>, axes: &[f32]) -> Snapshot {
        Snapshot {
            slot: 0,
            timestamp: 0.0,
            buttons,
            axes: axes.to_vec(),
        }
    }

    fn kinds(log: &Rc<RefCell<Vec<ControllerEvent>>>) -> Vec<EventKind> {
        log.borrow().iter().map(ControllerEvent::kind).collect()
    }

    #[test]
    fn button_edges_fire_once() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[]), &[]));
        assert!(log.borrow().is_empty());

        pad.update(&sample(buttons(&[(0, 1.0)]), &[]));
        assert_eq!(
            log.borrow()[0],
            ControllerEvent::ButtonDown {
                button: Button::A,
                name: "A",
                value: 1.0
            }
        );
        assert_eq!(
            kinds(&log),
            vec![EventKind::ButtonDown, EventKind::ButtonPress, EventKind::Button]
        );
        assert!(pad.is_button_pressed("a").unwrap());

        log.borrow_mut().clear();
        for _ in 0..3 {
            pad.update(&sample(buttons(&[(0, 1.0)]), &[]));
        }
        assert!(log.borrow().is_empty());

        pad.update(&sample(buttons(&[]), &[]));
        assert_eq!(
            log.borrow()[0],
            ControllerEvent::ButtonUp {
                button: Button::A,
                name: "A",
                value: 0.0
            }
        );
        assert_eq!(
            log.borrow()[2],
            ControllerEvent::Button {
                button: Button::A,
                name: "A",
                value: 0.0,
                action: ButtonAction::Released
            }
        );
        assert!(!pad.is_button_pressed("A").unwrap());
    }

    #[test]
    fn small_value_steps_update_state_silently() {
        let mut pad = controller("Xbox Wireless Controller");
        let lb = Button::LeftShoulder.slot();
        pad.update(&sample(buttons(&[(lb, 0.5)]), &[]));
        let log = record(&mut pad);

        for value in [0.505, 0.51, 0.515, 0.52] {
            pad.update(&sample(buttons(&[(lb, value)]), &[]));
            assert_eq!(pad.button_state(Button::LeftShoulder).value, value);
        }
        assert!(log.borrow().is_empty());
        assert!(pad.button_state(Button::LeftShoulder).pressed);
    }

    #[test]
    fn playstation_uses_face_button_aliases() {
        let mut pad = controller("Sony DualSense Wireless Controller");
        assert_eq!(pad.kind(), ControllerKind::PlayStation);
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[(0, 1.0)]), &[]));

        assert_eq!(
            log.borrow()[0],
            ControllerEvent::ButtonDown {
                button: Button::A,
                name: "CROSS",
                value: 1.0
            }
        );
        assert_eq!(pad.pressed_names(), vec!["CROSS"]);
        assert!(pad.is_button_pressed("A").unwrap());
    }

    #[test]
    fn value_change_while_pressed_is_held() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[(4, 0.5)]), &[]));
        log.borrow_mut().clear();

        pad.update(&sample(buttons(&[(4, 0.505)]), &[]));
        assert!(log.borrow().is_empty());

        pad.update(&sample(buttons(&[(4, 0.8)]), &[]));
        assert_eq!(kinds(&log), vec![EventKind::ButtonPress, EventKind::Button]);
        assert_eq!(
            log.borrow()[1],
            ControllerEvent::Button {
                button: Button::LeftShoulder,
                name: "LB",
                value: 0.8,
                action: ButtonAction::Held
            }
        );
    }

    #[test]
    fn trigger_axis_overrides_digital_flag() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        // digital flag says pressed, axis says barely touched
        let mut raw = buttons(&[(7, 1.0)]);
        pad.update(&sample(raw.clone(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.05]));
        assert!(!pad.button_state(Button::RightTrigger).pressed);

        raw[7] = RawButton::default();
        pad.update(&sample(raw, &[0.0, 0.0, 0.0, 0.0, -0.6, 0.05]));
        let state = pad.button_state(Button::LeftTrigger);
        assert!(state.pressed);
        assert_eq!(state.value, 0.6);
        assert!(log.borrow().contains(&ControllerEvent::ButtonDown {
            button: Button::LeftTrigger,
            name: "LT",
            value: 0.6
        }));
    }

    #[test]
    fn short_samples_are_tolerated() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[(0, 1.0)])[..2].to_vec(), &[0.7]));

        assert!(pad.button_state(Button::A).pressed);
        assert!(!pad.button_state(Button::Option).pressed);
        let position = pad.stick(Stick::Left);
        assert!(position.x > 0.0);
        assert_eq!(position.y, 0.0);
        assert!(kinds(&log).contains(&EventKind::Grab));
    }

    #[test]
    fn left_stick_grab_then_axis_change() {
        let (mut pad, _) = controller_with(
            "Xbox Wireless Controller",
            ControllerSettings {
                left_dead_zone: 0.1,
                ..ControllerSettings::default()
            },
        );
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[]), &[0.0, 0.0]));
        pad.update(&sample(buttons(&[]), &[0.05, 0.0]));
        assert!(log.borrow().is_empty());
        assert_eq!(pad.stick(Stick::Left), AnalogPosition::REST);

        pad.update(&sample(buttons(&[]), &[0.5, 0.0]));
        let events = log.borrow();
        assert_eq!(events[0], ControllerEvent::Grab(Stick::Left));
        match events[1] {
            ControllerEvent::AxisChange {
                axis: Axis::LeftX,
                value,
                angle,
                repeat: true,
            } => {
                assert!((value - 0.444_444).abs() < 1e-4);
                assert_eq!(pad.stick(Stick::Left).angle, angle);
            }
            ref other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(
            events[2],
            ControllerEvent::AxisChange {
                axis: Axis::LeftY,
                ..
            }
        ));
        assert_eq!(events.len(), 3);
        assert!(pad.is_stick_held(Stick::Left));
    }

    #[test]
    fn grab_and_drop_alternate() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);
        let samples = [0.0, 0.5, 0.9, 0.15, 0.05, 0.0, 1.0, 0.0, 0.6, 0.61];

        let mut balance = 0i32;
        for x in samples {
            log.borrow_mut().clear();
            pad.update(&sample(buttons(&[]), &[0.0, 0.0, x, 0.0]));
            for event in log.borrow().iter() {
                match event {
                    ControllerEvent::Grab(Stick::Right) => balance += 1,
                    ControllerEvent::Drop(Stick::Right) => balance -= 1,
                    _ => {}
                }
                assert!((0..=1).contains(&balance));
            }
        }
        assert_eq!(balance, 1);
    }

    #[test]
    fn axis_change_is_always_flagged_as_repeat() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[]), &[0.0, 0.5]));
        pad.update(&sample(buttons(&[]), &[0.0, 0.9]));

        let repeats: Vec<bool> = log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ControllerEvent::AxisChange {
                    axis: Axis::LeftY,
                    repeat,
                    ..
                } => Some(*repeat),
                _ => None,
            })
            .collect();
        assert_eq!(repeats, vec![true, true]);
    }

    #[test]
    fn stored_angle_matches_event_angle() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[]), &[0.0, 0.0, 0.6, -0.6]));

        let angle = log
            .borrow()
            .iter()
            .find_map(|event| match event {
                ControllerEvent::AxisChange { angle, .. } => Some(*angle),
                _ => None,
            })
            .expect("axis change fired");
        assert_eq!(angle, angle_from_rest(pad.stick(Stick::Right).x, pad.stick(Stick::Right).y));
        assert_eq!(pad.stick(Stick::Right).angle, angle);
    }

    #[test]
    fn non_finite_axes_read_as_rest() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = record(&mut pad);

        for _ in 0..3 {
            pad.update(&sample(buttons(&[]), &[f32::NAN, f32::INFINITY]));
        }
        assert!(log.borrow().is_empty());
        assert_eq!(pad.stick(Stick::Left), AnalogPosition::REST);

        pad.update(&sample(buttons(&[]), &[0.5, f32::NAN]));
        assert_eq!(kinds(&log)[0], EventKind::Grab);
        assert_eq!(pad.stick(Stick::Left).y, 0.0);
    }

    #[test]
    fn drift_filter_learns_resting_bias() {
        let (mut pad, _) = controller_with(
            "Xbox Wireless Controller",
            ControllerSettings {
                dead_zone: 0.1,
                filter: StickFilter::DriftCompensated,
                ..ControllerSettings::default()
            },
        );
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[]), &[0.2, -0.2]));
        pad.update(&sample(buttons(&[]), &[0.25, -0.2]));
        assert!(log.borrow().is_empty());

        pad.update(&sample(buttons(&[]), &[1.0, -0.2]));
        assert_eq!(log.borrow()[0], ControllerEvent::Grab(Stick::Left));
        assert_eq!(pad.stick(Stick::Left).y, 0.0);
    }

    #[test]
    fn legacy_adapter_receives_press_and_release() {
        let mut pad = controller("Xbox Wireless Controller");
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [LegacyKind::Press, LegacyKind::Release, LegacyKind::Grab] {
            let log = log.clone();
            pad.on(kind, move |event| log.borrow_mut().push(event.clone()));
        }

        pad.update(&sample(buttons(&[(1, 1.0)]), &[]));
        pad.update(&sample(buttons(&[(1, 0.5)]), &[]));
        pad.update(&sample(buttons(&[]), &[]));

        assert_eq!(
            *log.borrow(),
            vec![
                LegacyEvent::Press {
                    name: "B",
                    value: 1.0,
                    repeat: false
                },
                LegacyEvent::Press {
                    name: "B",
                    value: 0.5,
                    repeat: true
                },
                LegacyEvent::Release {
                    name: "B",
                    value: 0.0
                },
            ]
        );
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let (mut pad, sink) = controller_with("Xbox Wireless Controller", ControllerSettings::default());
        pad.add_listener(EventKind::ButtonDown, |_| panic!("listener failed"));
        let log = record(&mut pad);

        pad.update(&sample(buttons(&[(3, 1.0)]), &[]));

        assert_eq!(kinds(&log).len(), 3);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn named_listener_rejects_unknown_event() {
        let mut pad = controller("Xbox Wireless Controller");
        assert!(pad.add_named_listener("ButtonDown", |_| {}).is_ok());
        assert_eq!(
            pad.add_named_listener("keypress", |_| {}),
            Err(Error::UnknownEvent("keypress".into()))
        );
    }

    #[test]
    fn dead_zone_configuration() {
        let mut pad = controller("Xbox Wireless Controller");
        assert_eq!(pad.set_left_dead_zone(1.2), Err(Error::DeadZoneOutOfRange(1.2)));
        assert_eq!(pad.left_dead_zone(), 0.1);
        pad.set_right_dead_zone(0.25).unwrap();
        assert_eq!(pad.right_dead_zone(), 0.25);
        pad.set_dead_zone(0.0).unwrap();
        assert_eq!(pad.dead_zone(), 0.0);
        assert!(pad.set_dead_zone(-0.5).is_err());

        let sink = Arc::new(RecordingSink::default());
        let settings = ControllerSettings {
            dead_zone: 3.0,
            ..ControllerSettings::default()
        };
        assert!(Controller::new(Device::new(info(1, "pad")), settings, sink).is_err());
    }

    #[test]
    fn unknown_button_name_is_an_error() {
        let pad = controller("Xbox Wireless Controller");
        assert_eq!(
            pad.is_button_pressed("TURBO"),
            Err(Error::UnknownButton("TURBO".into()))
        );
    }

    #[test]
    fn metadata() {
        let pad = controller("Sony DualSense Wireless Controller");
        assert_eq!(pad.display_name(), "PS Controller (Standard)");
        assert!(pad.has_touchpad_support());
        assert!(!pad.has_haptic_support());

        let sink = Arc::new(RecordingSink::default());
        let mut raw = info(2, "Arcade Stick");
        raw.mapping = Mapping::Unknown;
        let stick = Controller::new(Device::new(raw), ControllerSettings::default(), sink).unwrap();
        assert_eq!(stick.kind(), ControllerKind::Generic);
        assert_eq!(stick.display_name(), "Arcade Stick");
    }

    #[test]
    fn vibration_requires_actuator() {
        let (pad, sink) = controller_with("Xbox Wireless Controller", ControllerSettings::default());
        let effect = VibrationEffect::dual_rumble(Duration::from_millis(10), 0.5, 0.5);
        assert!(matches!(pad.vibrate(effect), Err(Error::Unsupported)));
        assert!(pad.stop_vibration().is_ok());
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn vibrate_plays_clamped_effect_and_completes() {
        let actuator = Arc::new(RecordingActuator::default());
        let sink = Arc::new(RecordingSink::default());
        let device = Device::new(info(0, "Xbox Wireless Controller")).with_actuator(actuator.clone());
        let pad = Controller::new(device, ControllerSettings::default(), sink).unwrap();

        let done = pad
            .vibrate(VibrationEffect {
                start_delay: Duration::from_millis(5),
                ..VibrationEffect::dual_rumble(Duration::from_millis(5), 2.0, 0.5)
            })
            .unwrap();
        assert!(done.recv_timeout(Duration::from_secs(1)).is_ok());
        assert_eq!(actuator.effects.lock().unwrap()[0].weak_magnitude, 1.0);

        assert!(pad.vibrate_preset("Light-Tap", None).is_ok());
        assert!(pad
            .vibrate_preset("damage", Some(Duration::from_millis(20)))
            .is_ok());
        {
            let effects = actuator.effects.lock().unwrap();
            assert_eq!(effects[1].start_delay, Duration::ZERO);
            assert_eq!(effects[2].start_delay, Duration::from_millis(20));
            assert_eq!(effects[2].duration, Duration::from_millis(150));
        }
        assert!(matches!(
            pad.vibrate_preset("nope", None),
            Err(Error::UnknownPreset(_))
        ));
        assert!(matches!(
            pad.vibrate(VibrationEffect::dual_rumble(Duration::ZERO, 1.0, 1.0)),
            Err(Error::InvalidDuration)
        ));

        pad.stop_vibration().unwrap();
        assert_eq!(*actuator.resets.lock().unwrap(), 1);
    }

    #[test]
    fn vibrate_pattern_plays_every_step() {
        let actuator = Arc::new(RecordingActuator::default());
        let sink = Arc::new(RecordingSink::default());
        let device = Device::new(info(0, "Xbox Wireless Controller")).with_actuator(actuator.clone());
        let pad = Controller::new(device, ControllerSettings::default(), sink).unwrap();

        let step = VibrationEffect::dual_rumble(Duration::from_millis(2), 0.2, 0.4);
        let done = pad.vibrate_pattern(vec![step, step, step]).unwrap();

        assert!(done.recv_timeout(Duration::from_secs(1)).is_ok());
        assert_eq!(actuator.effects.lock().unwrap().len(), 3);
    }
}
