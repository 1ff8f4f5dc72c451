use std::fmt;
use std::str::FromStr;

use padstate_slot_derive::Slot;

use crate::error::Error;
use crate::types::{Axis, Button, Stick};
use crate::SlotMapped;

/// Classification of a button change for the `button` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Button went from released to pressed.
    Pressed,
    /// Button stays pressed but its value moved.
    Held,
    /// Button went from pressed to released.
    Released,
}

impl ButtonAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonAction::Pressed => "pressed",
            ButtonAction::Held => "held",
            ButtonAction::Released => "released",
        }
    }
}

/// Events emitted by a controller while diffing polled samples.
///
/// `name` fields carry the display name of the button, so PlayStation
/// controllers report `CROSS` instead of `A`.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    ButtonDown {
        button: Button,
        name: &'static str,
        value: f32,
    },
    ButtonUp {
        button: Button,
        name: &'static str,
        value: f32,
    },
    /// Fired on every button change, after `ButtonDown`/`ButtonUp`.
    ButtonPress {
        button: Button,
        name: &'static str,
        value: f32,
        was_pressed: bool,
    },
    /// Fired on every button change, last.
    Button {
        button: Button,
        name: &'static str,
        value: f32,
        action: ButtonAction,
    },
    /// A stick left its rest area.
    Grab(Stick),
    /// A stick returned to its rest area.
    Drop(Stick),
    /// A stick axis moved; value is filtered and lies in [-1.0, 1.0].
    AxisChange {
        axis: Axis,
        value: f32,
        angle: f32,
        repeat: bool,
    },
}

impl ControllerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ControllerEvent::ButtonDown { .. } => EventKind::ButtonDown,
            ControllerEvent::ButtonUp { .. } => EventKind::ButtonUp,
            ControllerEvent::ButtonPress { .. } => EventKind::ButtonPress,
            ControllerEvent::Button { .. } => EventKind::Button,
            ControllerEvent::Grab(_) => EventKind::Grab,
            ControllerEvent::Drop(_) => EventKind::Drop,
            ControllerEvent::AxisChange { .. } => EventKind::AxisChange,
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            ControllerEvent::ButtonDown { name, value, .. }
            | ControllerEvent::ButtonUp { name, value, .. } => {
                write!(f, "{kind}({name}, {value:.2})")
            }
            ControllerEvent::ButtonPress {
                name,
                value,
                was_pressed,
                ..
            } => write!(f, "{kind}({name}, {value:.2}, {was_pressed})"),
            ControllerEvent::Button {
                name, value, action, ..
            } => write!(f, "{kind}({name}, {value:.2}, {})", action.as_str()),
            ControllerEvent::Grab(stick) | ControllerEvent::Drop(stick) => {
                write!(f, "{kind}({stick})")
            }
            ControllerEvent::AxisChange {
                axis,
                value,
                angle,
                repeat,
            } => write!(f, "{kind}({axis}, {value:.3}, {angle:.3}, {repeat})"),
        }
    }
}

/// Names under which controller listeners are registered.
#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ButtonDown,
    ButtonUp,
    ButtonPress,
    Button,
    Grab,
    Drop,
    AxisChange,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_lowercase())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::from_name(s.trim()).ok_or_else(|| Error::UnknownEvent(s.to_string()))
    }
}

/// Coarse events of the single-callback interface.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyEvent {
    /// Button value is above zero. `repeat` is set while it was already down.
    Press {
        name: &'static str,
        value: f32,
        repeat: bool,
    },
    /// Button value dropped to zero.
    Release { name: &'static str, value: f32 },
    Axis {
        axis: Axis,
        value: f32,
        angle: f32,
        repeat: bool,
    },
    Grab(Stick),
    Drop(Stick),
}

impl LegacyEvent {
    /// Translates a canonical event into its coarse counterpart.
    pub fn from_event(event: &ControllerEvent) -> Option<LegacyEvent> {
        match *event {
            ControllerEvent::ButtonPress {
                name,
                value,
                was_pressed,
                ..
            } => Some(if value > 0.0 {
                LegacyEvent::Press {
                    name,
                    value,
                    repeat: was_pressed,
                }
            } else {
                LegacyEvent::Release { name, value }
            }),
            ControllerEvent::AxisChange {
                axis,
                value,
                angle,
                repeat,
            } => Some(LegacyEvent::Axis {
                axis,
                value,
                angle,
                repeat,
            }),
            ControllerEvent::Grab(stick) => Some(LegacyEvent::Grab(stick)),
            ControllerEvent::Drop(stick) => Some(LegacyEvent::Drop(stick)),
            ControllerEvent::ButtonDown { .. }
            | ControllerEvent::ButtonUp { .. }
            | ControllerEvent::Button { .. } => None,
        }
    }

    pub fn kind(&self) -> LegacyKind {
        match self {
            LegacyEvent::Press { .. } => LegacyKind::Press,
            LegacyEvent::Release { .. } => LegacyKind::Release,
            LegacyEvent::Axis { .. } => LegacyKind::Axis,
            LegacyEvent::Grab(_) => LegacyKind::Grab,
            LegacyEvent::Drop(_) => LegacyKind::Drop,
        }
    }
}

#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyKind {
    Press,
    Release,
    Axis,
    Grab,
    Drop,
}

impl FromStr for LegacyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LegacyKind::from_name(s.trim()).ok_or_else(|| Error::UnknownEvent(s.to_string()))
    }
}
