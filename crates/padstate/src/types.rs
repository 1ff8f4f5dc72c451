use std::fmt;

use padstate_slot_derive::Slot;

use crate::SlotMapped;

/// Stable index a raw input source assigns to a connected device.
pub type Slot = u32;

/// Logical controller buttons, declared in raw slot order.
#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    #[slot(name = "LB")]
    LeftShoulder,
    #[slot(name = "RB")]
    RightShoulder,
    #[slot(name = "LT")]
    LeftTrigger,
    #[slot(name = "RT")]
    RightTrigger,
    Back,
    Start,
    #[slot(name = "LS")]
    LeftStick,
    #[slot(name = "RS")]
    RightStick,
    #[slot(name = "UP")]
    DPadUp,
    #[slot(name = "DOWN")]
    DPadDown,
    #[slot(name = "LEFT")]
    DPadLeft,
    #[slot(name = "RIGHT")]
    DPadRight,
    Home,
    Option,
}

impl Button {
    /// Name shown to the user, with the PlayStation face button aliases
    /// applied for PS controllers. Lookups always use [`Button::slot`].
    pub fn display_name(&self, kind: ControllerKind) -> &'static str {
        if kind != ControllerKind::PlayStation {
            return self.name();
        }
        match self {
            Button::A => "CROSS",
            Button::B => "CIRCLE",
            Button::X => "SQUARE",
            Button::Y => "TRIANGLE",
            other => other.name(),
        }
    }

    /// Raw axis slot carrying the analog value of a trigger button.
    pub fn trigger_axis(&self) -> Option<usize> {
        match self {
            Button::LeftTrigger => Some(4),
            Button::RightTrigger => Some(5),
            _ => None,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical stick axes, declared in raw axis order.
#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    #[slot(name = "LEFT_X")]
    LeftX,
    #[slot(name = "LEFT_Y")]
    LeftY,
    #[slot(name = "RIGHT_X")]
    RightX,
    #[slot(name = "RIGHT_Y")]
    RightY,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analog thumb sticks.
#[derive(Slot, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    /// The (x, y) axes of the stick.
    pub fn axes(&self) -> (Axis, Axis) {
        match self {
            Stick::Left => (Axis::LeftX, Axis::LeftY),
            Stick::Right => (Axis::RightX, Axis::RightY),
        }
    }
}

impl fmt::Display for Stick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vendor family of a controller, derived once at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Xbox,
    PlayStation,
    Nintendo,
    Pc,
    Android,
    Generic,
    Standard,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::Xbox => "Xbox",
            ControllerKind::PlayStation => "PS",
            ControllerKind::Nintendo => "NS",
            ControllerKind::Pc => "PC",
            ControllerKind::Android => "Android",
            ControllerKind::Generic => "Generic",
            ControllerKind::Standard => "Standard",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Button layout reported by the raw source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mapping {
    /// The device follows the standard gamepad layout.
    Standard,
    #[default]
    Unknown,
}

/// Optional hardware capabilities reported alongside a connect signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub haptics: bool,
    pub motion: bool,
}

/// Device meta information that remains stable for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub slot: Slot,
    /// Free text identifier, e.g. `054C-05C4-Sony Computer Entertainment Wireless Controller`.
    pub id: String,
    pub mapping: Mapping,
    pub capabilities: Capabilities,
    /// Number of buttons the device reports.
    pub button_count: usize,
    /// Source timestamp at connect, in milliseconds.
    pub timestamp: f64,
}

/// State of one logical button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    pub pressed: bool,
    pub value: f32,
}

/// Filtered analog stick position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalogPosition {
    pub x: f32,
    pub y: f32,
    pub magnitude: f32,
    pub angle: f32,
}

impl AnalogPosition {
    pub const REST: AnalogPosition = AnalogPosition {
        x: 0.0,
        y: 0.0,
        magnitude: 0.0,
        angle: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_table_is_bijective() {
        assert_eq!(Button::COUNT, 18);
        for (slot, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.slot(), slot);
            assert_eq!(Button::from_slot(slot), Some(*button));
            assert_eq!(Button::from_name(button.name()), Some(*button));
        }
        assert_eq!(Button::from_slot(18), None);
    }

    #[test]
    fn button_names_follow_raw_layout() {
        let names: Vec<_> = Button::ALL.iter().map(|b| b.name()).collect();
        assert_eq!(
            names,
            vec![
                "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "BACK", "START",
                "LS", "RS", "UP", "DOWN", "LEFT", "RIGHT", "HOME", "OPTION"
            ]
        );
    }

    #[test]
    fn button_lookup_is_case_insensitive() {
        assert_eq!(Button::from_name("start"), Some(Button::Start));
        assert_eq!(Button::from_name("Lb"), Some(Button::LeftShoulder));
        assert_eq!(Button::from_name("CROSS"), None);
    }

    #[test]
    fn playstation_aliases_are_display_only() {
        let ps = ControllerKind::PlayStation;
        assert_eq!(Button::A.display_name(ps), "CROSS");
        assert_eq!(Button::B.display_name(ps), "CIRCLE");
        assert_eq!(Button::X.display_name(ps), "SQUARE");
        assert_eq!(Button::Y.display_name(ps), "TRIANGLE");
        assert_eq!(Button::Start.display_name(ps), "START");
        assert_eq!(Button::A.display_name(ControllerKind::Xbox), "A");
    }

    #[test]
    fn axis_table() {
        assert_eq!(Axis::from_slot(0), Some(Axis::LeftX));
        assert_eq!(Axis::RightY.slot(), 3);
        assert_eq!(Axis::LeftY.name(), "LEFT_Y");
        assert_eq!(Stick::Right.axes(), (Axis::RightX, Axis::RightY));
        assert_eq!(Stick::Left.name(), "LEFT");
    }
}
