use padstate::Button;
use sdl2::controller::{Axis as SdlAxis, Button as SdlButton};

/// Raw axes in snapshot order.
pub(crate) const AXES: [SdlAxis; 6] = [
    SdlAxis::LeftX,
    SdlAxis::LeftY,
    SdlAxis::RightX,
    SdlAxis::RightY,
    SdlAxis::TriggerLeft,
    SdlAxis::TriggerRight,
];

/// Where the raw value of a logical button comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ButtonSource {
    Digital(SdlButton),
    /// Index into [`AXES`].
    Trigger(usize),
}

/// Source of every logical button, indexed by button slot.
pub(crate) fn button_source(button: Button) -> ButtonSource {
    match button {
        Button::A => ButtonSource::Digital(SdlButton::A),
        Button::B => ButtonSource::Digital(SdlButton::B),
        Button::X => ButtonSource::Digital(SdlButton::X),
        Button::Y => ButtonSource::Digital(SdlButton::Y),
        Button::LeftShoulder => ButtonSource::Digital(SdlButton::LeftShoulder),
        Button::RightShoulder => ButtonSource::Digital(SdlButton::RightShoulder),
        Button::LeftTrigger => ButtonSource::Trigger(4),
        Button::RightTrigger => ButtonSource::Trigger(5),
        Button::Back => ButtonSource::Digital(SdlButton::Back),
        Button::Start => ButtonSource::Digital(SdlButton::Start),
        Button::LeftStick => ButtonSource::Digital(SdlButton::LeftStick),
        Button::RightStick => ButtonSource::Digital(SdlButton::RightStick),
        Button::DPadUp => ButtonSource::Digital(SdlButton::DPadUp),
        Button::DPadDown => ButtonSource::Digital(SdlButton::DPadDown),
        Button::DPadLeft => ButtonSource::Digital(SdlButton::DPadLeft),
        Button::DPadRight => ButtonSource::Digital(SdlButton::DPadRight),
        Button::Home => ButtonSource::Digital(SdlButton::Guide),
        Button::Option => ButtonSource::Digital(SdlButton::Misc1),
    }
}

/// Maps a raw SDL axis value into `[-1.0, 1.0]`.
#[inline]
pub(crate) fn normalize_axis(value: i16) -> f32 {
    (f32::from(value) / 32767.0).clamp(-1.0, 1.0)
}

/// Identifier of a device, e.g. `054C-05C4-PS4 Controller`.
pub(crate) fn device_id(vendor: Option<u16>, product: Option<u16>, name: &str) -> String {
    format!(
        "{:04X}-{:04X}-{name}",
        vendor.unwrap_or(0),
        product.unwrap_or(0)
    )
}

#[cfg(test)]
mod tests {
    use padstate::SlotMapped;

    use super::*;

    #[test]
    fn normalize_axis_range() {
        assert_eq!(normalize_axis(0), 0.0);
        assert_eq!(normalize_axis(i16::MAX), 1.0);
        assert_eq!(normalize_axis(i16::MIN), -1.0);
        assert!((normalize_axis(16384) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn device_id_format() {
        assert_eq!(
            device_id(Some(0x054c), Some(0x5c4), "PS4 Controller"),
            "054C-05C4-PS4 Controller"
        );
        assert_eq!(device_id(None, None, "pad"), "0000-0000-pad");
    }

    #[test]
    fn triggers_read_from_axes() {
        assert_eq!(button_source(Button::LeftTrigger), ButtonSource::Trigger(4));
        assert_eq!(AXES[5], SdlAxis::TriggerRight);
        let digital = Button::ALL
            .iter()
            .filter(|b| matches!(button_source(**b), ButtonSource::Digital(_)))
            .count();
        assert_eq!(digital, Button::COUNT - 2);
    }
}
