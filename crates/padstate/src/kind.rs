use crate::types::{ControllerKind, DeviceInfo, Mapping};

/// Identifiers of known controllers and their vendor family.
const KNOWN_IDS: &[(&str, ControllerKind)] = &[
    ("Xbox 360 Controller (XInput STANDARD GAMEPAD)", ControllerKind::Xbox),
    (
        "Wireless Controller (STANDARD GAMEPAD Vendor: 054c Product: 09cc)",
        ControllerKind::PlayStation,
    ),
    ("045E-02EA-Microsoft X-Box 360 pad", ControllerKind::Xbox),
    ("045E-028E-Microsoft X-Box One pad", ControllerKind::Xbox),
    ("045E-02DD-Microsoft X-Box One pad (Firmware 2015)", ControllerKind::Xbox),
    (
        "054C-05C4-Sony Computer Entertainment Wireless Controller",
        ControllerKind::PlayStation,
    ),
    ("054C-09CC-Sony PLAYSTATION(R)3 Controller", ControllerKind::PlayStation),
    ("057E-2009-Switch Pro Controller", ControllerKind::Nintendo),
    ("06A3-0D09-Logitech F310 Gamepad (XInput)", ControllerKind::Pc),
    ("06A3-0D0A-Logitech F510 Gamepad (XInput)", ControllerKind::Pc),
    ("06A3-0D0B-Logitech F710 Gamepad (XInput)", ControllerKind::Pc),
    (
        "0738-4716-Controller (Xbox Wireless Receiver for Windows)",
        ControllerKind::Xbox,
    ),
    ("0796-5510-DualShock 4 Wireless Controller", ControllerKind::PlayStation),
    ("0E6F-0213-PS3/PC Gamepad", ControllerKind::PlayStation),
    ("0E6F-0501-XInput Gamepad", ControllerKind::Pc),
    ("0E6F-0801-PS4 Wired Gamepad", ControllerKind::PlayStation),
    ("24C6-5503-NAAC Wired Compact Controller for PS", ControllerKind::PlayStation),
    ("2DC8-6101-Moga Pro", ControllerKind::Android),
    ("2DC8-7101-Moga Hero Power", ControllerKind::Android),
    ("2DC8-9101-Moga Power Pro", ControllerKind::Android),
    ("2DC8-F101-Moga Pro Power", ControllerKind::Android),
    ("2DC8-F301-Moga Hero Power (B) ", ControllerKind::Android),
    ("24C6-541A-Revolution Pro Controller", ControllerKind::PlayStation),
    ("146B-0601-PC Gamepad", ControllerKind::Pc),
];

/// Substring hints checked, in order, against the lowercased identifier of
/// standard-mapped devices.
const HINTS: &[(&[&str], ControllerKind)] = &[
    (&["xbox", "microsoft"], ControllerKind::Xbox),
    (
        &["playstation", "sony", "dualshock", "dualsense"],
        ControllerKind::PlayStation,
    ),
    (&["nintendo", "switch"], ControllerKind::Nintendo),
    (&["logitech"], ControllerKind::Pc),
];

/// Derives the vendor family of a device from its identifier and mapping.
pub fn detect_kind(info: &DeviceInfo) -> ControllerKind {
    if let Some((_, kind)) = KNOWN_IDS.iter().find(|(id, _)| *id == info.id) {
        return *kind;
    }
    if info.mapping != Mapping::Standard {
        return ControllerKind::Generic;
    }
    let id = info.id.to_lowercase();
    HINTS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| id.contains(n)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ControllerKind::Standard)
}
