//! Analog dead-zone filters.

use std::f32::consts::PI;

use crate::types::AnalogPosition;

/// Rest position of an analog stick.
pub const REST: (f32, f32) = (0.0, 0.0);

/// Filters a raw stick sample through a circular dead zone.
///
/// Samples whose magnitude is below `dead_zone` are suppressed to zero. Above
/// the threshold the magnitude is rescaled so the usable range still spans
/// `0..=1`, keeping the direction of the raw sample.
pub fn apply_circular_dead_zone(x: f32, y: f32, dead_zone: f32) -> AnalogPosition {
    let magnitude = magnitude2d(x, y);
    if magnitude < dead_zone || magnitude == 0.0 || dead_zone >= 1.0 {
        return AnalogPosition::REST;
    }

    let scaled = normalize_after_dead_zone(magnitude, dead_zone);
    let sx = x / magnitude * scaled;
    let sy = y / magnitude * scaled;

    AnalogPosition {
        x: sx,
        y: sy,
        magnitude: scaled,
        angle: sy.atan2(sx),
    }
}

/// Per-axis dead zone with stick-drift compensation.
///
/// The first value seen for the axis is latched into `drift` and subtracted
/// from every later sample. A stick that is already deflected on the first
/// sample gets that deflection learned as its center.
pub fn apply_dead_zone(value: f32, drift: &mut Option<f32>, dead_zone: f32) -> f32 {
    let bias = *drift.get_or_insert(value);
    let compensated = value - bias;
    if compensated.abs() < dead_zone || dead_zone >= 1.0 {
        return 0.0;
    }
    let scaled = (compensated.abs() - dead_zone) / (1.0 - dead_zone);
    (compensated.signum() * scaled).clamp(-1.0, 1.0)
}

/// Drift bias latched per axis of one stick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriftLatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

/// Filters a stick sample axis by axis with drift compensation.
pub fn apply_drift_dead_zone(
    x: f32,
    y: f32,
    latch: &mut DriftLatch,
    dead_zone: f32,
) -> AnalogPosition {
    let fx = apply_dead_zone(x, &mut latch.x, dead_zone);
    let fy = apply_dead_zone(y, &mut latch.y, dead_zone);
    let magnitude = magnitude2d(fx, fy).min(1.0);
    if magnitude == 0.0 {
        return AnalogPosition::REST;
    }
    AnalogPosition {
        x: fx,
        y: fy,
        magnitude,
        angle: fy.atan2(fx),
    }
}

/// Angle of a stick position as seen from the rest position.
///
/// Consumers rotate indicators with this value, so the sign convention and
/// the `-π` offset must stay as they are.
#[inline]
pub fn angle_from_rest(x: f32, y: f32) -> f32 {
    let dy = REST.1 - y;
    let dx = REST.0 - x;
    -dy.atan2(dx) - PI
}

#[inline]
pub(crate) fn magnitude2d(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

#[inline]
pub(crate) fn normalize_after_dead_zone(magnitude: f32, dead_zone: f32) -> f32 {
    if magnitude <= dead_zone {
        0.0
    } else {
        ((magnitude - dead_zone) / (1.0 - dead_zone)).clamp(0.0, 1.0)
    }
}
