use crate::error::{Error, Result};
use crate::types::Stick;

/// Filter applied to raw stick samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StickFilter {
    /// Radial dead zone on the (x, y) vector.
    #[default]
    Circular,
    /// Per-axis dead zone with first-sample drift compensation.
    DriftCompensated,
}

/// Per-controller tuning, applied at connect time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Threshold for analog inputs without a stick-specific value.
    pub dead_zone: f32,
    pub left_dead_zone: f32,
    pub right_dead_zone: f32,
    pub filter: StickFilter,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            left_dead_zone: 0.1,
            right_dead_zone: 0.1,
            filter: StickFilter::Circular,
        }
    }
}

impl ControllerSettings {
    pub fn dead_zone_for(&self, stick: Stick) -> f32 {
        match stick {
            Stick::Left => self.left_dead_zone,
            Stick::Right => self.right_dead_zone,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dead_zone(self.dead_zone)?;
        check_dead_zone(self.left_dead_zone)?;
        check_dead_zone(self.right_dead_zone)?;
        Ok(())
    }
}

/// Rejects thresholds outside `[0.0, 1.0]`, including NaN.
pub fn check_dead_zone(value: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::DeadZoneOutOfRange(value))
    }
}
