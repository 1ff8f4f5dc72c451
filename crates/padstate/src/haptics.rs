use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Waveform family requested from the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VibrationKind {
    /// Two motors driven with independent weak/strong magnitudes.
    #[default]
    DualRumble,
    /// Single actuator; the strong magnitude is used.
    Vibration,
}

impl VibrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VibrationKind::DualRumble => "dual-rumble",
            VibrationKind::Vibration => "vibration",
        }
    }
}

impl fmt::Display for VibrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vibration request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibrationEffect {
    pub kind: VibrationKind,
    pub start_delay: Duration,
    pub duration: Duration,
    /// High frequency motor, in `[0.0, 1.0]`.
    pub weak_magnitude: f32,
    /// Low frequency motor, in `[0.0, 1.0]`.
    pub strong_magnitude: f32,
}

impl VibrationEffect {
    pub fn dual_rumble(duration: Duration, weak: f32, strong: f32) -> Self {
        Self {
            kind: VibrationKind::DualRumble,
            start_delay: Duration::ZERO,
            duration,
            weak_magnitude: weak,
            strong_magnitude: strong,
        }
    }

    /// Returns the effect with magnitudes clamped into range, rejecting a
    /// zero duration.
    pub fn normalized(self) -> Result<Self> {
        if self.duration.is_zero() {
            return Err(Error::InvalidDuration);
        }
        Ok(Self {
            weak_magnitude: clamp_magnitude(self.weak_magnitude),
            strong_magnitude: clamp_magnitude(self.strong_magnitude),
            ..self
        })
    }

    /// Time after which the effect is finished.
    pub fn total(&self) -> Duration {
        self.start_delay + self.duration
    }
}

fn clamp_magnitude(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Built-in vibration patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VibrationPreset {
    LightTap,
    MediumRumble,
    HeavyShake,
    Notification,
    Damage,
}

impl VibrationPreset {
    pub const ALL: [VibrationPreset; 5] = [
        VibrationPreset::LightTap,
        VibrationPreset::MediumRumble,
        VibrationPreset::HeavyShake,
        VibrationPreset::Notification,
        VibrationPreset::Damage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VibrationPreset::LightTap => "light-tap",
            VibrationPreset::MediumRumble => "medium-rumble",
            VibrationPreset::HeavyShake => "heavy-shake",
            VibrationPreset::Notification => "notification",
            VibrationPreset::Damage => "damage",
        }
    }

    pub fn effect(&self) -> VibrationEffect {
        let (ms, weak, strong) = match self {
            VibrationPreset::LightTap => (50, 0.3, 0.3),
            VibrationPreset::MediumRumble => (200, 0.6, 0.6),
            VibrationPreset::HeavyShake => (400, 1.0, 1.0),
            VibrationPreset::Notification => (100, 0.5, 0.2),
            VibrationPreset::Damage => (150, 0.8, 1.0),
        };
        VibrationEffect::dual_rumble(Duration::from_millis(ms), weak, strong)
    }
}

impl fmt::Display for VibrationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VibrationPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        VibrationPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

/// Device-side haptic actuator.
///
/// Effects are fire-and-forget. A new effect overrides the one playing.
pub trait HapticActuator: Send + Sync {
    fn play_effect(&self, effect: &VibrationEffect) -> Result<()>;
    fn reset(&self) -> Result<()>;
}
