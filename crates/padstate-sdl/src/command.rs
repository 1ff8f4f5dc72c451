use std::time::Instant;

use crossbeam_channel::Sender;
use padstate::{Error, HapticActuator, Result, VibrationEffect, VibrationKind};

/// Internal commands sent from actuators to the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    Rumble {
        instance: u32,
        low: u16,
        high: u16,
        ms: u32,
        start_at: Instant,
    },
    StopRumble {
        instance: u32,
    },
}

impl Command {
    pub(crate) fn instance(&self) -> u32 {
        match self {
            Command::Rumble { instance, .. } | Command::StopRumble { instance } => *instance,
        }
    }

    pub(crate) fn is_due(&self, now: Instant) -> bool {
        match self {
            Command::Rumble { start_at, .. } => *start_at <= now,
            Command::StopRumble { .. } => true,
        }
    }
}

/// Rumble actuator of one SDL game controller.
///
/// Commands are queued and executed by [`crate::SdlSource`] on its own
/// thread, so the actuator can be used from any thread.
#[derive(Debug, Clone)]
pub struct SdlRumble {
    instance: u32,
    cmd_tx: Sender<Command>,
}

impl SdlRumble {
    pub(crate) fn new(instance: u32, cmd_tx: Sender<Command>) -> Self {
        Self { instance, cmd_tx }
    }
}

impl HapticActuator for SdlRumble {
    fn play_effect(&self, effect: &VibrationEffect) -> Result<()> {
        let (low, high) = match effect.kind {
            VibrationKind::DualRumble => (effect.strong_magnitude, effect.weak_magnitude),
            VibrationKind::Vibration => (effect.strong_magnitude, effect.strong_magnitude),
        };
        let ms = effect.duration.as_millis().min(u32::MAX as u128) as u32;
        self.cmd_tx
            .send(Command::Rumble {
                instance: self.instance,
                low: motor_speed(low),
                high: motor_speed(high),
                ms,
                start_at: Instant::now() + effect.start_delay,
            })
            .map_err(|e| Error::Backend(format!("{e}")))
    }

    fn reset(&self) -> Result<()> {
        self.cmd_tx
            .send(Command::StopRumble {
                instance: self.instance,
            })
            .map_err(|e| Error::Backend(format!("{e}")))
    }
}

fn motor_speed(magnitude: f32) -> u16 {
    (magnitude.clamp(0.0, 1.0) * 65535.0).round() as u16
}
