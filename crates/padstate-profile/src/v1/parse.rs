use std::time::Duration;

use padstate::{check_dead_zone, ControllerSettings, EventKind, StickFilter, VibrationPreset};

use crate::profile::{DeviceOverride, Profile, DEFAULT_EVENTS, DEFAULT_TICK};

use super::profile::{ProfileV1, ProfileV1DeadZones};
use super::Error;

impl ProfileV1 {
    pub(crate) fn parse(&self) -> Result<Profile, Error> {
        let tick = match self.tick_ms {
            Some(0) => return Err(Error::ZeroTick),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TICK,
        };

        let mut settings = ControllerSettings::default();
        apply_dead_zones(&self.dead_zones, &mut settings, "defaults")?;
        if let Some(filter) = &self.filter {
            settings.filter = parse_filter(filter)?;
        }

        let devices = self
            .devices
            .iter()
            .map(|device| {
                let pattern = device.pattern.trim().to_lowercase();
                if pattern.is_empty() {
                    return Err(Error::InvalidPattern(device.pattern.clone()));
                }
                let zones = &device.dead_zones;
                Ok(DeviceOverride {
                    dead_zone: zones
                        .global
                        .map(|v| validate(v, &pattern))
                        .transpose()?,
                    left_dead_zone: zones
                        .left
                        .map(|v| validate(v, &pattern))
                        .transpose()?,
                    right_dead_zone: zones
                        .right
                        .map(|v| validate(v, &pattern))
                        .transpose()?,
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let events = match &self.events {
            Some(names) => names
                .iter()
                .map(|name| {
                    name.parse::<EventKind>()
                        .map_err(|_| Error::InvalidEvent(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_EVENTS.to_vec(),
        };

        let connect_rumble = self
            .connect_rumble
            .as_deref()
            .map(|name| {
                name.parse::<VibrationPreset>()
                    .map_err(|_| Error::InvalidPreset(name.to_string()))
            })
            .transpose()?;

        Ok(Profile {
            tick,
            settings,
            devices,
            events,
            connect_rumble,
        })
    }
}

fn validate(value: f32, owner: &str) -> Result<f32, Error> {
    check_dead_zone(value).map_err(|e| Error::InvalidDeadZone(owner.to_string(), e))
}

fn apply_dead_zones(
    raw: &ProfileV1DeadZones,
    settings: &mut ControllerSettings,
    owner: &str,
) -> Result<(), Error> {
    if let Some(value) = raw.global {
        settings.dead_zone = validate(value, owner)?;
    }
    if let Some(value) = raw.left {
        settings.left_dead_zone = validate(value, owner)?;
    }
    if let Some(value) = raw.right {
        settings.right_dead_zone = validate(value, owner)?;
    }
    Ok(())
}

fn parse_filter(name: &str) -> Result<StickFilter, Error> {
    Ok(match name.trim().to_lowercase().as_str() {
        "circular" => StickFilter::Circular,
        "drift" | "drift_compensated" => StickFilter::DriftCompensated,
        _ => return Err(Error::InvalidFilter(name.to_string())),
    })
}
