use std::path::{Path, PathBuf};
use std::time::Duration;

use padstate::{ControllerSettings, DeviceInfo, EventKind, VibrationPreset};

use crate::{parse_profile, ProfileError};

/// Poll interval used when the profile does not set one.
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

/// Event kinds printed when the profile does not list any.
pub const DEFAULT_EVENTS: [EventKind; 4] = [
    EventKind::ButtonDown,
    EventKind::ButtonUp,
    EventKind::Grab,
    EventKind::Drop,
];

/// Dead zone overrides for devices whose identifier contains `pattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOverride {
    /// Lowercased identifier substring.
    pub pattern: String,
    pub dead_zone: Option<f32>,
    pub left_dead_zone: Option<f32>,
    pub right_dead_zone: Option<f32>,
}

impl DeviceOverride {
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        info.id.to_lowercase().contains(&self.pattern)
    }

    fn apply(&self, settings: &mut ControllerSettings) {
        if let Some(value) = self.dead_zone {
            settings.dead_zone = value;
        }
        if let Some(value) = self.left_dead_zone {
            settings.left_dead_zone = value;
        }
        if let Some(value) = self.right_dead_zone {
            settings.right_dead_zone = value;
        }
    }
}

/// Parsed and validated daemon profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub tick: Duration,
    /// Defaults applied to every controller.
    pub settings: ControllerSettings,
    /// Applied in order on top of the defaults.
    pub devices: Vec<DeviceOverride>,
    pub events: Vec<EventKind>,
    pub connect_rumble: Option<VibrationPreset>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            settings: ControllerSettings::default(),
            devices: Vec::new(),
            events: DEFAULT_EVENTS.to_vec(),
            connect_rumble: None,
        }
    }
}

impl Profile {
    /// Settings for a newly connected device.
    pub fn settings_for(&self, info: &DeviceInfo) -> ControllerSettings {
        let mut settings = self.settings;
        for device in self.devices.iter().filter(|d| d.matches(info)) {
            device.apply(&mut settings);
        }
        settings
    }

    pub fn prints(&self, kind: EventKind) -> bool {
        self.events.contains(&kind)
    }

    /// Loads the profile at `path`, or at [`Profile::default_path`].
    ///
    /// A missing default profile yields the built-in defaults. A missing
    /// explicit profile is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ProfileError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };
        if !path.exists() {
            if explicit {
                return Err(ProfileError::ProfileNotFound(path.display().to_string()));
            }
            log::debug!("No profile at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let input = std::fs::read_to_string(&path)?;
        parse_profile(&input)
    }

    pub fn default_path() -> Result<PathBuf, ProfileError> {
        let home = std::env::var("HOME")
            .map_err(|_| ProfileError::EnvVarNotSet("HOME".to_string()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("padstate")
            .join("profile.yaml"))
    }
}
