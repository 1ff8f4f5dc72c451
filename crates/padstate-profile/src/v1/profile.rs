use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProfileV1 {
    pub version: u8,
    #[serde(default)]
    pub tick_ms: Option<u64>,
    #[serde(default)]
    pub dead_zones: ProfileV1DeadZones,
    #[serde(default)]
    pub filter: Option<String>, // circular | drift
    #[serde(default)]
    pub devices: Vec<ProfileV1Device>,
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub connect_rumble: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProfileV1DeadZones {
    #[serde(default)]
    pub global: Option<f32>,
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub right: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProfileV1Device {
    #[serde(rename = "match")]
    pub pattern: String,
    #[serde(default)]
    pub dead_zones: ProfileV1DeadZones,
}
