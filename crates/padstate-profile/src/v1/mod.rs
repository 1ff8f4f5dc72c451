mod parse;
mod profile;

use thiserror::Error;

pub(crate) use profile::ProfileV1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid dead zone for {0}: {1}")]
    InvalidDeadZone(String, padstate::Error),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("invalid vibration preset: {0}")]
    InvalidPreset(String),
    #[error("invalid device pattern: {0:?}")]
    InvalidPattern(String),
    #[error("tick_ms must be greater than zero")]
    ZeroTick,
}
