//! Camera command type definitions

use serde::{Deserialize, Serialize};

/// Movement direction, eight-way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl MoveDirection {
    /// Fixed decoder_control command code on the Zodiak wire
    pub fn command_code(&self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Down => 2,
            Self::Left => 4,
            Self::Right => 6,
            Self::UpLeft => 90,
            Self::UpRight => 91,
            Self::DownLeft => 92,
            Self::DownRight => 93,
        }
    }
}

/// decoder_control code for stop
pub(crate) const STOP_COMMAND: u8 = 1;

/// Adjustable image setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingParam {
    Brightness,
    Contrast,
    Saturation,
    InfraRed,
}

impl SettingParam {
    /// camera_control param code
    pub fn code(&self) -> u8 {
        match self {
            Self::Brightness => 1,
            Self::Contrast => 2,
            Self::Saturation => 8,
            Self::InfraRed => 14,
        }
    }
}

/// Completion report for a fire-and-forget movement command
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub direction: MoveDirection,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutcome {
    pub(crate) fn success(direction: MoveDirection) -> Self {
        Self {
            direction,
            ok: true,
            error: None,
        }
    }

    pub(crate) fn failure(direction: MoveDirection, error: impl Into<String>) -> Self {
        Self {
            direction,
            ok: false,
            error: Some(error.into()),
        }
    }
}
