//! Camera movement commands sent by frame consumers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::camera::Camera;

/// A discrete camera movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    MoveForward,
    MoveBackward,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown camera command '{0}'")]
pub struct UnknownCommand(pub String);

impl CameraCommand {
    pub const ALL: [Self; 6] = [
        Self::MoveForward,
        Self::MoveBackward,
        Self::MoveUp,
        Self::MoveDown,
        Self::MoveLeft,
        Self::MoveRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "move_forward",
            Self::MoveBackward => "move_backward",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
        }
    }

    /// Move the camera by one `step`.
    pub fn apply(self, camera: &mut Camera, step: f32) {
        match self {
            Self::MoveForward => camera.translate(camera.forward(), -step),
            Self::MoveBackward => camera.translate(camera.forward(), step),
            Self::MoveUp => camera.translate(camera.up(), step),
            Self::MoveDown => camera.translate(camera.up(), -step),
            Self::MoveRight => camera.translate(camera.right(), step),
            Self::MoveLeft => camera.translate(camera.right(), -step),
        }
    }
}

impl FromStr for CameraCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for CameraCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
