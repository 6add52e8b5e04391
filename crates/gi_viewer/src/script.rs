//! Scripted camera commands.
//!
//! A command script is a text file with one `<frame> <command>` pair per
//! line; `#` starts a comment. The command runs before the given (1-based)
//! frame is rendered:
//!
//! ```text
//! # dolly in for three frames, then rise
//! 2 move_forward
//! 3 move_forward
//! 4 move_forward
//! 5 move_up
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use gi_renderer::{CameraCommand, UnknownCommand};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected '<frame> <command>'")]
    Malformed { line: usize },

    #[error("line {line}: invalid frame number '{value}'")]
    InvalidFrame { line: usize, value: String },

    #[error("line {line}: {source}")]
    UnknownCommand {
        line: usize,
        #[source]
        source: UnknownCommand,
    },
}

/// Commands keyed by the frame they precede.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandScript {
    commands: BTreeMap<u64, Vec<CameraCommand>>,
}

impl CommandScript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let mut script = Self::default();

        for (i, raw) in content.lines().enumerate() {
            let line = i + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let (frame, command) = text.split_once(char::is_whitespace).ok_or(ScriptError::Malformed { line })?;
            let frame: u64 = frame.parse().map_err(|_| ScriptError::InvalidFrame {
                line,
                value: frame.to_string(),
            })?;
            let command: CameraCommand = command
                .parse()
                .map_err(|source| ScriptError::UnknownCommand { line, source })?;

            script.commands.entry(frame).or_default().push(command);
        }

        Ok(script)
    }

    /// Remove and return the commands scheduled before `frame`.
    pub fn take(&mut self, frame: u64) -> Vec<CameraCommand> {
        self.commands.remove(&frame).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
