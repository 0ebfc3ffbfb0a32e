//! The command surface accepted between steps: pause/resume,
//! reset, the fast-forward toggle, and the two injection commands. All
//! six are understood by the tank world; [`CommandError`] exists for
//! interface parity with worlds (e.g. the soccer backend behind the same
//! interface) that don't support a given command.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    Reset,
    FastForward { enabled: bool },
    AddFood,
    SpawnFish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    NotSupported { command: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotSupported { command } => {
                write!(f, "command '{command}' is not supported by this world")
            }
        }
    }
}

impl std::error::Error for CommandError {}
