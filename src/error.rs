use thiserror::Error;

use crate::State;
use crate::actions::Action;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("State {state} is outside the value table (size {size})")]
    OutOfRangeState { state: State, size: usize },

    #[error("Action column {index} is outside the value table (width {size})")]
    OutOfRangeAction { index: usize, size: usize },

    #[error("Action {0} is not in the agent's action set")]
    UnknownAction(Action),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
