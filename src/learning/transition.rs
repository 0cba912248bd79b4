use serde::{Deserialize, Serialize};

use crate::State;
use crate::actions::Action;

/// One step of experience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: f64,
    pub next_state: State,
}
