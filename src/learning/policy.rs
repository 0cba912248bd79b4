use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;

/// Exploration rate over the course of a training run.
#[enum_dispatch]
pub trait Exploration {
    /// Probability of taking a random action at the current point in training.
    fn epsilon(&self) -> f64;
    /// Advance the schedule after an episode finishes.
    fn end_episode(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantEpsilon {
    pub epsilon: f64,
}

impl Exploration for ConstantEpsilon {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn end_episode(&mut self) {}
}

/// Epsilon multiplied by `decay` after every episode, never dropping below `min_epsilon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayingEpsilon {
    pub epsilon: f64,
    pub decay: f64,
    pub min_epsilon: f64,
}

impl Exploration for DecayingEpsilon {
    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn end_episode(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.min_epsilon);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[enum_dispatch(Exploration)]
pub enum ExplorationSchedule {
    Constant(ConstantEpsilon),
    Decaying(DecayingEpsilon),
}

impl ExplorationSchedule {
    pub fn constant(epsilon: f64) -> Self {
        ConstantEpsilon { epsilon }.into()
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        match config.epsilon_decay {
            Some(decay) => DecayingEpsilon {
                epsilon: config.epsilon,
                decay,
                min_epsilon: config.min_epsilon.min(config.epsilon),
            }
            .into(),
            None => Self::constant(config.epsilon),
        }
    }
}
