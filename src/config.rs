use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::{Error, Result};
use crate::{Int, State, UInt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub environment: EnvironmentConfig,
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Largest vehicle count the environment can hold.
    pub max_state: State,
    /// Inclusive bounds of the net arrivals drawn each step.
    pub arrival_min: Int,
    pub arrival_max: Int,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig {
            max_state: 100,
            arrival_min: -5,
            arrival_max: 10,
        }
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.arrival_min > self.arrival_max {
            return Err(Error::InvalidConfiguration(format!(
                "arrival range is empty: [{}, {}]",
                self.arrival_min, self.arrival_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub state_space_size: usize,
    pub actions: Vec<Action>,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    /// Multiplicative factor applied to epsilon after each episode. Constant epsilon when unset.
    pub epsilon_decay: Option<f64>,
    pub min_epsilon: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            state_space_size: 500,
            actions: vec![Action::Stop, Action::Go],
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.9,
            epsilon_decay: None,
            min_epsilon: 0.0,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.state_space_size == 0 {
            return Err(Error::InvalidConfiguration(
                "state_space_size must be positive".to_string(),
            ));
        }
        if self.actions.is_empty() {
            return Err(Error::InvalidConfiguration(
                "actions must not be empty".to_string(),
            ));
        }
        if !self.actions.iter().all_unique() {
            return Err(Error::InvalidConfiguration(format!(
                "actions must be distinct, got {:?}",
                self.actions
            )));
        }
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
            ("min_epsilon", self.min_epsilon),
        ] {
            check_unit_interval(name, value)?;
        }
        if let Some(decay) = self.epsilon_decay {
            if !(decay > 0.0 && decay <= 1.0) {
                return Err(Error::InvalidConfiguration(format!(
                    "epsilon_decay must be in (0, 1], got {decay}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: UInt,
    pub max_steps_per_episode: UInt,
    /// Seed for the run's random source. Drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 10,
            max_steps_per_episode: 100,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration(
                "episodes must be positive".to_string(),
            ));
        }
        if self.max_steps_per_episode == 0 {
            return Err(Error::InvalidConfiguration(
                "max_steps_per_episode must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.environment.validate()?;
        self.agent.validate()?;
        self.training.validate()?;
        // Every reachable environment state must index the value table.
        if self.environment.max_state >= self.agent.state_space_size {
            return Err(Error::InvalidConfiguration(format!(
                "max_state {} does not fit a value table of {} states",
                self.environment.max_state, self.agent.state_space_size
            )));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}
