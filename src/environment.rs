use rand::Rng;
use serde::Serialize;

use crate::actions::Action;
use crate::config::EnvironmentConfig;
use crate::error::Result;
use crate::{Int, State};

/// Something the agent can act on one step at a time.
pub trait Environment {
    /// Return to the initial state and report it.
    fn reset(&mut self) -> State;
    /// Apply the action, returning the next state and the reward earned.
    fn step<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> (State, f64);
    fn state(&self) -> State;
}

/// Single-intersection traffic model. The state is the number of queued vehicles.
///
/// Arrivals are independent of the chosen action, so `Go` earns reward in
/// proportion to congestion but does not reduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficEnvironment {
    state: State,
    max_state: State,
    arrival_min: Int,
    arrival_max: Int,
}

impl Default for TrafficEnvironment {
    fn default() -> Self {
        TrafficEnvironment::from_checked(&EnvironmentConfig::default())
    }
}

impl TrafficEnvironment {
    pub fn new(config: &EnvironmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(TrafficEnvironment::from_checked(config))
    }

    fn from_checked(config: &EnvironmentConfig) -> Self {
        TrafficEnvironment {
            state: 0,
            max_state: config.max_state,
            arrival_min: config.arrival_min,
            arrival_max: config.arrival_max,
        }
    }

    pub fn max_state(&self) -> State {
        self.max_state
    }

    /// Reward for taking `action` while `state` vehicles are waiting.
    pub fn reward(&self, state: State, action: Action) -> f64 {
        if self.max_state == 0 {
            return 0.0;
        }
        action.value() * (state as f64 / self.max_state as f64)
    }

    /// Apply a net arrival to `state`, keeping the result within `[0, max_state]`.
    pub fn transition(&self, state: State, arrivals: Int) -> State {
        let next = state as i64 + i64::from(arrivals);
        next.clamp(0, self.max_state as i64) as State
    }
}

impl Environment for TrafficEnvironment {
    fn reset(&mut self) -> State {
        self.state = 0;
        self.state
    }

    fn step<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> (State, f64) {
        let reward = self.reward(self.state, action);
        let arrivals = rng.random_range(self.arrival_min..=self.arrival_max);
        self.state = self.transition(self.state, arrivals);
        (self.state, reward)
    }

    fn state(&self) -> State {
        self.state
    }
}
