use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::State;
use crate::actions::Action;
use crate::config::AgentConfig;
use crate::error::{Error, Result};
use crate::learning::policy::{Exploration, ExplorationSchedule};
use crate::learning::q_table::QTable;
use crate::learning::transition::Transition;

/// Tabular Q-learning agent with an epsilon-greedy policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningAgent {
    actions: Vec<Action>,
    alpha: f64,
    gamma: f64,
    exploration: ExplorationSchedule,
    q_table: QTable,
}

impl QLearningAgent {
    pub fn new(
        state_space_size: usize,
        actions: Vec<Action>,
        alpha: f64,
        gamma: f64,
        epsilon: f64,
    ) -> Result<Self> {
        Self::from_config(&AgentConfig {
            state_space_size,
            actions,
            alpha,
            gamma,
            epsilon,
            ..AgentConfig::default()
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(QLearningAgent {
            actions: config.actions.clone(),
            alpha: config.alpha,
            gamma: config.gamma,
            exploration: ExplorationSchedule::from_config(config),
            q_table: QTable::new(config.state_space_size, config.actions.len()),
        })
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Column of `action` in the value table.
    pub fn action_index(&self, action: Action) -> Result<usize> {
        self.actions
            .iter()
            .position(|a| *a == action)
            .ok_or(Error::UnknownAction(action))
    }

    /// Value estimate for taking `action` in `state`.
    pub fn value(&self, state: State, action: Action) -> Result<f64> {
        self.q_table.get(state, self.action_index(action)?)
    }

    /// Epsilon-greedy choice: a uniformly random action with probability epsilon,
    /// otherwise the greedy action.
    pub fn choose_action<R: Rng + ?Sized>(&self, state: State, rng: &mut R) -> Result<Action> {
        self.q_table.check_state(state)?;
        if rng.random::<f64>() < self.epsilon() {
            let action = self.actions[rng.random_range(0..self.actions.len())];
            trace!("state {state}: exploring with {action}");
            return Ok(action);
        }
        self.greedy_action(state)
    }

    /// Best known action for `state`, the lowest-indexed one among ties.
    pub fn greedy_action(&self, state: State) -> Result<Action> {
        Ok(self.actions[self.q_table.argmax(state)?])
    }

    /// One-step Q-learning update of the value for `(state, action)`. Returns the TD error.
    pub fn update(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: State,
    ) -> Result<f64> {
        let action_idx = self.action_index(action)?;
        let current = self.q_table.get(state, action_idx)?;
        let best_next = self.q_table.max_value(next_state)?;
        let td_target = reward + self.gamma * best_next;
        let td_error = td_target - current;
        self.q_table
            .set(state, action_idx, current + self.alpha * td_error)?;
        Ok(td_error)
    }

    pub fn observe(&mut self, transition: &Transition) -> Result<f64> {
        self.update(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
        )
    }

    pub fn end_episode(&mut self) {
        self.exploration.end_episode();
    }

    #[cfg(test)]
    pub(crate) fn seed_value(&mut self, state: State, action: Action, value: f64) {
        let idx = self.action_index(action).unwrap();
        self.q_table.set(state, idx, value).unwrap();
    }
}
