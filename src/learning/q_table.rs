use serde::{Deserialize, Serialize};

use crate::State;
use crate::error::{Error, Result};

/// Dense table of action values, one row per state.
///
/// Stored as a flat arena indexed by `state * num_actions + action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    num_states: usize,
    num_actions: usize,
    values: Vec<f64>,
}

impl QTable {
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        QTable {
            num_states,
            num_actions,
            values: vec![0.0; num_states * num_actions],
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn check_state(&self, state: State) -> Result<()> {
        if state < self.num_states {
            Ok(())
        } else {
            Err(Error::OutOfRangeState {
                state,
                size: self.num_states,
            })
        }
    }

    fn index(&self, state: State, action_idx: usize) -> usize {
        state * self.num_actions + action_idx
    }

    pub fn row(&self, state: State) -> Result<&[f64]> {
        self.check_state(state)?;
        let start = state * self.num_actions;
        Ok(&self.values[start..start + self.num_actions])
    }

    fn check_action(&self, action_idx: usize) -> Result<()> {
        if action_idx < self.num_actions {
            Ok(())
        } else {
            Err(Error::OutOfRangeAction {
                index: action_idx,
                size: self.num_actions,
            })
        }
    }

    pub fn get(&self, state: State, action_idx: usize) -> Result<f64> {
        self.check_action(action_idx)?;
        Ok(self.row(state)?[action_idx])
    }

    pub(crate) fn set(&mut self, state: State, action_idx: usize, value: f64) -> Result<()> {
        self.check_state(state)?;
        self.check_action(action_idx)?;
        let idx = self.index(state, action_idx);
        self.values[idx] = value;
        Ok(())
    }

    /// Largest value in the row for `state`.
    pub fn max_value(&self, state: State) -> Result<f64> {
        Ok(self
            .row(state)?
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Column of the largest value in the row for `state`. Ties go to the lowest column.
    pub fn argmax(&self, state: State) -> Result<usize> {
        let row = self.row(state)?;
        let mut best = 0;
        for (idx, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = idx;
            }
        }
        Ok(best)
    }
}
