use std::path::Path;

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::error::Result;
use crate::learning::q_table::QTable;

/// Artifacts of a training run: the reward curve and the learned values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episode_rewards: Vec<f64>,
    pub final_epsilon: f64,
    /// Greedy action per state.
    pub policy: Vec<Action>,
    pub q_table: QTable,
}

impl TrainingReport {
    pub fn mean_reward(&self) -> Option<f64> {
        if self.episode_rewards.is_empty() {
            return None;
        }
        Some(self.episode_rewards.iter().sum::<f64>() / self.episode_rewards.len() as f64)
    }

    /// Zero-based index and total reward of the best episode. Earliest wins ties.
    pub fn best_episode(&self) -> Option<(usize, f64)> {
        self.episode_rewards
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (idx, reward)| match best {
                Some((_, r)) if r >= reward => best,
                _ => Some((idx, reward)),
            })
    }

    pub fn reward_range(&self) -> Option<(f64, f64)> {
        match self
            .episode_rewards
            .iter()
            .copied()
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(r) => Some((r, r)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }

    /// Mean reward over each run of `window` consecutive episodes.
    pub fn moving_average(&self, window: usize) -> Vec<f64> {
        if window == 0 {
            return vec![];
        }
        self.episode_rewards
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .collect()
    }

    /// Number of states whose greedy action is `action`.
    pub fn policy_count(&self, action: Action) -> usize {
        self.policy.iter().filter(|a| **a == action).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(rewards: Vec<f64>) -> TrainingReport {
        TrainingReport {
            episode_rewards: rewards,
            final_epsilon: 0.9,
            policy: vec![Action::Stop, Action::Go, Action::Go],
            q_table: QTable::new(3, 2),
        }
    }

    #[test]
    fn test_summary_stats() {
        let r = report(vec![1.0, 4.0, 2.0, 4.0]);
        assert_eq!(r.mean_reward(), Some(2.75));
        assert_eq!(r.best_episode(), Some((1, 4.0)));
        assert_eq!(r.reward_range(), Some((1.0, 4.0)));
        assert_eq!(r.moving_average(2), vec![2.5, 3.0, 3.0]);
        assert_eq!(r.policy_count(Action::Go), 2);
    }

    #[test]
    fn test_empty_report() {
        let r = report(vec![]);
        assert_eq!(r.mean_reward(), None);
        assert_eq!(r.best_episode(), None);
        assert_eq!(r.reward_range(), None);
        assert!(r.moving_average(3).is_empty());
    }

    #[test]
    fn test_json_export() {
        let r = report(vec![1.5]);
        let json = r.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["episode_rewards"][0], 1.5);
        assert_eq!(value["policy"][1], "Go");
        assert_eq!(value["q_table"]["num_actions"], 2);
        let back: TrainingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
