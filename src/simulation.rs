use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::actions::Action;
use crate::config::{Config, TrainingConfig};
use crate::environment::{Environment, TrafficEnvironment};
use crate::error::Result;
use crate::learning::agent::QLearningAgent;
use crate::learning::transition::Transition;
use crate::report::TrainingReport;
use crate::UInt;

/// Outcome of a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub index: UInt,
    pub total_reward: f64,
    pub transitions: Vec<Transition>,
}

/// Drives the agent through repeated episodes of the environment.
#[derive(Debug)]
pub struct Simulation<E: Environment = TrafficEnvironment> {
    pub env: E,
    pub agent: QLearningAgent,
    pub config: TrainingConfig,
    pub episode: UInt,
    rng: StdRng,
}

impl Simulation<TrafficEnvironment> {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Simulation::with_environment(
            TrafficEnvironment::new(&config.environment)?,
            QLearningAgent::from_config(&config.agent)?,
            config.training.clone(),
        )
    }
}

impl<E: Environment> Simulation<E> {
    pub fn with_environment(env: E, agent: QLearningAgent, config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Simulation {
            env,
            agent,
            config,
            episode: 0,
            rng,
        })
    }

    /// Reset the environment and run one episode of `max_steps_per_episode` steps,
    /// returning its total reward.
    pub fn run_episode(&mut self) -> Result<f64> {
        self.play_episode(None)
    }

    /// Like `run_episode`, but also keeps every transition of the episode.
    pub fn run_episode_recorded(&mut self) -> Result<EpisodeRecord> {
        let mut transitions = Vec::new();
        let total_reward = self.play_episode(Some(&mut transitions))?;
        Ok(EpisodeRecord {
            index: self.episode,
            total_reward,
            transitions,
        })
    }

    fn play_episode(&mut self, mut record: Option<&mut Vec<Transition>>) -> Result<f64> {
        let mut state = self.env.reset();
        let mut total_reward = 0.0;
        for step in 0..self.config.max_steps_per_episode {
            let action = self.agent.choose_action(state, &mut self.rng)?;
            let (next_state, reward) = self.env.step(action, &mut self.rng);
            let transition = Transition {
                state,
                action,
                reward,
                next_state,
            };
            let td_error = self.agent.observe(&transition)?;
            debug!(
                "Episode: {:4} | Step: {:4} | State: {:4} | Action: {} | Reward: {:.3} | TD error: {:.3}",
                self.episode + 1,
                step,
                state,
                action,
                reward,
                td_error
            );
            total_reward += reward;
            if let Some(transitions) = record.as_deref_mut() {
                transitions.push(transition);
            }
            state = next_state;
        }
        self.agent.end_episode();
        self.episode += 1;
        Ok(total_reward)
    }

    /// Run the configured number of episodes and report the per-episode rewards.
    pub fn run(&mut self) -> Result<TrainingReport> {
        info!("Starting training for {} episodes", self.config.episodes);
        let mut episode_rewards = Vec::new();
        for _ in 0..self.config.episodes {
            let total_reward = self.run_episode()?;
            info!(
                "Episode: {}/{} | Total Reward: {:.2} | Epsilon: {:.3}",
                self.episode,
                self.config.episodes,
                total_reward,
                self.agent.epsilon()
            );
            episode_rewards.push(total_reward);
        }
        info!("Training finished");
        Ok(TrainingReport {
            episode_rewards,
            final_epsilon: self.agent.epsilon(),
            policy: self.policy()?,
            q_table: self.agent.q_table().clone(),
        })
    }

    /// Greedy action for every state in the value table.
    pub fn policy(&self) -> Result<Vec<Action>> {
        (0..self.agent.q_table().num_states())
            .map(|state| self.agent.greedy_action(state))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;
    use crate::config::{AgentConfig, EnvironmentConfig};
    use crate::error::Error;
    use rand::Rng;

    /// Counts calls into the wrapped environment.
    struct CountingEnv {
        inner: TrafficEnvironment,
        resets: usize,
        steps: usize,
    }

    impl Environment for CountingEnv {
        fn reset(&mut self) -> State {
            self.resets += 1;
            self.inner.reset()
        }

        fn step<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> (State, f64) {
            self.steps += 1;
            self.inner.step(action, rng)
        }

        fn state(&self) -> State {
            self.inner.state()
        }
    }

    fn config(seed: u64) -> Config {
        Config {
            training: TrainingConfig {
                episodes: 5,
                max_steps_per_episode: 100,
                seed: Some(seed),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_simulation_initialization() {
        let sim = Simulation::new(&config(0)).unwrap();
        assert_eq!(sim.episode, 0);
        assert_eq!(sim.env.state(), 0);
        assert_eq!(sim.agent.q_table().num_states(), 500);
    }

    #[test]
    fn test_episode_and_step_counts() {
        let config = config(1);
        let env = CountingEnv {
            inner: TrafficEnvironment::new(&config.environment).unwrap(),
            resets: 0,
            steps: 0,
        };
        let agent = QLearningAgent::from_config(&config.agent).unwrap();
        let mut sim = Simulation::with_environment(env, agent, config.training).unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.episode_rewards.len(), 5);
        assert_eq!(sim.env.steps, 500);
        assert_eq!(sim.env.resets, 5);
        assert_eq!(sim.episode, 5);
    }

    #[test]
    fn test_episode_record_is_consistent() {
        let mut sim = Simulation::new(&config(2)).unwrap();
        let record = sim.run_episode_recorded().unwrap();
        assert_eq!(record.index, 1);
        assert_eq!(record.transitions.len(), 100);
        assert_eq!(record.transitions[0].state, 0);
        for pair in record.transitions.windows(2) {
            assert_eq!(pair[0].next_state, pair[1].state);
        }
        let sum: f64 = record.transitions.iter().map(|t| t.reward).sum();
        assert!((sum - record.total_reward).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = Simulation::new(&config(42)).unwrap().run().unwrap();
        let b = Simulation::new(&config(42)).unwrap().run().unwrap();
        assert_eq!(a.episode_rewards, b.episode_rewards);
        assert_eq!(a.q_table, b.q_table);
    }

    #[test]
    fn test_state_beyond_table_is_propagated() {
        let env = TrafficEnvironment::new(&EnvironmentConfig {
            max_state: 50,
            arrival_min: 10,
            arrival_max: 10,
        })
        .unwrap();
        let agent = QLearningAgent::from_config(&AgentConfig {
            state_space_size: 20,
            ..AgentConfig::default()
        })
        .unwrap();
        let training = TrainingConfig {
            episodes: 1,
            max_steps_per_episode: 10,
            seed: Some(0),
        };
        let mut sim = Simulation::with_environment(env, agent, training).unwrap();
        assert!(matches!(
            sim.run(),
            Err(Error::OutOfRangeState { state: 20, size: 20 })
        ));
    }

    #[test]
    fn test_huge_step_budget_is_not_preallocated() {
        // The queue outgrows the table on the second step, well before the budget runs out.
        let env_config = EnvironmentConfig {
            max_state: 50,
            arrival_min: 10,
            arrival_max: 10,
        };
        let agent_config = AgentConfig {
            state_space_size: 20,
            ..AgentConfig::default()
        };
        let training = TrainingConfig {
            episodes: UInt::MAX,
            max_steps_per_episode: UInt::MAX,
            seed: Some(0),
        };
        let mut sim = Simulation::with_environment(
            TrafficEnvironment::new(&env_config).unwrap(),
            QLearningAgent::from_config(&agent_config).unwrap(),
            training.clone(),
        )
        .unwrap();
        assert!(matches!(sim.run(), Err(Error::OutOfRangeState { .. })));

        let mut sim = Simulation::with_environment(
            TrafficEnvironment::new(&env_config).unwrap(),
            QLearningAgent::from_config(&agent_config).unwrap(),
            training,
        )
        .unwrap();
        assert!(matches!(
            sim.run_episode_recorded(),
            Err(Error::OutOfRangeState { .. })
        ));
    }

    #[test]
    fn test_run_episode_matches_recorded_total() {
        let mut a = Simulation::new(&config(5)).unwrap();
        let mut b = Simulation::new(&config(5)).unwrap();
        let total = a.run_episode().unwrap();
        let record = b.run_episode_recorded().unwrap();
        assert_eq!(total, record.total_reward);
        assert_eq!(a.episode, 1);
    }

    #[test]
    fn test_rejects_zero_episodes() {
        let mut config = config(0);
        config.training.episodes = 0;
        assert!(matches!(
            Simulation::new(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_learns_go_under_congestion() {
        let mut config = config(7);
        config.training.episodes = 200;
        // Myopic agent: the value of Stop stays at zero, the value of Go tracks the reward.
        config.agent.gamma = 0.0;
        let mut sim = Simulation::new(&config).unwrap();
        let report = sim.run().unwrap();
        // Once the queue has built up, Go is worth more than Stop.
        let congested = sim.agent.q_table().row(60).unwrap().to_vec();
        assert!(congested[1] > congested[0], "{congested:?}");
        assert_eq!(report.policy[60], Action::Go);
    }
}
