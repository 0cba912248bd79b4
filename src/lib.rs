pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod learning;
pub mod report;
pub mod simulation;
pub mod status;

pub use actions::Action;
pub use config::Config;
pub use environment::{Environment, TrafficEnvironment};
pub use error::{Error, Result};
pub use learning::agent::QLearningAgent;
pub use report::TrainingReport;
pub use simulation::Simulation;

pub type Int = i32;
pub type UInt = u32;

/// Discretised vehicle count at the intersection.
pub type State = usize;
