//! Synthetic monitoring data for dashboards.
//!
//! Values are drawn at random and have no connection to any training run.

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub const NUM_INTERSECTIONS: u32 = 3;
pub const NUM_METRICS: usize = 16;
const ALERT_PROBABILITY: f64 = 0.2;
const YELLOW_DURATION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SignalPhase {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalStatus {
    pub id: String,
    pub status: SignalPhase,
    pub duration: u32,
    pub cars_passed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueLength {
    pub id: String,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub reward: f64,
    pub episodes: u32,
    pub metrics: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSnapshot {
    pub signals: Vec<SignalStatus>,
    pub queue_lengths: Vec<QueueLength>,
    pub agent_performance: AgentPerformance,
    pub alerts: Vec<Alert>,
}

impl MonitoringSnapshot {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let phases = [SignalPhase::Green, SignalPhase::Yellow, SignalPhase::Red];
        let signals = phases
            .iter()
            .zip(1..)
            .map(|(phase, id)| SignalStatus {
                id: id.to_string(),
                status: *phase,
                duration: match phase {
                    SignalPhase::Yellow => YELLOW_DURATION,
                    _ => rng.random_range(20..=60),
                },
                cars_passed: rng.random_range(100..=500),
            })
            .collect();
        let queue_lengths = (1..=NUM_INTERSECTIONS)
            .map(|id| QueueLength {
                id: id.to_string(),
                length: rng.random_range(5..=40),
            })
            .collect();
        let agent_performance = AgentPerformance {
            reward: rng.random_range(80.0..100.0),
            episodes: rng.random_range(100..=500),
            metrics: (0..NUM_METRICS)
                .map(|_| rng.random_range(80.0..100.0))
                .collect(),
        };
        let mut alerts = vec![];
        if rng.random::<f64>() < ALERT_PROBABILITY {
            alerts.push(Alert {
                message: format!(
                    "High congestion alert at intersection {}!",
                    rng.random_range(1..=NUM_INTERSECTIONS)
                ),
                timestamp: Local::now().format("%H:%M:%S").to_string(),
            });
        }
        MonitoringSnapshot {
            signals,
            queue_lengths,
            agent_performance,
            alerts,
        }
    }
}
