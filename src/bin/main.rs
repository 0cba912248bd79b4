use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use traffic_rl::{Action, Config, Simulation, status::MonitoringSnapshot};

#[derive(Parser)]
#[command(name = "traffic-rl", about = "Q-learning traffic signal simulation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Train an agent and summarise the run
    Train {
        /// TOML configuration file
        #[arg(short, long, env = "TRAFFIC_RL_CONFIG")]
        config: Option<PathBuf>,
        /// Override the number of episodes
        #[arg(long)]
        episodes: Option<u32>,
        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write the training report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a synthetic monitoring snapshot as JSON
    Status,
}

fn train(
    config_path: Option<PathBuf>,
    episodes: Option<u32>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(episodes) = episodes {
        config.training.episodes = episodes;
    }
    if seed.is_some() {
        config.training.seed = seed;
    }

    let mut sim = Simulation::new(&config).context("setting up simulation")?;
    let report = sim.run().context("training failed")?;

    println!("Training finished after {} episodes", report.episode_rewards.len());
    if let Some(mean) = report.mean_reward() {
        println!("Mean total reward: {mean:.2}");
    }
    if let Some((episode, reward)) = report.best_episode() {
        println!("Best episode: {} ({reward:.2})", episode + 1);
    }
    println!(
        "Greedy policy: {} states Go, {} states Stop",
        report.policy_count(Action::Go),
        report.policy_count(Action::Stop)
    );

    if let Some(path) = output {
        report
            .write_json(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Train {
        config: None,
        episodes: None,
        seed: None,
        output: None,
    }) {
        Command::Train {
            config,
            episodes,
            seed,
            output,
        } => train(config, episodes, seed, output),
        Command::Status => {
            let snapshot = MonitoringSnapshot::generate(&mut StdRng::from_os_rng());
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
    }
}
