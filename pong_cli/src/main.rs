mod adapters;
mod autopilot;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use game_core::Config;
use netplay::loopback::DirectFault;

#[derive(Parser)]
#[command(name = "pong_cli")]
#[command(about = "Headless tennis court runner")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    #[arg(short, long, default_value_t = 30.0, help = "Simulated seconds to run")]
    seconds: f32,

    #[arg(long, default_value_t = 12345)]
    seed: u64,

    #[arg(short, long, help = "JSON file overriding court settings")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Mode {
    /// Autopilot at the near end against the scripted opponent
    Single,
    /// Host and guest sessions playing each other in memory
    Loopback {
        #[arg(long, value_enum, default_value_t = Fault::None)]
        fault: Fault,

        #[arg(long, help = "Break the direct channel at this tick")]
        break_at_tick: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Fault {
    None,
    /// Direct channel fails during negotiation
    Setup,
    /// Peer never answers negotiation
    Silent,
}

impl From<Fault> for DirectFault {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::None => DirectFault::None,
            Fault::Setup => DirectFault::FailSetup,
            Fault::Silent => DirectFault::Silent,
        }
    }
}

fn load_config(path: Option<&PathBuf>, fallback: Config) -> Result<Config> {
    let Some(path) = path else {
        return Ok(fallback);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ticks = (args.seconds.max(0.0) / run::DT).round() as u32;

    match args.mode {
        Mode::Single => {
            let config = load_config(args.config.as_ref(), Config::arena_3d())?;
            run::single(config, args.seed, ticks)
        }
        Mode::Loopback {
            fault,
            break_at_tick,
        } => {
            let config = load_config(args.config.as_ref(), Config::flat_court())?;
            run::loopback(config, args.seed, ticks, fault.into(), break_at_tick)
        }
    }
}
