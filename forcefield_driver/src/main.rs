//! Standalone simulation binary.
//!
//! Usage:
//!   cargo run -p forcefield_driver -- [--config sim.json] [--tick-hz 50] [--ticks 500]
//!       [--scenario satellite]... [--time-scaled] [--halt-on-fault] [--snapshot-every 10]
//!
//! The runner steps every body once per fixed tick and prints snapshot lines
//! (JSON) to stdout at the configured cadence.
//!
//! Console commands:
//!   spawn <scenario> [name] - Add a preset body
//!   despawn <id>            - Remove a body
//!   status                  - Show runner status
//!   dump                    - Print the current snapshot as JSON
//!   pause / resume          - Suspend or resume stepping
//!   quit                    - Shutdown

use std::env;
use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use forcefield_core::{
    config::{BodySpec, FaultPolicy, SimConfig},
    integrator::VelocityUpdate,
    scenario::Scenario,
};
use forcefield_driver::SimRunner;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Builds the config from command-line arguments (program name excluded).
///
/// The config file is the base layer and every other flag overrides it;
/// validation runs once, after all overrides.
fn parse_args_from(args: impl IntoIterator<Item = String>) -> anyhow::Result<SimConfig> {
    let args: Vec<String> = args.into_iter().collect();

    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).context("--config needs a path")?;
            SimConfig::read(&PathBuf::from(path))?
        }
        None => SimConfig::default(),
    };

    let mut scenarios = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            "--tick-hz" if i + 1 < args.len() => {
                cfg.tick_hz = args[i + 1].parse().context("--tick-hz")?;
                i += 2;
            }
            "--ticks" if i + 1 < args.len() => {
                cfg.max_ticks = Some(args[i + 1].parse().context("--ticks")?);
                i += 2;
            }
            "--scenario" if i + 1 < args.len() => {
                let s: Scenario = args[i + 1].parse()?;
                scenarios.push(BodySpec::preset(s));
                i += 2;
            }
            "--snapshot-every" if i + 1 < args.len() => {
                cfg.snapshot_every = args[i + 1].parse().context("--snapshot-every")?;
                i += 2;
            }
            "--time-scaled" => {
                cfg.velocity_update = VelocityUpdate::TimeScaled;
                i += 1;
            }
            "--halt-on-fault" => {
                cfg.fault_policy = FaultPolicy::Halt;
                i += 1;
            }
            other => {
                warn!(arg = %other, "Ignoring unknown argument");
                i += 1;
            }
        }
    }
    if !scenarios.is_empty() {
        cfg.bodies = scenarios;
    }
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = parse_args_from(env::args().skip(1)).context("parse arguments")?;
    info!(
        tick_hz = cfg.tick_hz,
        max_ticks = ?cfg.max_ticks,
        velocity_update = ?cfg.velocity_update,
        fault_policy = ?cfg.fault_policy,
        bodies = cfg.bodies.len(),
        "Starting simulation"
    );

    let mut runner = SimRunner::new(cfg.clone()).context("create runner")?;

    // Set up console input channel.
    let (console_tx, console_rx) = mpsc::channel::<String>(32);
    runner.set_console_input(console_rx);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    // Main fixed-tick loop.
    let dt = cfg.dt();
    let tick_interval = std::time::Duration::from_secs_f64(dt);
    let mut next_tick = tokio::time::Instant::now();

    while !runner.is_finished() {
        runner.step(dt)?;

        for snap in runner.take_snapshots() {
            println!("{}", snap.to_json().context("encode snapshot")?);
        }

        next_tick += tick_interval;
        tokio::time::sleep_until(next_tick).await;
    }

    info!(tick = runner.simulation().tick(), state = ?runner.state(), "Simulation finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config_file(json: &str) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(json.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn no_args_gives_defaults() -> anyhow::Result<()> {
        let cfg = parse_args_from(Vec::new())?;
        assert_eq!(cfg.tick_hz, 50);
        assert_eq!(cfg.bodies.len(), Scenario::ALL.len());
        Ok(())
    }

    #[test]
    fn flags_override_config_file() -> anyhow::Result<()> {
        let file = config_file(r#"{ "tick_hz": 10, "max_ticks": 7, "snapshot_every": 2 }"#)?;
        let path = file.path().to_string_lossy().to_string();
        let cfg = parse_args_from(args(&[
            "--config",
            &path,
            "--tick-hz",
            "100",
            "--time-scaled",
            "--halt-on-fault",
        ]))?;
        assert_eq!(cfg.tick_hz, 100);
        assert_eq!(cfg.max_ticks, Some(7));
        assert_eq!(cfg.snapshot_every, 2);
        assert_eq!(cfg.velocity_update, VelocityUpdate::TimeScaled);
        assert_eq!(cfg.fault_policy, FaultPolicy::Halt);
        Ok(())
    }

    #[test]
    fn override_repairs_invalid_file_value() -> anyhow::Result<()> {
        let file = config_file(r#"{ "tick_hz": 0 }"#)?;
        let path = file.path().to_string_lossy().to_string();
        assert!(parse_args_from(args(&["--config", &path])).is_err());

        let cfg = parse_args_from(args(&["--config", &path, "--tick-hz", "50"]))?;
        assert_eq!(cfg.tick_hz, 50);
        Ok(())
    }

    #[test]
    fn scenario_flags_replace_body_list() -> anyhow::Result<()> {
        let file = config_file(
            r#"{ "bodies": [ { "scenario": "gravity" }, { "scenario": "spring_d" } ] }"#,
        )?;
        let path = file.path().to_string_lossy().to_string();
        let cfg = parse_args_from(args(&[
            "--config",
            &path,
            "--scenario",
            "Satellite",
            "--scenario",
            "springc",
        ]))?;
        assert_eq!(
            cfg.bodies,
            vec![
                BodySpec::preset(Scenario::Satellite),
                BodySpec::preset(Scenario::SpringC)
            ]
        );
        Ok(())
    }

    #[test]
    fn unknown_arguments_are_ignored() -> anyhow::Result<()> {
        let cfg = parse_args_from(args(&["--verbose", "--ticks", "3", "stray"]))?;
        assert_eq!(cfg.max_ticks, Some(3));
        Ok(())
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(parse_args_from(args(&["--tick-hz", "fast"])).is_err());
        assert!(parse_args_from(args(&["--scenario", "moon"])).is_err());
        assert!(parse_args_from(args(&["--config"])).is_err());
    }
}
