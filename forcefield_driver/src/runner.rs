//! Runner implementation.
//!
//! This is the host side of the simulation: it owns a [`Simulation`], calls
//! `step(dt)` once per fixed tick, applies the configured [`FaultPolicy`] and
//! executes console commands between ticks.
//!
//! Determinism notes:
//! - Keep simulation in a fixed timestep.
//! - Console commands are applied at tick boundaries only.
//! - Wall-clock pacing lives in `run_for_ticks`/the binary, never in `step`.

use anyhow::bail;
use forcefield_core::{
    body::BodyId,
    config::{FaultPolicy, SimConfig},
    force::DomainError,
    scenario::Scenario,
    sim::{Simulation, TickReport},
    snapshot::Snapshot,
};
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, error, info, warn};

/// Runner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// No bodies, waiting for `spawn`.
    Idle,
    /// Stepping every tick.
    Running,
    /// Stepping suspended by the operator.
    Paused,
    /// Stopped by a fault under [`FaultPolicy::Halt`].
    Halted,
    /// Stopped by `quit` or by reaching `max_ticks`.
    Stopped,
}

/// Fixed-tick host for one simulation.
pub struct SimRunner {
    pub cfg: SimConfig,
    sim: Simulation,
    state: RunnerState,

    /// Snapshots captured since the last `take_snapshots`.
    snapshots: Vec<Snapshot>,
    /// Fault that halted the runner, if any.
    last_fault: Option<(BodyId, DomainError)>,

    /// Channel for console commands from stdin.
    console_rx: Option<mpsc::Receiver<String>>,
}

impl SimRunner {
    /// Creates a runner from a validated config.
    pub fn new(cfg: SimConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let sim = cfg.build_simulation()?;
        let state = if sim.is_empty() {
            RunnerState::Idle
        } else {
            RunnerState::Running
        };
        info!(bodies = sim.len(), tick_hz = cfg.tick_hz, ?state, "Runner created");

        Ok(Self {
            cfg,
            sim,
            state,
            snapshots: Vec::new(),
            last_fault: None,
            console_rx: None,
        })
    }

    /// Sets the console input receiver.
    pub fn set_console_input(&mut self, rx: mpsc::Receiver<String>) {
        self.console_rx = Some(rx);
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn last_fault(&self) -> Option<(BodyId, DomainError)> {
        self.last_fault
    }

    /// True once the runner will not step again.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunnerState::Halted | RunnerState::Stopped)
    }

    /// Drains snapshots captured at the configured cadence.
    pub fn take_snapshots(&mut self) -> Vec<Snapshot> {
        std::mem::take(&mut self.snapshots)
    }

    /// Runs for a number of ticks, paced at `tick_hz`.
    pub async fn run_for_ticks(&mut self, ticks: u64) -> anyhow::Result<()> {
        let dt = self.cfg.dt();
        let interval = Duration::from_secs_f64(dt);
        let mut next = Instant::now();

        for _ in 0..ticks {
            if self.is_finished() {
                break;
            }
            next += interval;
            self.step(dt)?;
            tokio::time::sleep_until(next).await;
        }
        Ok(())
    }

    /// Executes one fixed tick: console first, then the simulation.
    ///
    /// Returns the tick report when the simulation advanced.
    pub fn step(&mut self, dt: f64) -> anyhow::Result<Option<TickReport>> {
        self.process_console_commands();

        if self.state != RunnerState::Running {
            return Ok(None);
        }
        if self.reached_max_ticks() {
            return Ok(None);
        }

        let report = self.sim.step(dt);
        if let Some(&(id, e)) = report.faults.first() {
            match self.cfg.fault_policy {
                FaultPolicy::Skip => {
                    debug!(
                        tick = report.tick,
                        faults = report.faults.len(),
                        "Skipped faulted bodies"
                    );
                }
                FaultPolicy::Halt => {
                    self.state = RunnerState::Halted;
                    self.last_fault = Some((id, e));
                    error!(tick = report.tick, %id, error = %e, "Simulation halted");
                    bail!("simulation halted at tick {}: body {}: {}", report.tick, id, e);
                }
            }
        }

        let tick = self.sim.tick();
        if self.cfg.snapshot_every > 0 && tick % self.cfg.snapshot_every == 0 {
            self.snapshots.push(self.sim.snapshot());
        }
        self.reached_max_ticks();

        Ok(Some(report))
    }

    /// Moves to `Stopped` once the tick limit is reached.
    fn reached_max_ticks(&mut self) -> bool {
        let tick = self.sim.tick();
        if self.cfg.max_ticks.is_some_and(|max| tick >= max) {
            info!(tick, "Reached max_ticks");
            self.state = RunnerState::Stopped;
            return true;
        }
        false
    }

    fn process_console_commands(&mut self) {
        // Collect lines first to avoid borrow conflict
        let lines: Vec<String> = if let Some(ref mut rx) = self.console_rx {
            let mut collected = Vec::new();
            while let Ok(line) = rx.try_recv() {
                collected.push(line);
            }
            collected
        } else {
            Vec::new()
        };

        for line in lines {
            for out in self.exec_console(&line) {
                println!("{}", out);
            }
        }
    }

    /// Executes a console command and returns its output lines.
    pub fn exec_console(&mut self, line: &str) -> Vec<String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        match tokens[0] {
            "spawn" => {
                let Some(name) = tokens.get(1) else {
                    return vec!["Usage: spawn <scenario> [name]".to_string()];
                };
                let scenario: Scenario = match name.parse() {
                    Ok(s) => s,
                    Err(e) => return vec![format!("{}", e)],
                };
                let label = tokens.get(2).map_or(scenario.name(), |n| *n);
                let id = self.sim.spawn(label, scenario.initialize());
                if self.state == RunnerState::Idle {
                    self.state = RunnerState::Running;
                }
                info!(%id, %scenario, "Spawned from console");
                vec![format!("Spawned {} as {}", scenario, id)]
            }
            "despawn" => {
                let id = tokens
                    .get(1)
                    .and_then(|t| t.trim_start_matches('#').parse::<u64>().ok());
                let Some(id) = id else {
                    return vec!["Usage: despawn <id>".to_string()];
                };
                match self.sim.despawn(BodyId(id)) {
                    Some(entry) => {
                        if self.sim.is_empty() && self.state == RunnerState::Running {
                            self.state = RunnerState::Idle;
                        }
                        vec![format!("Despawned {} ({})", BodyId(id), entry.name)]
                    }
                    None => vec![format!("No body {}", BodyId(id))],
                }
            }
            "status" => {
                let mut out = Vec::new();
                out.push(format!("Runner state: {:?}", self.state));
                out.push(format!("Tick: {}", self.sim.tick()));
                out.push(format!("Bodies: {}", self.sim.len()));
                for (id, entry) in self.sim.bodies() {
                    out.push(format!(
                        "  {}: {} law={} pos={} vel={}",
                        id,
                        entry.name,
                        entry.body.law.name(),
                        entry.body.position,
                        entry.body.velocity
                    ));
                }
                out
            }
            "dump" => match self.sim.snapshot().to_json() {
                Ok(json) => vec![json],
                Err(e) => vec![format!("Failed to encode snapshot: {}", e)],
            },
            "pause" => {
                if self.state == RunnerState::Running {
                    self.state = RunnerState::Paused;
                }
                vec![format!("Runner state: {:?}", self.state)]
            }
            "resume" => {
                if self.state == RunnerState::Paused {
                    self.state = if self.sim.is_empty() {
                        RunnerState::Idle
                    } else {
                        RunnerState::Running
                    };
                }
                vec![format!("Runner state: {:?}", self.state)]
            }
            "quit" | "exit" => {
                info!("Runner shutting down");
                self.state = RunnerState::Stopped;
                vec!["Bye".to_string()]
            }
            other => {
                warn!(command = %other, "Unknown console command");
                vec![format!("Unknown command: {}", other)]
            }
        }
    }
}
