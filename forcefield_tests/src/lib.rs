//! Shared helpers for the cross-crate test suites.

use forcefield_core::{
    body::Body,
    integrator::{Integrator, SemiImplicitEuler},
    scenario::Scenario,
};

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Steps a body `ticks` times with the default integrator.
pub fn run_ticks(body: &mut Body, ticks: usize, dt: f64) -> anyhow::Result<()> {
    let euler = SemiImplicitEuler::default();
    for _ in 0..ticks {
        euler.step(body, dt)?;
    }
    Ok(())
}

/// Largest distance from the origin reached in the `window` ticks that follow
/// the first `skip` ticks.
pub fn peak_distance(mut body: Body, skip: usize, window: usize, dt: f64) -> anyhow::Result<f64> {
    run_ticks(&mut body, skip, dt)?;
    let euler = SemiImplicitEuler::default();
    let mut peak: f64 = 0.0;
    for _ in 0..window {
        euler.step(&mut body, dt)?;
        peak = peak.max(body.position.len());
    }
    Ok(peak)
}

/// A preset body with its force law swapped out.
pub fn preset_with(scenario: Scenario, law: forcefield_core::force::ForceLaw) -> Body {
    let mut body = scenario.initialize();
    body.law = law;
    body
}
