use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::control::{Controller, PidController};
use crate::error::{ConfigError, Result};
use crate::plant::Plant;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Longest run accepted, in control periods.
pub const MAX_STEPS: usize = 10_000_000;

/// Setpoint takes `value` from `time` onwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetpointChange {
    pub time: f64,   // s
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,                          // control period, s
    pub max_time: f64,                    // s
    pub setpoints: Vec<SetpointChange>,   // applied in time order
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if !self.max_time.is_finite() || self.max_time < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_time must be non-negative, got {}",
                self.max_time
            )));
        }
        let steps = (self.max_time / self.dt).round();
        if !steps.is_finite() || steps > MAX_STEPS as f64 {
            return Err(ConfigError::Invalid(format!(
                "max_time / dt is {} periods, limit is {}",
                steps, MAX_STEPS
            )));
        }
        if let Some(c) = self.setpoints.iter().find(|c| !c.time.is_finite()) {
            return Err(ConfigError::Invalid(format!("setpoint change at time {}", c.time)));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,          // 10 Hz
            max_time: 60.0,
            setpoints: vec![SetpointChange { time: 0.0, value: 1.0 }],
        }
    }
}

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// One control period: the measurement the controller saw and what it commanded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub setpoint: f64,
    pub measured: f64,
    pub output: f64,
}

impl Sample {
    pub fn error(&self) -> f64 {
        self.setpoint - self.measured
    }
}

// ---------------------------------------------------------------------------
// Closed-loop simulation
// ---------------------------------------------------------------------------

/// Run `controller` against `plant` for `config.max_time` seconds.
///
/// At every period the due setpoint changes are applied, the controller is
/// fed the current measurement, and the plant is advanced by `dt` with the
/// returned command. The first period is computed with zero elapsed time.
/// Returns one sample per period, including `t = 0`. An invalid config
/// yields an empty trajectory.
pub fn simulate_with(
    plant: &mut dyn Plant,
    controller: &mut dyn Controller,
    config: &SimConfig,
) -> Vec<Sample> {
    if let Err(e) = config.validate() {
        warn!("not simulating: {}", e);
        return Vec::new();
    }

    let mut schedule = config.setpoints.clone();
    schedule.sort_by(|a, b| a.time.total_cmp(&b.time));

    let steps = (config.max_time / config.dt).round() as usize;
    let mut samples = Vec::with_capacity(steps.saturating_add(1).min(200_000));

    info!(
        "simulating {} with {} controller: {} steps of {} s",
        plant.name(),
        controller.name(),
        steps,
        config.dt
    );

    let tolerance = config.dt * 1e-9;
    let mut pending = schedule.iter().peekable();
    let mut setpoint = 0.0;
    let mut dt = 0.0;

    for k in 0..=steps {
        let time = k as f64 * config.dt;

        while let Some(change) = pending.next_if(|c| c.time <= time + tolerance) {
            debug!("t={:.3}: setpoint {} -> {}", time, setpoint, change.value);
            setpoint = change.value;
        }

        let measured = plant.output();
        let output = controller.control(setpoint, measured, dt);
        samples.push(Sample { time, setpoint, measured, output });

        if k < steps {
            plant.step(output, config.dt);
        }
        dt = config.dt;
    }

    samples
}

/// Simulate with a [`PidController`] (convenience wrapper).
pub fn simulate(
    plant: &mut dyn Plant,
    mut controller: PidController,
    config: &SimConfig,
) -> Vec<Sample> {
    simulate_with(plant, &mut controller, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
