use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::InvalidRangeError;

// ---------------------------------------------------------------------------
// Derivative policy
// ---------------------------------------------------------------------------

/// Which quantity the derivative term differentiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeMode {
    /// `-(value - prev_value) / dt`. Setpoint steps do not kick the output.
    #[default]
    OnMeasurement,
    /// `(error - prev_error) / dt`. Setpoint steps show up as a spike.
    OnError,
}

// ---------------------------------------------------------------------------
// PID controller (single loop, anti-windup)
// ---------------------------------------------------------------------------

/// Discrete-time PID controller.
///
/// The integral gain is applied when error is accumulated, so changing
/// `ki` only affects future accumulation. When output bounds are set the
/// accumulator is clamped to them on every update (anti-windup) as well as
/// the final output.
///
/// Not synchronized: one control loop owns one controller.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    setpoint: f64,
    integral: f64,      // time-weighted error, ki already applied
    prev_value: f64,    // measurement from the last update
    prev_error: f64,    // error from the last update
    last_update: Option<Instant>,
    output_min: f64,
    output_max: f64,
    derivative_mode: DerivativeMode,
}

impl PidController {
    /// New controller with zero setpoint and state and unbounded output.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint: 0.0,
            integral: 0.0,
            prev_value: 0.0,
            prev_error: 0.0,
            last_update: None,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
            derivative_mode: DerivativeMode::default(),
        }
    }

    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        debug!("gains changed to p={} i={} d={}", kp, ki, kd);
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// `(kp, ki, kd)`
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.kp, self.ki, self.kd)
    }

    /// Set the output clamp and re-clamp the integral accumulator into it.
    ///
    /// Fails without touching the current bounds when `min > max`.
    pub fn set_output_bounds(&mut self, min: f64, max: f64) -> Result<(), InvalidRangeError> {
        if min > max {
            warn!("rejected output bounds: min {} > max {}", min, max);
            return Err(InvalidRangeError { min, max });
        }
        debug!("output bounds set to [{}, {}]", min, max);
        self.output_min = min;
        self.output_max = max;
        self.integral = clamp(self.integral, min, max);
        Ok(())
    }

    /// `(min, max)`; infinite when unbounded.
    pub fn output_bounds(&self) -> (f64, f64) {
        (self.output_min, self.output_max)
    }

    pub fn set_derivative_mode(&mut self, mode: DerivativeMode) {
        self.derivative_mode = mode;
    }

    pub fn derivative_mode(&self) -> DerivativeMode {
        self.derivative_mode
    }

    /// Current integral contribution to the output.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Clear accumulated and previous-sample state. Configuration is kept.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_value = 0.0;
        self.prev_error = 0.0;
        self.last_update = None;
    }

    /// Advance the controller by `dt` seconds with a new measurement and
    /// return the output.
    ///
    /// `dt == 0` is valid: integral and derivative contribute no change.
    /// NaN or negative inputs are not checked and flow through the arithmetic.
    pub fn update_elapsed(&mut self, value: f64, dt: f64) -> f64 {
        let error = self.setpoint - value;

        // Anti-windup: the accumulator itself never leaves the output range
        self.integral += error * dt * self.ki;
        self.integral = clamp(self.integral, self.output_min, self.output_max);

        let derivative = if dt > 0.0 {
            match self.derivative_mode {
                DerivativeMode::OnMeasurement => -((value - self.prev_value) / dt),
                DerivativeMode::OnError => (error - self.prev_error) / dt,
            }
        } else {
            0.0
        };

        let output = self.kp * error + self.integral + self.kd * derivative;
        let output = clamp(output, self.output_min, self.output_max);

        self.prev_value = value;
        self.prev_error = error;

        trace!(
            "pid update: value={} dt={} error={} integral={} output={}",
            value, dt, error, self.integral, output
        );
        output
    }

    /// [`update_elapsed`](Self::update_elapsed) with a `Duration`.
    pub fn update_duration(&mut self, value: f64, elapsed: Duration) -> f64 {
        self.update_elapsed(value, elapsed.as_secs_f64())
    }

    /// Update using the wall-clock time since the previous call to
    /// `update`/`update_at` (zero on the first call).
    pub fn update(&mut self, value: f64) -> f64 {
        self.update_at(value, Instant::now())
    }

    /// Same as [`update`](Self::update) with the current time supplied by the
    /// caller. A clock that goes backwards counts as zero elapsed time.
    pub fn update_at(&mut self, value: f64, now: Instant) -> f64 {
        let elapsed = self
            .last_update
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_update = Some(now);
        self.update_duration(value, elapsed)
    }
}

impl super::Controller for PidController {
    fn control(&mut self, setpoint: f64, measured: f64, dt: f64) -> f64 {
        self.set_setpoint(setpoint);
        self.update_elapsed(measured, dt)
    }

    fn reset(&mut self) {
        PidController::reset(self);
    }

    fn name(&self) -> &str {
        "PID"
    }
}

/// Clamp that passes NaN through instead of panicking like `f64::clamp`.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct PidBuilder {
    kp: f64,
    ki: f64,
    kd: f64,
    setpoint: f64,
    output_bounds: Option<(f64, f64)>,
    derivative_mode: DerivativeMode,
}

impl PidBuilder {
    pub fn new() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            setpoint: 0.0,
            output_bounds: None,
            derivative_mode: DerivativeMode::default(),
        }
    }

    pub fn gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        self
    }

    pub fn kp(mut self, v: f64) -> Self {
        self.kp = v;
        self
    }

    pub fn ki(mut self, v: f64) -> Self {
        self.ki = v;
        self
    }

    pub fn kd(mut self, v: f64) -> Self {
        self.kd = v;
        self
    }

    pub fn setpoint(mut self, v: f64) -> Self {
        self.setpoint = v;
        self
    }

    pub fn output_bounds(mut self, min: f64, max: f64) -> Self {
        self.output_bounds = Some((min, max));
        self
    }

    pub fn derivative_mode(mut self, v: DerivativeMode) -> Self {
        self.derivative_mode = v;
        self
    }

    pub fn build(self) -> Result<PidController, InvalidRangeError> {
        let mut pid = PidController::new(self.kp, self.ki, self.kd);
        pid.set_setpoint(self.setpoint);
        pid.set_derivative_mode(self.derivative_mode);
        if let Some((min, max)) = self.output_bounds {
            pid.set_output_bounds(min, max)?;
        }
        Ok(pid)
    }
}

impl Default for PidBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
