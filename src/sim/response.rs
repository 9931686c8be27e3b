use serde::Serialize;

use super::runner::Sample;

/// Settling band as a fraction of the step size.
pub const SETTLING_BAND: f64 = 0.02;

// ---------------------------------------------------------------------------
// Step-response analysis
// ---------------------------------------------------------------------------

/// Figures of merit for the last setpoint segment of a run.
///
/// Times are measured from the start of that segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSummary {
    pub setpoint: f64,
    pub initial_value: f64,
    pub final_value: f64,
    pub steady_state_error: f64,
    pub peak: f64,
    pub overshoot_pct: f64,
    pub rise_time: Option<f64>,      // 10 % -> 90 % of the step
    pub settling_time: Option<f64>,  // stays inside the 2 % band from here on
    pub iae: f64,                    // integral of |error| dt
    pub min_output: f64,
    pub max_output: f64,
    pub duration: f64,
}

impl ResponseSummary {
    /// Compute the summary from a sampled run. `None` for an empty run.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let last = samples.last()?;

        // The final segment starts at the last setpoint change.
        let start = samples
            .windows(2)
            .rposition(|w| w[0].setpoint != w[1].setpoint)
            .map(|i| i + 1)
            .unwrap_or(0);
        let segment = &samples[start..];
        let t0 = segment[0].time;

        let setpoint = last.setpoint;
        let initial_value = segment[0].measured;
        let step = setpoint - initial_value;
        let has_step = step.abs() > f64::EPSILON * setpoint.abs().max(1.0);

        let peak = if step >= 0.0 {
            segment.iter().map(|s| s.measured).fold(f64::NEG_INFINITY, f64::max)
        } else {
            segment.iter().map(|s| s.measured).fold(f64::INFINITY, f64::min)
        };
        let overshoot_pct = if has_step {
            ((peak - setpoint) / step * 100.0).max(0.0)
        } else {
            0.0
        };

        let progress = |s: &Sample| (s.measured - initial_value) / step;
        let rise_time = if has_step {
            let t10 = segment.iter().find(|s| progress(s) >= 0.1).map(|s| s.time);
            let t90 = segment.iter().find(|s| progress(s) >= 0.9).map(|s| s.time);
            match (t10, t90) {
                (Some(a), Some(b)) => Some(b - a),
                _ => None,
            }
        } else {
            None
        };

        let settling_time = if has_step {
            let band = SETTLING_BAND * step.abs();
            match segment.iter().rposition(|s| (s.measured - setpoint).abs() > band) {
                None => Some(0.0),
                Some(i) if i + 1 < segment.len() => Some(segment[i + 1].time - t0),
                Some(_) => None,
            }
        } else {
            None
        };

        let iae: f64 = segment
            .windows(2)
            .map(|w| w[0].error().abs() * (w[1].time - w[0].time))
            .sum();

        let min_output = samples.iter().map(|s| s.output).fold(f64::INFINITY, f64::min);
        let max_output = samples.iter().map(|s| s.output).fold(f64::NEG_INFINITY, f64::max);

        Some(ResponseSummary {
            setpoint,
            initial_value,
            final_value: last.measured,
            steady_state_error: setpoint - last.measured,
            peak,
            overshoot_pct,
            rise_time,
            settling_time,
            iae,
            min_output,
            max_output,
            duration: last.time - samples[0].time,
        })
    }
}
