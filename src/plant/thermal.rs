use nalgebra::Vector1;
use serde::{Deserialize, Serialize};

use crate::sim::integrator::rk4_step;
use super::Plant;

// ---------------------------------------------------------------------------
// First-order thermal process (heater in a room, hot plate, ...)
// ---------------------------------------------------------------------------

/// Physical parameters of a first-order lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalParams {
    pub ambient: f64,        // temperature with the heater off
    pub gain: f64,           // steady-state rise per unit of input
    pub time_constant: f64,  // s
}

/// `dT/dt = (gain * u - (T - ambient)) / time_constant`, starting at ambient.
#[derive(Debug, Clone)]
pub struct ThermalPlant {
    pub params: ThermalParams,
    temperature: Vector1<f64>,
}

impl ThermalPlant {
    pub fn new(params: ThermalParams) -> Self {
        Self { params, temperature: Vector1::new(params.ambient) }
    }

    /// Temperature the plant settles at under a constant input.
    pub fn steady_state(&self, input: f64) -> f64 {
        self.params.ambient + self.params.gain * input
    }
}

impl Plant for ThermalPlant {
    fn output(&self) -> f64 {
        self.temperature[0]
    }

    fn step(&mut self, input: f64, dt: f64) {
        let p = self.params;
        self.temperature = rk4_step(&self.temperature, dt, |t| {
            Vector1::new((p.gain * input - (t[0] - p.ambient)) / p.time_constant)
        });
    }

    fn reset(&mut self) {
        self.temperature = Vector1::new(self.params.ambient);
    }

    fn name(&self) -> &str {
        "thermal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ThermalPlant {
        ThermalPlant::new(ThermalParams { ambient: 20.0, gain: 2.0, time_constant: 10.0 })
    }

    #[test]
    fn starts_at_ambient_and_stays_without_input() {
        let mut plant = room();
        assert_eq!(plant.output(), 20.0);
        for _ in 0..100 {
            plant.step(0.0, 0.1);
        }
        assert!((plant.output() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn reaches_63_percent_after_one_time_constant() {
        let mut plant = room();
        for _ in 0..100 {
            plant.step(10.0, 0.1);
        }
        // 20 + 20 * (1 - e^-1)
        let expected = 20.0 + 20.0 * (1.0 - (-1.0_f64).exp());
        assert!((plant.output() - expected).abs() < 1e-4, "got {}", plant.output());
    }

    #[test]
    fn settles_at_steady_state() {
        let mut plant = room();
        for _ in 0..2_000 {
            plant.step(5.0, 0.1);
        }
        assert!((plant.output() - plant.steady_state(5.0)).abs() < 1e-6);
    }

    #[test]
    fn reset_returns_to_ambient() {
        let mut plant = room();
        plant.step(100.0, 1.0);
        plant.reset();
        assert_eq!(plant.output(), 20.0);
    }
}
