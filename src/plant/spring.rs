use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::sim::integrator::rk4_step;
use super::Plant;

// ---------------------------------------------------------------------------
// Second-order process: mass on a spring with viscous damping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub mass: f64,       // kg
    pub damping: f64,    // N·s/m
    pub stiffness: f64,  // N/m
}

/// `m x'' = u - c x' - k x`, starting at rest at the origin.
/// The measured value is the position `x`.
#[derive(Debug, Clone)]
pub struct MassSpringDamper {
    pub params: SpringParams,
    state: Vector2<f64>, // [position, velocity]
}

impl MassSpringDamper {
    pub fn new(params: SpringParams) -> Self {
        Self { params, state: Vector2::zeros() }
    }
}

impl Plant for MassSpringDamper {
    fn output(&self) -> f64 {
        self.state[0]
    }

    fn step(&mut self, input: f64, dt: f64) {
        let p = self.params;
        self.state = rk4_step(&self.state, dt, |s| {
            let accel = (input - p.damping * s[1] - p.stiffness * s[0]) / p.mass;
            Vector2::new(s[1], accel)
        });
    }

    fn reset(&mut self) {
        self.state = Vector2::zeros();
    }

    fn name(&self) -> &str {
        "mass-spring-damper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servo() -> MassSpringDamper {
        MassSpringDamper::new(SpringParams { mass: 1.0, damping: 2.0, stiffness: 4.0 })
    }

    #[test]
    fn constant_force_settles_at_force_over_stiffness() {
        let mut plant = servo();
        for _ in 0..3_000 {
            plant.step(8.0, 0.01);
        }
        assert!((plant.output() - 2.0).abs() < 1e-6, "got {}", plant.output());
        assert!(plant.state[1].abs() < 1e-6);
    }

    #[test]
    fn undamped_oscillator_returns_after_one_period() {
        let mut plant = MassSpringDamper::new(SpringParams { mass: 1.0, damping: 0.0, stiffness: 1.0 });
        // released from x = 1
        plant.state = Vector2::new(1.0, 0.0);
        let period = 2.0 * std::f64::consts::PI;
        let steps = 10_000;
        for _ in 0..steps {
            plant.step(0.0, period / steps as f64);
        }
        assert!((plant.output() - 1.0).abs() < 1e-6, "got {}", plant.output());
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut plant = servo();
        plant.step(10.0, 0.5);
        assert!(plant.output() > 0.0);
        plant.reset();
        assert_eq!(plant.output(), 0.0);
        assert_eq!(plant.state[1], 0.0);
    }
}
