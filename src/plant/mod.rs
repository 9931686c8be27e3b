pub mod thermal;
pub mod spring;

pub use spring::MassSpringDamper;
pub use thermal::ThermalPlant;

/// Trait for simulated processes driven by a controller.
///
/// A plant is advanced in fixed steps with the actuator command held
/// constant across each step.
pub trait Plant {
    /// Current measured process value.
    fn output(&self) -> f64;

    /// Advance the process by `dt` seconds under actuator command `input`.
    fn step(&mut self, input: f64, dt: f64);

    /// Return to the initial condition.
    fn reset(&mut self);

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "plant"
    }
}
