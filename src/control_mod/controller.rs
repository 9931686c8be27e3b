/// Trait for feedback control laws.
///
/// Implement this to plug a custom control law into the simulation loop.
pub trait Controller {
    /// Compute the actuator command for the current measurement.
    ///
    /// `dt` is the time in seconds since the previous call.
    fn control(&mut self, setpoint: f64, measured: f64, dt: f64) -> f64;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
