use nalgebra::SVector;

// ---------------------------------------------------------------------------
// Classic RK4 over a fixed-size state vector
// ---------------------------------------------------------------------------

/// Single RK4 step of `dx/dt = f(x)`.
///
/// Inputs that act on the system are captured by `f` and held constant
/// over the step.
pub fn rk4_step<const N: usize, F>(x: &SVector<f64, N>, dt: f64, f: F) -> SVector<f64, N>
where
    F: Fn(&SVector<f64, N>) -> SVector<f64, N>,
{
    let k1 = f(x);
    let k2 = f(&(x + k1 * (dt * 0.5)));
    let k3 = f(&(x + k2 * (dt * 0.5)));
    let k4 = f(&(x + k3 * dt));

    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
