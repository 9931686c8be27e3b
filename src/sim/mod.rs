pub mod integrator;
pub mod response;
pub mod runner;

pub use integrator::rk4_step;
pub use response::ResponseSummary;
pub use runner::{simulate, simulate_with, Sample, SetpointChange, SimConfig, MAX_STEPS};
