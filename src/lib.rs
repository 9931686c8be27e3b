pub mod error;
mod control_mod;
pub mod plant;
pub mod sim;
pub mod io;
pub mod config;

// The control module: expose control_mod as `control` publicly
pub mod control {
    pub use crate::control_mod::*;
}

pub use control::{Controller, DerivativeMode, PidBuilder, PidController};
pub use error::{ConfigError, InvalidRangeError};
