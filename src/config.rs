//! Scenario files: controller, plant and run settings in one JSON document.
//!
//! ```json
//! {
//!   "name": "Heater",
//!   "controller": {
//!     "gains": { "p": 4.0, "i": 0.2, "d": 1.0 },
//!     "output_bounds": [0.0, 100.0]
//!   },
//!   "plant": { "kind": "thermal", "ambient": 20.0, "gain": 0.5, "time_constant": 60.0 },
//!   "sim": { "dt": 0.5, "max_time": 600.0, "setpoints": [{ "time": 0.0, "value": 45.0 }] }
//! }
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::control::{DerivativeMode, PidBuilder, PidController};
use crate::error::{ConfigError, InvalidRangeError, Result};
use crate::plant::spring::SpringParams;
use crate::plant::thermal::ThermalParams;
use crate::plant::{MassSpringDamper, Plant, ThermalPlant};
use crate::sim::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub gains: Gains,
    #[serde(default)]
    pub setpoint: f64,
    #[serde(default)]
    pub output_bounds: Option<(f64, f64)>,
    #[serde(default)]
    pub derivative_mode: DerivativeMode,
}

impl ControllerConfig {
    pub fn build(&self) -> std::result::Result<PidController, InvalidRangeError> {
        let mut builder = PidBuilder::new()
            .gains(self.gains.p, self.gains.i, self.gains.d)
            .setpoint(self.setpoint)
            .derivative_mode(self.derivative_mode);
        if let Some((min, max)) = self.output_bounds {
            builder = builder.output_bounds(min, max);
        }
        builder.build()
    }
}

/// Process model selection, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlantConfig {
    Thermal(ThermalParams),
    MassSpringDamper(SpringParams),
}

impl PlantConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            PlantConfig::Thermal(p) if !p.time_constant.is_finite() || p.time_constant <= 0.0 => {
                Err(ConfigError::Invalid(format!(
                    "thermal time_constant must be positive, got {}",
                    p.time_constant
                )))
            }
            PlantConfig::MassSpringDamper(p) if !p.mass.is_finite() || p.mass <= 0.0 => {
                Err(ConfigError::Invalid(format!("mass must be positive, got {}", p.mass)))
            }
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Box<dyn Plant> {
        match *self {
            PlantConfig::Thermal(p) => Box::new(ThermalPlant::new(p)),
            PlantConfig::MassSpringDamper(p) => Box::new(MassSpringDamper::new(p)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub controller: ControllerConfig,
    pub plant: PlantConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Scenario {
    /// Parse and validate a scenario from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        debug!("loaded scenario {:?}", scenario.name);
        Ok(scenario)
    }

    /// Read, parse and validate a scenario file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.controller.output_bounds {
            if min > max {
                return Err(InvalidRangeError { min, max }.into());
            }
        }
        self.plant.validate()?;
        self.sim.validate()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Built-in scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::sim::SetpointChange;

    /// Room heater: slow first-order process, heater power limited to 0..100 %.
    pub fn thermostat() -> Scenario {
        Scenario {
            name: "Thermostat".into(),
            controller: ControllerConfig {
                gains: Gains { p: 8.0, i: 0.15, d: 2.0 },
                setpoint: 0.0,
                output_bounds: Some((0.0, 100.0)),
                derivative_mode: DerivativeMode::OnMeasurement,
            },
            plant: PlantConfig::Thermal(ThermalParams {
                ambient: 18.0,
                gain: 0.1,           // 100 % power holds the room 10 degrees above ambient
                time_constant: 120.0,
            }),
            sim: SimConfig {
                dt: 1.0,
                max_time: 1_800.0,
                setpoints: vec![
                    SetpointChange { time: 0.0, value: 21.0 },
                    SetpointChange { time: 900.0, value: 24.0 },
                ],
            },
        }
    }

    /// Position servo on a lightly damped spring-mass, symmetric force limit.
    pub fn servo() -> Scenario {
        Scenario {
            name: "Servo".into(),
            controller: ControllerConfig {
                gains: Gains { p: 30.0, i: 10.0, d: 8.0 },
                setpoint: 0.0,
                output_bounds: Some((-50.0, 50.0)),
                derivative_mode: DerivativeMode::OnMeasurement,
            },
            plant: PlantConfig::MassSpringDamper(SpringParams {
                mass: 2.0,
                damping: 0.5,
                stiffness: 5.0,
            }),
            sim: SimConfig {
                dt: 0.01,
                max_time: 20.0,
                setpoints: vec![SetpointChange { time: 0.0, value: 1.0 }],
            },
        }
    }

    pub fn by_name(name: &str) -> Option<Scenario> {
        match name.to_ascii_lowercase().as_str() {
            "thermostat" => Some(thermostat()),
            "servo" => Some(servo()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{simulate, ResponseSummary};

    const HEATER: &str = r#"{
        "name": "Heater",
        "controller": {
            "gains": { "p": 4.0, "i": 0.2, "d": 1.0 },
            "output_bounds": [0.0, 100.0]
        },
        "plant": { "kind": "thermal", "ambient": 20.0, "gain": 0.5, "time_constant": 60.0 },
        "sim": { "dt": 0.5, "max_time": 600.0, "setpoints": [{ "time": 0.0, "value": 45.0 }] }
    }"#;

    #[test]
    fn parses_documented_example() {
        let s = Scenario::from_json_str(HEATER).unwrap();
        assert_eq!(s.name, "Heater");
        assert_eq!(s.controller.gains, Gains { p: 4.0, i: 0.2, d: 1.0 });
        assert_eq!(s.controller.derivative_mode, DerivativeMode::OnMeasurement);
        assert_eq!(s.sim.dt, 0.5);

        let pid = s.controller.build().unwrap();
        assert_eq!(pid.gains(), (4.0, 0.2, 1.0));
        assert_eq!(pid.output_bounds(), (0.0, 100.0));
    }

    #[test]
    fn optional_sections_default() {
        let s = Scenario::from_json_str(
            r#"{
                "name": "bare",
                "controller": { "gains": { "p": 1.0, "i": 0.0, "d": 0.0 }, "derivative_mode": "on_error" },
                "plant": { "kind": "mass_spring_damper", "mass": 1.0, "damping": 1.0, "stiffness": 1.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(s.sim, SimConfig::default());
        assert_eq!(s.controller.output_bounds, None);
        assert_eq!(s.controller.derivative_mode, DerivativeMode::OnError);
        let pid = s.controller.build().unwrap();
        assert_eq!(pid.output_bounds(), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn inverted_bounds_are_a_range_error() {
        let text = HEATER.replace("[0.0, 100.0]", "[100.0, 1.0]");
        match Scenario::from_json_str(&text) {
            Err(ConfigError::Range(e)) => assert_eq!(e, InvalidRangeError { min: 100.0, max: 1.0 }),
            other => panic!("expected range error, got {:?}", other),
        }
    }

    #[test]
    fn bad_json_and_bad_values_are_reported() {
        assert!(matches!(Scenario::from_json_str("{"), Err(ConfigError::Json(_))));

        let text = HEATER.replace("\"dt\": 0.5", "\"dt\": -1.0");
        assert!(matches!(Scenario::from_json_str(&text), Err(ConfigError::Invalid(_))));

        let text = HEATER.replace("\"time_constant\": 60.0", "\"time_constant\": 0.0");
        assert!(matches!(Scenario::from_json_str(&text), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_run_is_rejected_on_load() {
        let text = HEATER.replace(
            "\"dt\": 0.5, \"max_time\": 600.0",
            "\"dt\": 1e-300, \"max_time\": 1e300",
        );
        assert_ne!(text, HEATER);
        assert!(matches!(Scenario::from_json_str(&text), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Scenario::from_file("/nonexistent/scenario.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn scenario_round_trips_through_json() {
        let s = presets::servo();
        let back = Scenario::from_json_str(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn presets_are_valid_and_settle() {
        for s in [presets::thermostat(), presets::servo()] {
            s.validate().unwrap();
            let mut plant = s.plant.build();
            let samples = simulate(plant.as_mut(), s.controller.build().unwrap(), &s.sim);
            let summary = ResponseSummary::from_samples(&samples).unwrap();
            assert!(
                summary.steady_state_error.abs() < 0.05,
                "{} ends {} away from setpoint",
                s.name,
                summary.steady_state_error
            );
        }
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(presets::by_name("Servo").unwrap().name, "Servo");
        assert!(presets::by_name("boiler").is_none());
    }
}
