use pidctrl::config::presets;
use pidctrl::sim::{self, ResponseSummary};
use pidctrl::Controller;

/// On/off thermostat with a hysteresis band: full power below
/// `setpoint - band`, off above `setpoint + band`, otherwise keep the
/// previous state.
struct BangBangController {
    band: f64,
    power: f64,
    on: bool,
}

impl Controller for BangBangController {
    fn control(&mut self, setpoint: f64, measured: f64, _dt: f64) -> f64 {
        if measured < setpoint - self.band {
            self.on = true;
        } else if measured > setpoint + self.band {
            self.on = false;
        }
        if self.on { self.power } else { 0.0 }
    }

    fn reset(&mut self) {
        self.on = false;
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() {
    let scenario = presets::thermostat();

    let mut bang_bang = BangBangController { band: 0.25, power: 100.0, on: false };
    let mut plant = scenario.plant.build();
    println!("Simulating {} with {} controller...", scenario.name, bang_bang.name());
    let on_off = sim::simulate_with(plant.as_mut(), &mut bang_bang, &scenario.sim);

    let mut pid = scenario.controller.build().expect("preset bounds are valid");
    plant.reset();
    println!("Simulating {} with {} controller...", scenario.name, pid.name());
    let pid_run = sim::simulate_with(plant.as_mut(), &mut pid, &scenario.sim);

    for (name, samples) in [("BangBang", &on_off), ("PID", &pid_run)] {
        let Some(s) = ResponseSummary::from_samples(samples) else {
            continue;
        };
        let switches = samples.windows(2).filter(|w| w[0].output != w[1].output).count();
        println!(
            "{:>9}: final {:.2} (setpoint {:.1}), peak {:.2}, IAE {:.1}, output changes {}",
            name, s.final_value, s.setpoint, s.peak, s.iae, switches
        );
    }
}
