use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use pidctrl::config::{presets, PlantConfig, Scenario};
use pidctrl::plant::ThermalPlant;
use pidctrl::io;
use pidctrl::sim::{self, ResponseSummary};

const USAGE: &str = "usage: pidctrl [SCENARIO.json | thermostat | servo] [--csv PATH] [--json PATH]";

struct Args {
    scenario: String,
    csv: Option<String>,
    json: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { scenario: "thermostat".into(), csv: None, json: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--csv" => args.csv = Some(it.next().context("--csv needs a path")?),
            "--json" => args.json = Some(it.next().context("--json needs a path")?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            s if s.starts_with('-') => bail!("unknown option {}\n{}", s, USAGE),
            s => args.scenario = s.to_string(),
        }
    }
    Ok(args)
}

fn load(name: &str) -> Result<Scenario> {
    if let Some(s) = presets::by_name(name) {
        return Ok(s);
    }
    if !Path::new(name).exists() {
        bail!("no preset or file named {:?}\n{}", name, USAGE);
    }
    Scenario::from_file(name).with_context(|| format!("loading scenario {}", name))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args()?;
    let scenario = load(&args.scenario)?;

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let controller = scenario.controller.build().context("building controller")?;
    let mut plant = scenario.plant.build();
    let samples = sim::simulate(plant.as_mut(), controller, &scenario.sim);
    let summary =
        ResponseSummary::from_samples(&samples).context("simulation produced no samples")?;
    info!("{}: {} samples", scenario.name, samples.len());

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let c = &scenario.controller;
    println!();
    println!("====================================================================");
    println!("  PID CLOSED-LOOP SIMULATION — {}", scenario.name);
    println!("====================================================================");
    println!();
    println!("  Controller");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Kp: {:>10.4}   Ki: {:>10.4}   Kd: {:>10.4}",
        c.gains.p, c.gains.i, c.gains.d
    );
    match c.output_bounds {
        Some((min, max)) => println!(
            "  Output:  [{}, {}]   derivative {:?}",
            min, max, c.derivative_mode
        ),
        None => println!("  Output:  unbounded   derivative {:?}", c.derivative_mode),
    }
    println!();

    println!("  Plant");
    println!("  ──────────────────────────────────────────────────────────────────");
    match scenario.plant {
        PlantConfig::Thermal(p) => {
            println!(
                "  Thermal     ambient {:.1}   gain {:.3}   tau {:.1} s",
                p.ambient, p.gain, p.time_constant
            );
            if let Some((min, max)) = c.output_bounds {
                let plant = ThermalPlant::new(p);
                let (lo, hi) = (plant.steady_state(min), plant.steady_state(max));
                println!(
                    "  Reachable:  [{:.2}, {:.2}] at the output limits",
                    lo.min(hi),
                    lo.max(hi)
                );
            }
        }
        PlantConfig::MassSpringDamper(p) => println!(
            "  Spring-mass m {:.2} kg   c {:.2} N·s/m   k {:.2} N/m",
            p.mass, p.damping, p.stiffness
        ),
    }
    println!();

    println!("  Response (last setpoint segment)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Setpoint:      {:>10.4}     Final value:  {:>10.4}",
        summary.setpoint, summary.final_value
    );
    println!(
        "  Overshoot:     {:>9.2} %     Peak:         {:>10.4}",
        summary.overshoot_pct, summary.peak
    );
    println!(
        "  Rise time:     {:>10}     Settling:     {:>10}",
        fmt_time(summary.rise_time),
        fmt_time(summary.settling_time)
    );
    println!(
        "  SS error:      {:>10.4}     IAE:          {:>10.3}",
        summary.steady_state_error, summary.iae
    );
    println!(
        "  Output range:  [{:.3}, {:.3}]",
        summary.min_output, summary.max_output
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>10}  {:>10}  {:>10}  {:>10}",
        "t (s)", "setpoint", "measured", "output", "error"
    );
    println!("  {}", "─".repeat(56));

    let sample_interval = (samples.len() / 30).max(1);
    for (i, s) in samples.iter().enumerate() {
        let setpoint_changed = i > 0 && samples[i - 1].setpoint != s.setpoint;
        if i % sample_interval != 0 && !setpoint_changed && i != samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.2}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}",
            s.time,
            s.setpoint,
            s.measured,
            s.output,
            s.error()
        );
    }

    println!();
    println!("  Simulation: {} steps, dt={} s", samples.len(), scenario.sim.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        io::csv::write_samples_file(path, &samples).with_context(|| format!("writing {}", path))?;
        println!("  samples written to {}", path);
    }
    if let Some(path) = &args.json {
        io::json::write_summary_file(path, &scenario.name, &summary)
            .with_context(|| format!("writing {}", path))?;
        println!("  summary written to {}", path);
    }

    Ok(())
}

fn fmt_time(t: Option<f64>) -> String {
    match t {
        Some(t) => format!("{:.2} s", t),
        None => "-".into(),
    }
}
