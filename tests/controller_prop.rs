use proptest::prelude::*;
use pidctrl::{DerivativeMode, InvalidRangeError, PidController};

fn mode() -> impl Strategy<Value = DerivativeMode> {
    prop_oneof![Just(DerivativeMode::OnMeasurement), Just(DerivativeMode::OnError)]
}

proptest! {
    #[test]
    fn output_and_integral_stay_within_bounds(
        gains in (-50.0..50.0f64, -50.0..50.0f64, -50.0..50.0f64),
        (lo, width) in (-100.0..100.0f64, 0.0..200.0f64),
        setpoint in -1e3..1e3f64,
        mode in mode(),
        updates in prop::collection::vec((-1e3..1e3f64, 0.0..5.0f64), 1..60)
    ) {
        let mut pid = PidController::new(gains.0, gains.1, gains.2);
        pid.set_derivative_mode(mode);
        pid.set_output_bounds(lo, lo + width).unwrap();
        pid.set_setpoint(setpoint);

        for (value, dt) in updates {
            let out = pid.update_elapsed(value, dt);
            prop_assert!(out >= lo && out <= lo + width, "output {} outside [{}, {}]", out, lo, lo + width);
            prop_assert!(pid.integral() >= lo && pid.integral() <= lo + width);
        }
    }

    #[test]
    fn p_only_is_gain_times_error(
        kp in -100.0..100.0f64,
        setpoint in -1e4..1e4f64,
        updates in prop::collection::vec((-1e4..1e4f64, 0.001..10.0f64), 1..30)
    ) {
        let mut pid = PidController::new(kp, 0.0, 0.0);
        pid.set_setpoint(setpoint);
        for (value, dt) in updates {
            prop_assert_eq!(pid.update_elapsed(value, dt), kp * (setpoint - value));
        }
    }

    #[test]
    fn inverted_bounds_never_change_state(
        (a, b) in (-1e3..1e3f64, -1e3..1e3f64),
        gap in 1e-6..1e3f64,
    ) {
        let (min, max) = (a.min(b), a.max(b));
        let mut pid = PidController::new(1.0, 1.0, 1.0);
        pid.set_output_bounds(min, max).unwrap();
        let err = pid.set_output_bounds(max + gap, min).unwrap_err();
        prop_assert_eq!(err, InvalidRangeError { min: max + gap, max: min });
        prop_assert_eq!(pid.output_bounds(), (min, max));
    }

    #[test]
    fn same_history_same_output(
        gains in (-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64),
        updates in prop::collection::vec((-100.0..100.0f64, 0.0..2.0f64), 1..40)
    ) {
        let mut a = PidController::new(gains.0, gains.1, gains.2);
        a.set_setpoint(3.0);
        let mut b = a.clone();
        for (value, dt) in updates {
            prop_assert_eq!(a.update_elapsed(value, dt).to_bits(), b.update_elapsed(value, dt).to_bits());
        }
    }
}
