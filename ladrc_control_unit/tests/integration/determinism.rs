//! Identical inputs must give bit-identical telemetry.

use ladrc_common::control::{AdrcParameters, TdVariant, TelemetrySample};
use ladrc_common::plant::PlantConfig;
use ladrc_control_unit::controller::AdrcController;
use ladrc_control_unit::cycle::{CycleRunner, RunLimit, StepSetpoint};
use ladrc_hal::MassDamperPlant;

fn bits(s: &TelemetrySample) -> [u64; 11] {
    [
        s.target.to_bits(),
        s.feedback.to_bits(),
        s.v1.to_bits(),
        s.v2.to_bits(),
        s.x1.to_bits(),
        s.x2.to_bits(),
        s.x3.to_bits(),
        s.u0.to_bits(),
        s.u.to_bits(),
        s.applied.to_bits(),
        s.output.to_bits(),
    ]
}

fn record(params: AdrcParameters) -> Vec<TelemetrySample> {
    let plant = PlantConfig {
        external_force: 3.5,
        ..Default::default()
    };
    let controller = AdrcController::new(params).unwrap();
    let mut runner = CycleRunner::new(controller, MassDamperPlant::new(&plant));
    let setpoint = StepSetpoint {
        initial: 10.0,
        target: -250.0,
        step_tick: 100,
    };
    let mut samples: Vec<TelemetrySample> = Vec::new();
    runner.run(&setpoint, &RunLimit::ticks(800), &mut samples);
    samples
}

#[test]
fn repeated_runs_are_bit_identical() {
    for variant in [TdVariant::Fhan, TdVariant::Linear] {
        let params = AdrcParameters {
            td_variant: variant,
            ..Default::default()
        };
        let a = record(params);
        let b = record(params);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(bits(x), bits(y), "{variant:?} diverged at tick {}", x.tick);
        }
    }
}

#[test]
fn reset_controller_replays_identically() {
    let params = AdrcParameters::default();
    let mut controller = AdrcController::new(params).unwrap();

    let inputs: Vec<(f64, f64)> = (0..500)
        .map(|k| (100.0, (k as f64 * 0.01).sin() * 90.0))
        .collect();

    let first: Vec<u64> = inputs
        .iter()
        .map(|&(t, y)| controller.step(t, y).u.to_bits())
        .collect();
    controller.reset();
    let second: Vec<u64> = inputs
        .iter()
        .map(|&(t, y)| controller.step(t, y).u.to_bits())
        .collect();

    assert_eq!(first, second);
}
