//! Closed-loop accuracy against the mass-damper plant.
//!
//! Reference scenario: `wc=30, b0=1, w0=90, h=0.005, r=100`, unit mass,
//! damping 0.1, actuator limit 1000, step 0 → 400.

use ladrc_common::control::{AdrcParameters, SignAtZero, TdVariant, TelemetrySample};
use ladrc_common::plant::PlantConfig;
use ladrc_control_unit::controller::AdrcController;
use ladrc_control_unit::cycle::{CycleRunner, RunLimit, StepSetpoint, StopReason};
use ladrc_hal::MassDamperPlant;

// ─── Helpers ────────────────────────────────────────────────────────

fn run_scenario(
    params: AdrcParameters,
    plant: PlantConfig,
    target: f64,
    ticks: u64,
) -> Vec<TelemetrySample> {
    let controller = AdrcController::new(params).unwrap();
    let mut runner = CycleRunner::new(controller, MassDamperPlant::new(&plant));
    let mut samples: Vec<TelemetrySample> = Vec::new();
    let report = runner.run(
        &StepSetpoint::constant(target),
        &RunLimit::ticks(ticks),
        &mut samples,
    );
    assert_eq!(report.stop_reason, StopReason::TickLimit);
    assert_eq!(report.first_non_finite, None);
    samples
}

/// Last tick on which the output was outside `±tol·target`, if any.
fn last_outside_band(samples: &[TelemetrySample], target: f64, tol: f64) -> Option<u64> {
    samples
        .iter()
        .filter(|s| (s.output - target).abs() > tol * target.abs())
        .map(|s| s.tick)
        .last()
}

fn max_tail_error(samples: &[TelemetrySample], target: f64, n: usize) -> f64 {
    samples[samples.len() - n..]
        .iter()
        .map(|s| (s.output - target).abs())
        .fold(0.0, f64::max)
}

// ─── Reference scenario ─────────────────────────────────────────────

#[test]
fn reference_step_settles_fhan() {
    let samples = run_scenario(AdrcParameters::default(), PlantConfig::default(), 400.0, 2000);

    let settled = last_outside_band(&samples, 400.0, 0.02).map_or(0, |t| t + 1);
    assert!(settled < 1000, "settled at tick {settled}");
    assert!(max_tail_error(&samples, 400.0, 100) < 1.0);

    // The nonlinear TD approaches the target without noticeable overshoot.
    let peak = samples.iter().map(|s| s.output).fold(f64::MIN, f64::max);
    assert!(peak < 400.0 * 1.02, "peak {peak}");
}

#[test]
fn reference_step_settles_linear_td() {
    let params = AdrcParameters {
        td_variant: TdVariant::Linear,
        ..Default::default()
    };
    let samples = run_scenario(params, PlantConfig::default(), 400.0, 2000);

    let settled = last_outside_band(&samples, 400.0, 0.02).map_or(0, |t| t + 1);
    assert!(settled < 1500, "settled at tick {settled}");
    assert!(max_tail_error(&samples, 400.0, 100) < 1.0);
}

#[test]
fn actuator_saturation_is_reported() {
    let samples = run_scenario(AdrcParameters::default(), PlantConfig::default(), 400.0, 200);
    assert!(samples.iter().any(|s| s.u.abs() > 1000.0));
    assert!(samples.iter().all(|s| s.applied.abs() <= 1000.0));
}

// ─── Disturbance rejection ──────────────────────────────────────────

#[test]
fn constant_external_force_is_estimated_and_rejected() {
    let plant = PlantConfig {
        external_force: -50.0,
        ..Default::default()
    };
    let samples = run_scenario(AdrcParameters::default(), plant, 400.0, 3000);

    let last = samples.last().unwrap();
    assert!((last.x3 + 50.0).abs() < 0.1, "x3 = {}", last.x3);
    assert!(max_tail_error(&samples, 400.0, 100) < 1.0);
}

#[test]
fn double_integrator_leaves_no_disturbance() {
    let plant = PlantConfig {
        damping: 0.0,
        ..Default::default()
    };
    let samples = run_scenario(AdrcParameters::default(), plant, 400.0, 3000);

    for s in &samples[samples.len() - 100..] {
        assert!(s.x3.abs() < 1e-6, "tick {}: x3 = {}", s.tick, s.x3);
    }
    assert!(max_tail_error(&samples, 400.0, 100) < 1.0);
}

// ─── Zero target ────────────────────────────────────────────────────

#[test]
fn zero_target_stays_exactly_at_rest() {
    for params in [
        AdrcParameters {
            td_variant: TdVariant::Linear,
            ..Default::default()
        },
        AdrcParameters {
            sign_at_zero: SignAtZero::Zero,
            ..Default::default()
        },
    ] {
        let samples = run_scenario(params, PlantConfig::default(), 0.0, 1000);
        assert!(
            samples
                .iter()
                .all(|s| s.u == 0.0 && s.x3 == 0.0 && s.output == 0.0),
            "{params:?}"
        );
    }
}

#[test]
fn zero_target_with_positive_sign_stays_bounded() {
    // sign(0) = +1 makes fhan push off the fixed point; the loop must hold it.
    // Measured chatter: |u| <= 3.61, |x| <= 0.205, |y| <= 7.5e-5.
    let samples = run_scenario(AdrcParameters::default(), PlantConfig::default(), 0.0, 1000);
    for s in &samples {
        assert!(s.u.abs() < 4.0, "tick {}: u = {}", s.tick, s.u);
        for (name, x) in [("x1", s.x1), ("x2", s.x2), ("x3", s.x3)] {
            assert!(x.abs() < 0.25, "tick {}: {name} = {x}", s.tick);
        }
        assert!(s.output.abs() < 1e-4, "tick {}: y = {}", s.tick, s.output);
    }
}
