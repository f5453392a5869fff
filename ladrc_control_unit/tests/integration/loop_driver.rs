//! Loop driver termination and feedback routing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ladrc_common::control::{AdrcParameters, FeedbackSource, TelemetrySample};
use ladrc_common::plant::{PlantAdapter, PlantConfig};
use ladrc_control_unit::controller::AdrcController;
use ladrc_control_unit::cycle::{CycleRunner, RunLimit, StepSetpoint, StopReason};
use ladrc_control_unit::diagnostics::NonFiniteState;
use ladrc_control_unit::trace::{JsonLinesSink, NullSink, TrackingErrorWindow};
use ladrc_hal::{MassDamperPlant, PlantRegistry};

// ─── Helpers ────────────────────────────────────────────────────────

/// Integrator that returns NaN from its `fail_at`-th advance onwards and
/// clears `running` after `stop_after` advances.
struct ScriptedPlant {
    x: f64,
    advances: u64,
    fail_at: Option<u64>,
    stop_after: Option<(u64, Arc<AtomicBool>)>,
}

impl ScriptedPlant {
    fn new() -> Self {
        Self {
            x: 0.0,
            advances: 0,
            fail_at: None,
            stop_after: None,
        }
    }
}

impl PlantAdapter for ScriptedPlant {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn advance(&mut self, command: f64, dt: f64) -> f64 {
        self.advances += 1;
        if let Some((n, ref running)) = self.stop_after {
            if self.advances == n {
                running.store(false, Ordering::SeqCst);
            }
        }
        if self.fail_at.is_some_and(|n| self.advances >= n) {
            return f64::NAN;
        }
        self.x += command * dt;
        self.x
    }
}

fn controller() -> AdrcController {
    AdrcController::new(AdrcParameters::default()).unwrap()
}

// ─── Termination ────────────────────────────────────────────────────

#[test]
fn cleared_flag_stops_before_first_tick() {
    let mut runner = CycleRunner::new(controller(), ScriptedPlant::new());
    let limit = RunLimit {
        max_ticks: 100,
        running: Some(Arc::new(AtomicBool::new(false))),
        ..Default::default()
    };
    let report = runner.run(&StepSetpoint::constant(1.0), &limit, NullSink);
    assert_eq!(report.ticks, 0);
    assert_eq!(report.stop_reason, StopReason::StopRequested);
    assert_eq!(runner.plant().advances, 0);
}

#[test]
fn flag_cleared_mid_run_stops_at_next_tick() {
    let running = Arc::new(AtomicBool::new(true));
    let mut plant = ScriptedPlant::new();
    plant.stop_after = Some((10, running.clone()));

    let mut runner = CycleRunner::new(controller(), plant);
    let limit = RunLimit {
        max_ticks: 1000,
        running: Some(running),
        ..Default::default()
    };
    let mut samples: Vec<TelemetrySample> = Vec::new();
    let report = runner.run(&StepSetpoint::constant(1.0), &limit, &mut samples);
    assert_eq!(report.ticks, 10);
    assert_eq!(report.stop_reason, StopReason::StopRequested);
    assert_eq!(samples.len(), 10);
}

#[test]
fn unbounded_run_streams_with_constant_memory() {
    let running = Arc::new(AtomicBool::new(true));
    let mut plant = ScriptedPlant::new();
    plant.stop_after = Some((250, running.clone()));

    let mut runner = CycleRunner::new(controller(), plant);
    let limit = RunLimit {
        max_ticks: u64::MAX,
        running: Some(running),
        ..Default::default()
    };
    let mut window = TrackingErrorWindow::<16>::new();
    let mut trace = JsonLinesSink::new(Vec::new());
    let report = runner.run(
        &StepSetpoint::constant(1.0),
        &limit,
        (&mut window, &mut trace),
    );
    assert_eq!(report.ticks, 250);
    assert_eq!(report.stop_reason, StopReason::StopRequested);
    assert_eq!(window.len(), 16);
    assert_eq!(trace.written(), 250);

    let text = String::from_utf8(trace.finish().unwrap()).unwrap();
    let last: TelemetrySample = serde_json::from_str(text.lines().last().unwrap()).unwrap();
    assert_eq!(last.tick, 249);
    assert!((last.output - report.final_output).abs() < 1e-9);
}

#[test]
fn fixed_capacity_sink_stops_when_full() {
    let mut runner = CycleRunner::new(controller(), ScriptedPlant::new());
    let mut samples: heapless::Vec<TelemetrySample, 64> = heapless::Vec::new();
    let report = runner.run(
        &StepSetpoint::constant(1.0),
        &RunLimit::ticks(1000),
        &mut samples,
    );
    assert_eq!(report.ticks, 64);
    assert_eq!(report.stop_reason, StopReason::SinkFull);
    assert_eq!(samples.len(), 64);
    assert_eq!(samples[63].tick, 63);
    assert_eq!(runner.plant().advances, 64);
}

#[test]
fn non_finite_measurement_halts_run() {
    let mut plant = ScriptedPlant::new();
    plant.fail_at = Some(5);

    let mut runner = CycleRunner::new(controller(), plant);
    let limit = RunLimit {
        max_ticks: 100,
        halt_on_non_finite: true,
        ..Default::default()
    };
    let mut samples: Vec<TelemetrySample> = Vec::new();
    let report = runner.run(&StepSetpoint::constant(1.0), &limit, &mut samples);

    // The 5th advance (tick 4) returns NaN; the observer sees it on tick 5.
    let event = report.first_non_finite.unwrap();
    assert_eq!(event.tick, 5);
    assert!(event.states.contains(NonFiniteState::X1 | NonFiniteState::U));
    assert_eq!(report.stop_reason, StopReason::NonFinite);
    assert_eq!(report.ticks, 6);
    assert!(samples[4].output.is_nan());
    assert!(samples[4].u.is_finite());
}

#[test]
fn non_finite_without_halt_runs_to_limit() {
    let mut plant = ScriptedPlant::new();
    plant.fail_at = Some(5);

    let mut runner = CycleRunner::new(controller(), plant);
    let report = runner.run(&StepSetpoint::constant(1.0), &RunLimit::ticks(20), NullSink);
    assert_eq!(report.ticks, 20);
    assert_eq!(report.stop_reason, StopReason::TickLimit);
    assert_eq!(report.first_non_finite.map(|e| e.tick), Some(5));
}

// ─── Feedback routing ───────────────────────────────────────────────

#[test]
fn self_sensing_feeds_back_applied_command() {
    let params = AdrcParameters {
        feedback: FeedbackSource::ControlCommand,
        ..Default::default()
    };
    let controller = AdrcController::new(params).unwrap();
    let plant = MassDamperPlant::new(&PlantConfig::default());
    let mut runner = CycleRunner::new(controller, plant);

    let mut samples: Vec<TelemetrySample> = Vec::new();
    runner.run(&StepSetpoint::constant(50.0), &RunLimit::ticks(20), &mut samples);

    assert_eq!(samples[0].feedback, 0.0);
    for w in samples.windows(2) {
        assert_eq!(w[1].feedback, w[0].applied);
    }
}

#[test]
fn saturation_counted_in_stats() {
    let mut runner = CycleRunner::new(controller(), MassDamperPlant::new(&PlantConfig::default()));
    runner.run(&StepSetpoint::constant(400.0), &RunLimit::ticks(200), NullSink);

    let stats = runner.stats();
    assert_eq!(stats.ticks, 200);
    assert!(stats.saturated_ticks > 0);
    assert!(stats.max_abs_command > 1000.0);
}

#[test]
fn registry_built_plant_drives_runner() {
    let registry = PlantRegistry::with_builtin_plants();
    let plant = registry.create_plant(&PlantConfig::default()).unwrap();
    let mut runner = CycleRunner::new(controller(), plant);

    let mut samples: Vec<TelemetrySample> = Vec::new();
    let report = runner.run(&StepSetpoint::constant(400.0), &RunLimit::ticks(1500), &mut samples);
    assert_eq!(report.stop_reason, StopReason::TickLimit);
    assert!((report.final_output - 400.0).abs() < 1.0);
    assert_eq!(report.final_output, samples[1499].output);
}
