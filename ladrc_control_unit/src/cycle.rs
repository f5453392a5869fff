//! Fixed-step loop driver: controller → plant → feedback.
//!
//! ## Tick Order
//! 1. Controller step with the current target and feedback (TD, LESO, PD).
//! 2. Plant `advance(u, h)`; the plant saturates the command.
//! 3. The saturated command is committed back to the controller.
//! 4. The next feedback is selected per `FeedbackSource`.
//!
//! ## Run Termination
//! A run stops on the first of: tick limit reached, stop flag cleared,
//! sink full, or (optionally) the first non-finite controller state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ladrc_common::control::{ControlOutput, FeedbackSource, TelemetrySample};
use ladrc_common::plant::PlantAdapter;
use tracing::{debug, info, trace};

use crate::controller::AdrcController;
use crate::diagnostics::NonFiniteEvent;
use crate::trace::TraceSink;

// ─── Setpoint ───────────────────────────────────────────────────────

/// Single step setpoint: `initial` before `step_tick`, `target` from then on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSetpoint {
    /// Value before the step.
    pub initial: f64,
    /// Value from `step_tick` onwards.
    pub target: f64,
    /// Tick on which the step happens.
    pub step_tick: u64,
}

impl StepSetpoint {
    /// Constant setpoint.
    pub const fn constant(value: f64) -> Self {
        Self {
            initial: value,
            target: value,
            step_tick: 0,
        }
    }

    /// Setpoint at `tick`.
    #[inline]
    pub fn at(&self, tick: u64) -> f64 {
        if tick < self.step_tick {
            self.initial
        } else {
            self.target
        }
    }
}

// ─── Run Control ────────────────────────────────────────────────────

/// Termination conditions for [`CycleRunner::run`].
#[derive(Debug, Clone, Default)]
pub struct RunLimit {
    /// Stop after this many ticks.
    pub max_ticks: u64,
    /// External stop flag; the run stops once it reads `false`.
    pub running: Option<Arc<AtomicBool>>,
    /// Stop on the first non-finite controller state.
    pub halt_on_non_finite: bool,
    /// Emit a `debug!` progress line every this many ticks (0 = never).
    pub report_interval: u64,
}

impl RunLimit {
    /// Run exactly `max_ticks` ticks unless the sink fills up.
    pub fn ticks(max_ticks: u64) -> Self {
        Self {
            max_ticks,
            ..Default::default()
        }
    }

    #[inline]
    fn stop_requested(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.load(Ordering::SeqCst))
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_ticks` reached.
    TickLimit,
    /// Stop flag cleared.
    StopRequested,
    /// A controller state became non-finite.
    NonFinite,
    /// The trace sink refused a sample.
    SinkFull,
}

// ─── Statistics ─────────────────────────────────────────────────────

/// O(1) per-tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleStats {
    /// Ticks executed by this runner.
    pub ticks: u64,
    /// Ticks on which the actuator clipped the command.
    pub saturated_ticks: u64,
    /// Largest `|u|` seen, before saturation.
    pub max_abs_command: f64,
}

impl CycleStats {
    /// Record one tick.
    #[inline]
    pub fn record(&mut self, command: f64, applied: f64) {
        self.ticks += 1;
        if command.is_finite() && applied != command {
            self.saturated_ticks += 1;
        }
        if command.abs() > self.max_abs_command {
            self.max_abs_command = command.abs();
        }
    }
}

/// Summary of one [`CycleRunner::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Ticks executed in this run.
    pub ticks: u64,
    /// Why the run ended.
    pub stop_reason: StopReason,
    /// First non-finite controller state, if any.
    pub first_non_finite: Option<NonFiniteEvent>,
    /// Plant output after the last tick.
    pub final_output: f64,
}

// ─── CycleRunner ────────────────────────────────────────────────────

/// Couples one controller to one plant.
pub struct CycleRunner<P: PlantAdapter> {
    controller: AdrcController,
    plant: P,
    /// Observer input for the next tick.
    feedback: f64,
    /// Plant output after the last tick.
    output: f64,
    stats: CycleStats,
}

impl<P: PlantAdapter> CycleRunner<P> {
    /// Plant and controller are expected to be at rest with output 0.
    pub fn new(controller: AdrcController, plant: P) -> Self {
        Self {
            controller,
            plant,
            feedback: 0.0,
            output: 0.0,
            stats: CycleStats::default(),
        }
    }

    /// Execute one tick towards `target`.
    pub fn tick(&mut self, target: f64) -> TelemetrySample {
        let tick = self.controller.tick();
        let feedback = self.feedback;
        let h = self.controller.params().h;

        let ControlOutput { u0, u } = self.controller.step(target, feedback);
        self.output = self.plant.advance(u, h);
        let applied = self.plant.applied_command().unwrap_or(u);
        self.controller.commit_applied(applied);

        self.feedback = match self.controller.params().feedback {
            FeedbackSource::Measurement => self.output,
            FeedbackSource::ControlCommand => applied,
        };
        self.stats.record(u, applied);

        let td = self.controller.td();
        let leso = self.controller.leso();
        trace!(tick, target, u, applied, output = self.output, "tick");

        TelemetrySample {
            tick,
            target,
            feedback,
            v1: td.v1(),
            v2: td.v2(),
            x1: leso.x1(),
            x2: leso.x2(),
            x3: leso.x3(),
            u0,
            u,
            applied,
            output: self.output,
        }
    }

    /// Run until a condition in `limit` is met, pushing every sample into
    /// `sink`.
    pub fn run<S: TraceSink>(
        &mut self,
        setpoint: &StepSetpoint,
        limit: &RunLimit,
        mut sink: S,
    ) -> CycleReport {
        info!(
            plant = self.plant.name(),
            max_ticks = limit.max_ticks,
            target = setpoint.target,
            "Run started"
        );

        let mut ticks = 0u64;
        let stop_reason = loop {
            if ticks >= limit.max_ticks {
                break StopReason::TickLimit;
            }
            if limit.stop_requested() {
                break StopReason::StopRequested;
            }
            if sink.is_full() {
                break StopReason::SinkFull;
            }

            let target = setpoint.at(self.controller.tick());
            let sample = self.tick(target);
            ticks += 1;

            if limit.report_interval > 0 && ticks % limit.report_interval == 0 {
                debug!(
                    tick = sample.tick,
                    target,
                    output = sample.output,
                    u = sample.u,
                    x3 = sample.x3,
                    "progress"
                );
            }

            if !sink.push(sample) {
                break StopReason::SinkFull;
            }
            if limit.halt_on_non_finite && self.controller.first_non_finite().is_some() {
                break StopReason::NonFinite;
            }
        };

        let report = CycleReport {
            ticks,
            stop_reason,
            first_non_finite: self.controller.first_non_finite(),
            final_output: self.output,
        };
        info!(
            ticks,
            stop_reason = ?stop_reason,
            final_output = self.output,
            saturated_ticks = self.stats.saturated_ticks,
            "Run finished"
        );
        report
    }

    /// The controller.
    pub fn controller(&self) -> &AdrcController {
        &self.controller
    }

    /// Mutable controller access, e.g. for parameter reloads between runs.
    pub fn controller_mut(&mut self) -> &mut AdrcController {
        &mut self.controller
    }

    /// The plant.
    pub fn plant(&self) -> &P {
        &self.plant
    }

    /// Mutable plant access, e.g. for disturbance injection.
    pub fn plant_mut(&mut self) -> &mut P {
        &mut self.plant
    }

    /// Counters since construction.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
