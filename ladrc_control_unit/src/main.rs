//! # LADRC Control Unit
//!
//! Runs one ADRC channel against a simulated plant for a configured step
//! scenario and reports how well the output settled.
//!
//! Without `--config` the reference scenario is used: `wc=30, b0=1, w0=90,
//! h=0.005, r=100`, unit mass, damping 0.1, actuator limit 1000, step
//! 0 → 400.

use clap::Parser;
use ladrc_common::config::{ConfigError, LogLevel};
use ladrc_control_unit::config::{LadrcConfig, load_config};
use ladrc_control_unit::controller::AdrcController;
use ladrc_control_unit::cycle::{CycleRunner, StopReason};
use ladrc_control_unit::trace::{JsonLinesSink, TrackingErrorWindow};
use ladrc_hal::PlantRegistry;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Samples at the end of a run used for the steady-state error.
const STEADY_STATE_WINDOW: usize = 100;

/// LADRC Control Unit: step response of one ADRC channel
#[derive(Parser, Debug)]
#[command(name = "ladrc_control_unit")]
#[command(version)]
#[command(about = "Linear ADRC step-response runner against a simulated plant")]
struct Args {
    /// Path to the TOML configuration. Reference scenario if omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override `scenario.ticks`.
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Override `scenario.target`.
    #[arg(long, value_name = "T", allow_negative_numbers = true)]
    target: Option<f64>,

    /// Write per-tick telemetry as JSON lines.
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // The log level lives in the config, so load it before tracing is up.
    let config = load(&args);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("LADRC Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|c| run(&args, c));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("LADRC Control Unit finished");
}

fn load(args: &Args) -> Result<LadrcConfig, ConfigError> {
    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => LadrcConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.scenario.ticks = ticks;
    }
    if let Some(target) = args.target {
        config.scenario.target = target;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: LadrcConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.shared.service_name,
        wc = config.controller.wc,
        b0 = config.controller.b0,
        w0 = config.controller.w0,
        r = config.controller.r,
        h = config.controller.h,
        td_variant = ?config.controller.td_variant,
        feedback = ?config.controller.feedback,
        "Config OK"
    );

    let registry = PlantRegistry::with_builtin_plants();
    debug!("Registered plant models: {:?}", registry.list_plants());
    let plant = registry.create_plant(&config.plant)?;
    let controller = AdrcController::new(config.controller)?;
    let mut runner = CycleRunner::new(controller, plant);

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut limit = config.scenario.run_limit();
    limit.running = Some(running);

    // Memory stays constant however long the run is.
    let setpoint = config.scenario.setpoint();
    let mut window = TrackingErrorWindow::<STEADY_STATE_WINDOW>::new();
    let report = match args.trace.as_deref() {
        Some(path) => {
            let mut trace = JsonLinesSink::new(BufWriter::new(File::create(path)?));
            let report = runner.run(&setpoint, &limit, (&mut window, &mut trace));
            let written = trace.written();
            trace.finish()?;
            info!("Trace written to {} ({} samples)", path.display(), written);
            report
        }
        None => runner.run(&setpoint, &limit, &mut window),
    };

    let stats = runner.stats();
    info!(
        ticks = report.ticks,
        stop_reason = ?report.stop_reason,
        final_output = report.final_output,
        steady_state_error = window.max_error(),
        saturated_ticks = stats.saturated_ticks,
        max_abs_command = stats.max_abs_command,
        "Summary"
    );

    match report.stop_reason {
        StopReason::NonFinite => {
            let event = report.first_non_finite.map(|e| (e.tick, e.states));
            Err(format!("controller state became non-finite: {event:?}").into())
        }
        StopReason::StopRequested => {
            warn!("Run interrupted after {} ticks", report.ticks);
            Ok(())
        }
        StopReason::TickLimit | StopReason::SinkFull => Ok(()),
    }
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
