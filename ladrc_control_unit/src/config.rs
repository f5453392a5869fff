//! TOML configuration for the control unit binary.
//!
//! One file holds four sections: `[shared]` (required), `[controller]`,
//! `[plant]` and `[scenario]`. Every section except `[shared]` defaults to
//! the reference scenario.

use std::path::Path;

use ladrc_common::config::{ConfigError, ConfigLoader, SharedConfig};
use ladrc_common::consts::{DEFAULT_REPORT_INTERVAL, DEFAULT_TARGET, DEFAULT_TICKS};
use ladrc_common::control::AdrcParameters;
use ladrc_common::plant::PlantConfig;
use serde::{Deserialize, Serialize};

use crate::controller::AdrcController;
use crate::cycle::{RunLimit, StepSetpoint};

// ─── Scenario ───────────────────────────────────────────────────────

/// Setpoint and run length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Setpoint before `step_tick`.
    #[serde(default)]
    pub initial_target: f64,
    /// Setpoint from `step_tick` onwards.
    #[serde(default = "default_target")]
    pub target: f64,
    /// Tick of the setpoint step.
    #[serde(default)]
    pub step_tick: u64,
    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Stop on the first non-finite controller state.
    #[serde(default = "default_true")]
    pub halt_on_non_finite: bool,
    /// Progress log interval [ticks], 0 disables.
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

fn default_target() -> f64 {
    DEFAULT_TARGET
}

fn default_ticks() -> u64 {
    DEFAULT_TICKS
}

fn default_true() -> bool {
    true
}

fn default_report_interval() -> u64 {
    DEFAULT_REPORT_INTERVAL
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            initial_target: 0.0,
            target: DEFAULT_TARGET,
            step_tick: 0,
            ticks: DEFAULT_TICKS,
            halt_on_non_finite: true,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl ScenarioConfig {
    /// Setpoint shape for the run.
    pub fn setpoint(&self) -> StepSetpoint {
        StepSetpoint {
            initial: self.initial_target,
            target: self.target,
            step_tick: self.step_tick,
        }
    }

    /// Run limit without a stop flag.
    pub fn run_limit(&self) -> RunLimit {
        RunLimit {
            max_ticks: self.ticks,
            running: None,
            halt_on_non_finite: self.halt_on_non_finite,
            report_interval: self.report_interval,
        }
    }

    /// Targets must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("scenario.initial_target", self.initial_target),
            ("scenario.target", self.target),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        Ok(())
    }
}

// ─── Full File ──────────────────────────────────────────────────────

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LadrcConfig {
    /// Service identity and log level.
    pub shared: SharedConfig,
    /// Controller parameters.
    #[serde(default)]
    pub controller: AdrcParameters,
    /// Plant model and actuator.
    #[serde(default)]
    pub plant: PlantConfig,
    /// Setpoint and run length.
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

impl LadrcConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.controller.validate()?;
        self.plant.validate()?;
        self.scenario.validate()?;
        Ok(())
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<LadrcConfig, ConfigError> {
    let config = LadrcConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate an in-memory configuration.
pub fn load_config_from_str(content: &str) -> Result<LadrcConfig, ConfigError> {
    let config = LadrcConfig::from_toml_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Re-read `path` and apply its `[controller]` section to `controller`.
///
/// The whole file is validated first; on any error the controller keeps its
/// active parameters.
pub fn reload_controller(controller: &mut AdrcController, path: &Path) -> Result<(), ConfigError> {
    let shadow = load_config(path)?;
    controller.update_params(shadow.controller)
}

// ─── Tests ──────────────────────────────────────────────────────────
