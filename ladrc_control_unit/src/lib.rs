//! # LADRC Control Unit Library
//!
//! Discrete-time linear Active Disturbance Rejection Control for
//! single-input/single-output plants. One control tick runs three stages
//! in a fixed order:
//!
//! 1. **TD**: tracking differentiator shapes the setpoint into `v1`, `v2`
//! 2. **LESO**: extended state observer estimates `x1`, `x2` and the
//!    total disturbance `x3`
//! 3. **PD**: `u = (kp·(v1 - x1) - kd·x2 - x3) / b0`
//!
//! The [`cycle::CycleRunner`] couples a controller to a
//! `ladrc_common::plant::PlantAdapter` and runs the fixed-step loop.
//!
//! ## No Hidden State
//!
//! Gains are derived from configuration on every tick. Output history is
//! written into caller-owned [`trace::TraceSink`] buffers; nothing is kept
//! at module level.

pub mod config;
pub mod control;
pub mod controller;
pub mod cycle;
pub mod diagnostics;
pub mod trace;
