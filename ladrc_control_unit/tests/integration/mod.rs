mod control_accuracy;
mod determinism;
mod loop_driver;
