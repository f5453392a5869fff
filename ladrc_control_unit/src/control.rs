//! Control engine root.
//!
//! Linear ADRC: TD + LESO + PD with disturbance cancellation.
//! Every stage is a free function over its own state struct; [`output`]
//! composes them into one tick.

pub mod leso;
pub mod output;
pub mod pd;
pub mod td;
