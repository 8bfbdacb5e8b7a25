//! Synthetic workload generation.

pub mod catalog;
pub mod engine;
pub mod random;

pub use engine::{
    draw_alert, draw_metric, draw_severity, draw_task, severity_for_draw, SimulatedEvents,
    SimulationEngine,
};
pub use random::{RandomSource, StdRandom};
