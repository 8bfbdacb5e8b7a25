//! Storage collaborators: traits plus in-memory implementations.

pub mod in_memory;
pub mod traits;

pub use in_memory::{InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore};
pub use traits::{AlertStore, MetricStore, TaskStore};
