//! # Feed Services
//!
//! Query and mutation entry points over the stores, plus the summaries the
//! scheduler publishes and the startup seeder.

pub mod alert_service;
pub mod metrics_service;
pub mod seeder;
pub mod summary;
pub mod task_service;

pub use alert_service::{AlertService, ResolveOutcome};
pub use metrics_service::MetricsService;
pub use seeder::{DataSeeder, SeedReport};
pub use summary::{AlertSummary, StatusSummarizer, TaskStatusSummary};
pub use task_service::{TaskService, TaskUpdateOutcome};
