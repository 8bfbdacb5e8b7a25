#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Opsfeed Core
//!
//! Periodic aggregation-and-broadcast engine behind a live operations
//! dashboard.
//!
//! ## Overview
//!
//! Independent timers read server metrics, background tasks and alerts from
//! pluggable stores, derive views from them (windowed health, status
//! summaries) and publish those views on named topics. A simulation job keeps
//! the feed moving by manufacturing plausible new records.
//!
//! ## Module Organization
//!
//! - [`models`] - metric samples, tasks and alerts
//! - [`state_machine`] - task status transitions driven by progress
//! - [`health`] - windowed health classification
//! - [`stores`] - storage traits and in-memory implementations
//! - [`simulation`] - weighted random generation behind an injected source
//! - [`services`] - queries, mutations, summaries and startup seeding
//! - [`events`] - topics and the broadcast publisher
//! - [`scheduler`] - the periodic jobs and their timers
//! - [`config`] - layered configuration
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opsfeed_core::config::FeedConfig;
//! use opsfeed_core::system::FeedSystem;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let system = FeedSystem::in_memory(&FeedConfig::default());
//! system.seeder().seed().await?;
//!
//! let mut events = system.publisher.subscribe();
//! let mut scheduler = system.scheduler();
//! scheduler.start()?;
//!
//! let event = events.recv().await?;
//! println!("{} -> {}", event.topic, event.payload);
//!
//! scheduler.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod health;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod simulation;
pub mod state_machine;
pub mod stores;
pub mod system;

pub use config::{ConfigManager, FeedConfig};
pub use error::{FeedError, FeedResult};
pub use events::{EventPublisher, PublishedEvent, Topic, TopicPublisher};
pub use health::{HealthClassifier, HealthState, HealthStatus, HealthThresholds};
pub use models::{Alert, AlertSeverity, MetricSample, Task};
pub use scheduler::{BroadcastScheduler, FeedJobs, JobKind, TickReport};
pub use services::{
    AlertService, AlertSummary, DataSeeder, MetricsService, ResolveOutcome, StatusSummarizer,
    TaskService, TaskStatusSummary, TaskUpdateOutcome,
};
pub use simulation::{RandomSource, SimulationEngine, StdRandom};
pub use state_machine::{TaskEvent, TaskStateMachine, TaskStatus, TaskTransition};
pub use system::FeedSystem;
