//! Periodic aggregation and broadcast.

pub mod broadcast_scheduler;
pub mod jobs;

pub use broadcast_scheduler::{BroadcastScheduler, JobStatsSnapshot, SchedulerStats};
pub use jobs::{FeedJobs, JobKind, TickReport};
