//! # Broadcast Scheduler
//!
//! Runs each [`JobKind`] on its own fixed-rate timer. Timers are independent:
//! jobs share no iteration state and may interleave freely. Every tick's work
//! runs in its own spawned task, so a slow tick does not delay the timer.
//! Ticks of the same job may therefore overlap unless `skip_if_busy` is set,
//! in which case a tick is dropped while the previous one is still running.
//!
//! A failed tick is logged and counted. It never stops its own timer or any
//! other job.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::jobs::{FeedJobs, JobKind};
use crate::config::SchedulerConfig;
use crate::error::{FeedError, FeedResult};

#[derive(Debug, Default)]
struct JobCounters {
    completed: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

/// Per-job tick counters
#[derive(Debug, Default)]
pub struct SchedulerStats {
    jobs: [JobCounters; 4],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStatsSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl SchedulerStats {
    pub fn job(&self, kind: JobKind) -> JobStatsSnapshot {
        let counters = &self.jobs[kind.index()];
        JobStatsSnapshot {
            completed: counters.completed.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            skipped: counters.skipped.load(Ordering::Relaxed),
        }
    }

    fn completed(&self, kind: JobKind) {
        self.jobs[kind.index()].completed.fetch_add(1, Ordering::Relaxed);
    }

    fn failed(&self, kind: JobKind) {
        self.jobs[kind.index()].failed.fetch_add(1, Ordering::Relaxed);
    }

    fn skipped(&self, kind: JobKind) {
        self.jobs[kind.index()].skipped.fetch_add(1, Ordering::Relaxed);
    }
}

struct RunningLoops {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<(JobKind, JoinHandle<()>)>,
}

pub struct BroadcastScheduler {
    scheduler_id: Uuid,
    jobs: Arc<FeedJobs>,
    config: SchedulerConfig,
    simulation_enabled: bool,
    stats: Arc<SchedulerStats>,
    running: Option<RunningLoops>,
}

impl std::fmt::Debug for BroadcastScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastScheduler")
            .field("scheduler_id", &self.scheduler_id)
            .field("config", &self.config)
            .field("simulation_enabled", &self.simulation_enabled)
            .field("is_running", &self.running.is_some())
            .finish()
    }
}

impl BroadcastScheduler {
    pub fn new(jobs: FeedJobs, config: SchedulerConfig, simulation_enabled: bool) -> Self {
        let scheduler_id = Uuid::new_v4();

        info!(
            scheduler_id = %scheduler_id,
            metrics_interval_ms = config.metrics_interval_ms,
            tasks_interval_ms = config.tasks_interval_ms,
            alerts_interval_ms = config.alerts_interval_ms,
            simulation_interval_ms = config.simulation_interval_ms,
            simulation_enabled,
            skip_if_busy = config.skip_if_busy,
            "Creating BroadcastScheduler"
        );

        Self {
            scheduler_id,
            jobs: Arc::new(jobs),
            config,
            simulation_enabled,
            stats: Arc::new(SchedulerStats::default()),
            running: None,
        }
    }

    /// Jobs this scheduler runs, with their periods
    pub fn schedule(&self) -> Vec<(JobKind, Duration)> {
        let mut schedule = vec![
            (JobKind::Metrics, self.config.metrics_interval()),
            (JobKind::Tasks, self.config.tasks_interval()),
            (JobKind::Alerts, self.config.alerts_interval()),
        ];
        if self.simulation_enabled {
            schedule.push((JobKind::Simulation, self.config.simulation_interval()));
        }
        schedule
    }

    /// Spawn one timer loop per job
    pub fn start(&mut self) -> FeedResult<()> {
        if self.running.is_some() {
            warn!(scheduler_id = %self.scheduler_id, "Scheduler already running");
            return Ok(());
        }

        let schedule = self.schedule();
        if let Some((job, _)) = schedule.iter().find(|(_, period)| period.is_zero()) {
            return Err(FeedError::SchedulerError(format!(
                "{job} job has a zero period"
            )));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handles = schedule
            .into_iter()
            .map(|(job, period)| {
                let job_loop = JobLoop {
                    scheduler_id: self.scheduler_id,
                    job,
                    period,
                    skip_if_busy: self.config.skip_if_busy,
                    jobs: Arc::clone(&self.jobs),
                    stats: Arc::clone(&self.stats),
                };
                (job, tokio::spawn(job_loop.run(shutdown_rx.clone())))
            })
            .collect();

        info!(scheduler_id = %self.scheduler_id, "Broadcast scheduler started");
        self.running = Some(RunningLoops {
            shutdown_tx,
            handles,
        });
        Ok(())
    }

    /// Stop scheduling new ticks and wait for in-flight ticks to finish
    pub async fn shutdown(&mut self) -> FeedResult<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        info!(scheduler_id = %self.scheduler_id, "Stopping broadcast scheduler");
        running.shutdown_tx.send_replace(true);

        for (job, handle) in running.handles {
            if let Err(e) = handle.await {
                error!(
                    scheduler_id = %self.scheduler_id,
                    job = %job,
                    error = %e,
                    "Job loop terminated abnormally"
                );
            }
        }

        info!(scheduler_id = %self.scheduler_id, "Broadcast scheduler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn scheduler_id(&self) -> Uuid {
        self.scheduler_id
    }

    pub fn stats(&self) -> Arc<SchedulerStats> {
        Arc::clone(&self.stats)
    }

    pub fn jobs(&self) -> &FeedJobs {
        &self.jobs
    }
}

struct JobLoop {
    scheduler_id: Uuid,
    job: JobKind,
    period: Duration,
    skip_if_busy: bool,
    jobs: Arc<FeedJobs>,
    stats: Arc<SchedulerStats>,
}

impl JobLoop {
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let busy = Arc::new(AtomicBool::new(false));
        let mut in_flight: JoinSet<()> = JoinSet::new();

        debug!(
            scheduler_id = %self.scheduler_id,
            job = %self.job,
            period_ms = self.period.as_millis() as u64,
            "Job loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    if self.skip_if_busy && busy.swap(true, Ordering::AcqRel) {
                        self.stats.skipped(self.job);
                        debug!(job = %self.job, "Previous tick still running, skipping");
                        continue;
                    }
                    in_flight.spawn(self.tick(Arc::clone(&busy)));
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    self.reap(joined, &busy);
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            self.reap(joined, &busy);
        }

        debug!(scheduler_id = %self.scheduler_id, job = %self.job, "Job loop stopped");
    }

    fn tick(&self, busy: Arc<AtomicBool>) -> impl std::future::Future<Output = ()> + Send + 'static {
        let jobs = Arc::clone(&self.jobs);
        let stats = Arc::clone(&self.stats);
        let job = self.job;
        let scheduler_id = self.scheduler_id;
        let skip_if_busy = self.skip_if_busy;

        async move {
            match jobs.run(job).await {
                Ok(_) => stats.completed(job),
                Err(e) => {
                    stats.failed(job);
                    error!(
                        scheduler_id = %scheduler_id,
                        job = %job,
                        error = %e,
                        "Tick failed"
                    );
                }
            }
            if skip_if_busy {
                busy.store(false, Ordering::Release);
            }
        }
    }

    fn reap(&self, joined: Result<(), tokio::task::JoinError>, busy: &AtomicBool) {
        if let Err(e) = joined {
            self.stats.failed(self.job);
            busy.store(false, Ordering::Release);
            error!(
                scheduler_id = %self.scheduler_id,
                job = %self.job,
                error = %e,
                "Tick panicked"
            );
        }
    }
}
