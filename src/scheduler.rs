// src/scheduler.rs

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use tokio::{sync::RwLock, task::JoinHandle};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::daily::{DailyDispatcher, DailyMessage};

const TICK: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct ScheduledJob {
    id: Uuid,
    message: DailyMessage,
    at: NaiveTime,
    enabled: bool,
    last_run: Option<DateTime<Utc>>,
    next_run: DateTime<Utc>,
}

/// Snapshot of a scheduled job.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobStatus {
    pub id: Uuid,
    pub message: DailyMessage,
    /// Daily run time, UTC, `HH:MM`.
    pub at: String,
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: DateTime<Utc>,
}

impl From<&ScheduledJob> for JobStatus {
    fn from(job: &ScheduledJob) -> Self {
        Self {
            id: job.id,
            message: job.message,
            at: job.at.format("%H:%M").to_string(),
            enabled: job.enabled,
            last_run: job.last_run,
            next_run: job.next_run,
        }
    }
}

/// First instant strictly after `now` whose UTC time of day is `at`.
pub fn next_occurrence(at: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

/// Runs daily broadcasts at fixed UTC times.
pub struct Scheduler {
    dispatcher: Arc<DailyDispatcher>,
    jobs: RwLock<Vec<ScheduledJob>>,
}

impl Scheduler {
    pub fn new(dispatcher: Arc<DailyDispatcher>) -> Self {
        Self {
            dispatcher,
            jobs: RwLock::new(Vec::new()),
        }
    }

    /// Adds a daily job and returns its id.
    pub async fn register(&self, message: DailyMessage, at: NaiveTime, enabled: bool) -> Uuid {
        let job = ScheduledJob {
            id: Uuid::new_v4(),
            message,
            at,
            enabled,
            last_run: None,
            next_run: next_occurrence(at, Utc::now()),
        };
        let id = job.id;

        tracing::info!(%id, %message, at = %job.at.format("%H:%M"), "Registered daily job");
        self.jobs.write().await.push(job);
        id
    }

    /// Returns `None` when the id is unknown.
    pub async fn set_enabled(&self, id: Uuid, enabled: bool) -> Option<JobStatus> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.iter_mut().find(|job| job.id == id)?;
        job.enabled = enabled;

        tracing::info!(%id, enabled, "Updated daily job");
        Some(JobStatus::from(&*job))
    }

    pub async fn status(&self) -> Vec<JobStatus> {
        self.jobs.read().await.iter().map(JobStatus::from).collect()
    }

    /// Runs every job that is due at `now` and reschedules it.
    /// Disabled jobs are rescheduled without running. Returns the number of
    /// dispatches attempted.
    pub async fn run_due(&self, now: DateTime<Utc>) -> usize {
        let due: Vec<(Uuid, DailyMessage)> = {
            let mut jobs = self.jobs.write().await;
            jobs.iter_mut()
                .filter(|job| job.next_run <= now)
                .filter_map(|job| {
                    job.next_run = next_occurrence(job.at, now);
                    if job.enabled {
                        Some((job.id, job.message))
                    } else {
                        tracing::debug!(id = %job.id, "Skipping disabled job");
                        None
                    }
                })
                .collect()
        };

        for (id, message) in &due {
            match self.dispatcher.dispatch(*message).await {
                Ok(()) => tracing::info!(%id, %message, "Daily job executed"),
                Err(e) => tracing::error!(%id, %message, "Daily job failed: {}", e),
            }

            let mut jobs = self.jobs.write().await;
            if let Some(job) = jobs.iter_mut().find(|job| job.id == *id) {
                job.last_run = Some(now);
            }
        }

        due.len()
    }

    /// Spawns the background loop.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tracing::info!("Scheduler started");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                interval.tick().await;
                scheduler.run_due(Utc::now()).await;
            }
        })
    }
}
