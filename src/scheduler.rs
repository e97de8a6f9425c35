// incident-backup/src/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info};

use crate::manager::BackupManager;

/// Handle over the recurring backup task. Dropping it leaves the task
/// running; call [`SchedulerHandle::stop`] to shut it down during teardown.
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Performs one full backup immediately, then repeats every
/// `interval_hours` until the handle is stopped or the process exits.
///
/// Every run's outcome, including the initial one, is only observable in the
/// log: failures never stop the schedule and never reach the caller. There
/// is no overlap guard; a run slower than the interval can overlap the next
/// tick.
pub async fn schedule(manager: Arc<BackupManager>, interval_hours: u64) -> SchedulerHandle {
    info!(interval_hours, "starting backup schedule");
    schedule_every(manager, Duration::from_secs(interval_hours * 3600)).await
}

pub async fn schedule_every(manager: Arc<BackupManager>, period: Duration) -> SchedulerHandle {
    run_scheduled_backup(&manager).await;

    let task = tokio::spawn(async move {
        loop {
            sleep(period).await;
            run_scheduled_backup(&manager).await;
        }
    });
    SchedulerHandle { task }
}

async fn run_scheduled_backup(manager: &BackupManager) {
    match manager.create_full_backup().await {
        Ok(full) => info!(
            database = %full.database_path.display(),
            files = %full.files_path.display(),
            "scheduled backup completed"
        ),
        Err(e) => error!(error = %e, "scheduled backup failed"),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::time::advance;

    use super::*;
    use crate::errors::Result;
    use crate::exec::testing::RecordingRunner;
    use crate::manager::tests::test_settings;

    fn manager_with(tmp: &TempDir, runner: Arc<RecordingRunner>) -> Arc<BackupManager> {
        let settings = test_settings(tmp.path().join("backups"), tmp.path().join("uploads"));
        Arc::new(BackupManager::new(settings, runner).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_backup_runs_before_handle_returns() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::new());
        let manager = manager_with(&tmp, Arc::clone(&runner));

        let handle = schedule_every(Arc::clone(&manager), Duration::from_secs(3600)).await;

        // Both producers ran without waiting for the first tick.
        let mut programs = runner.programs();
        programs.sort();
        assert_eq!(programs, vec!["pg_dump", "tar"]);

        let names = manager.list_backups();
        assert!(names.iter().any(|n| n.starts_with("database-")));
        assert!(names.iter().any(|n| n.starts_with("files-")));

        handle.stop();
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_repeat_after_failed_runs() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::failing(&["pg_dump"]));
        let manager = manager_with(&tmp, Arc::clone(&runner));
        let period = Duration::from_secs(600);

        let handle = schedule_every(manager, period).await;
        let after_initial = runner.call_count();
        assert!(after_initial > 0);

        // Let the timer task register its first sleep before moving the clock.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        for _ in 0..2 {
            advance(period).await;
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
        }

        // Two more ticks fired even though every run failed.
        assert!(runner.call_count() >= after_initial + 4);
        assert!(!handle.is_finished());
        handle.stop();
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::new());
        let manager = manager_with(&tmp, Arc::clone(&runner));
        let period = Duration::from_secs(600);

        let handle = schedule_every(manager, period).await;
        let after_initial = runner.call_count();
        handle.stop();
        tokio::task::yield_now().await;

        advance(period * 3).await;
        tokio::task::yield_now().await;
        assert_eq!(runner.call_count(), after_initial);
        Ok(())
    }
}
