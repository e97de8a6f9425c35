// incident-backup/src/backup/mod.rs
use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info};

use crate::config::redacted_url;
use crate::errors::Result;
use crate::exec::CommandSpec;
use crate::manager::BackupManager;

/// Paths of the two artifacts produced by one full backup run. The pair is
/// not atomic; the producers run independently and each artifact reflects
/// its own instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullBackup {
    pub database_path: PathBuf,
    pub files_path: PathBuf,
}

impl BackupManager {
    /// Dumps the configured database into `database-<timestamp>.sql` inside
    /// the backup store, then trims old artifacts past the retention cap.
    ///
    /// A failed pg_dump leaves any partially written file in place.
    pub async fn create_database_backup(&self) -> Result<PathBuf> {
        let database_url = self.settings().require_database_url()?.to_string();
        let timestamp = Self::artifact_timestamp(Utc::now());
        let target = self
            .settings()
            .backup_dir
            .join(format!("database-{timestamp}.sql"));

        let spec = CommandSpec::new(
            "pg_dump",
            [
                "-f".to_string(),
                target.to_string_lossy().into_owned(),
                database_url.clone(),
            ],
        );
        if let Err(e) = self.runner().run(&spec).await {
            error!(
                target_path = %target.display(),
                timestamp = %timestamp,
                error = %e,
                "database backup failed"
            );
            return Err(e);
        }

        info!(
            path = %target.display(),
            database = %redacted_url(&database_url),
            "database backup created"
        );
        self.enforce_retention();
        Ok(target)
    }

    /// Archives the upload directory into `files-<timestamp>.tar.gz` inside
    /// the backup store.
    ///
    /// Does not trim the store; retention only runs after database snapshots.
    pub async fn create_file_backup(&self) -> Result<PathBuf> {
        let timestamp = Self::artifact_timestamp(Utc::now());
        let target = self
            .settings()
            .backup_dir
            .join(format!("files-{timestamp}.tar.gz"));

        let spec = CommandSpec::new(
            "tar",
            [
                "-czf".to_string(),
                target.to_string_lossy().into_owned(),
                self.settings().upload_dir.to_string_lossy().into_owned(),
            ],
        );
        if let Err(e) = self.runner().run(&spec).await {
            error!(
                target_path = %target.display(),
                timestamp = %timestamp,
                error = %e,
                "file backup failed"
            );
            return Err(e);
        }

        info!(
            path = %target.display(),
            source = %self.settings().upload_dir.display(),
            "file backup created"
        );
        Ok(target)
    }

    /// Runs both producers concurrently and succeeds only if both succeed.
    /// When one producer fails, the other's artifact is not rolled back and
    /// remains in the store.
    pub async fn create_full_backup(&self) -> Result<FullBackup> {
        let (database, files) =
            tokio::join!(self.create_database_backup(), self.create_file_backup());

        match (database, files) {
            (Ok(database_path), Ok(files_path)) => {
                info!(
                    database = %database_path.display(),
                    files = %files_path.display(),
                    "full backup completed"
                );
                Ok(FullBackup {
                    database_path,
                    files_path,
                })
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "full backup failed");
                Err(e)
            }
        }
    }
}
