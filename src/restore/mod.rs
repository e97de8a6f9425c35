// incident-backup/src/restore/mod.rs
use std::path::Path;

use tracing::{error, info};

use crate::config::redacted_url;
use crate::errors::Result;
use crate::exec::CommandSpec;
use crate::manager::BackupManager;

impl BackupManager {
    /// Replays a database snapshot into the configured database with psql.
    ///
    /// The artifact is not validated up front; a missing or malformed file
    /// surfaces as a psql failure. Restoring is destructive and there is no
    /// automatic pre-restore snapshot.
    pub async fn restore_database(&self, artifact: &Path) -> Result<()> {
        let database_url = self.settings().require_database_url()?.to_string();

        let spec = CommandSpec::new(
            "psql",
            [
                "-X".to_string(),
                "-q".to_string(),
                "-v".to_string(),
                "ON_ERROR_STOP=1".to_string(),
                "-d".to_string(),
                database_url.clone(),
                "-f".to_string(),
                artifact.to_string_lossy().into_owned(),
            ],
        );
        if let Err(e) = self.runner().run(&spec).await {
            error!(
                artifact = %artifact.display(),
                error = %e,
                "database restore failed"
            );
            return Err(e);
        }

        info!(
            artifact = %artifact.display(),
            database = %redacted_url(&database_url),
            "database restored"
        );
        Ok(())
    }

    /// Unpacks a file archive into the current working directory. Existing
    /// files are overwritten according to tar's own semantics; the
    /// destination is not cleared first.
    pub async fn restore_files(&self, artifact: &Path) -> Result<()> {
        let spec = CommandSpec::new(
            "tar",
            [
                "-xzf".to_string(),
                artifact.to_string_lossy().into_owned(),
            ],
        );
        if let Err(e) = self.runner().run(&spec).await {
            error!(
                artifact = %artifact.display(),
                error = %e,
                "file restore failed"
            );
            return Err(e);
        }

        info!(artifact = %artifact.display(), "file archive extracted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::errors::AppError;
    use crate::exec::testing::RecordingRunner;
    use crate::manager::tests::test_settings;

    fn manager_with(tmp: &TempDir, runner: Arc<RecordingRunner>) -> BackupManager {
        let settings = test_settings(tmp.path().join("backups"), tmp.path().join("uploads"));
        BackupManager::new(settings, runner).unwrap()
    }

    #[tokio::test]
    async fn test_restore_database_invokes_psql_with_artifact() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::new());
        let manager = manager_with(&tmp, Arc::clone(&runner));
        let artifact = PathBuf::from("backups/database-2025-08-25T10-00-00Z.sql");

        manager.restore_database(&artifact).await?;

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "psql");
        assert!(calls[0].args.contains(&"ON_ERROR_STOP=1".to_string()));
        assert!(
            calls[0]
                .args
                .contains(&artifact.to_string_lossy().into_owned())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_database_requires_connection_string() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::new());
        let mut settings = test_settings(tmp.path().join("backups"), tmp.path().join("uploads"));
        settings.database_url = None;
        let manager = BackupManager::new(settings, runner.clone())?;

        match manager.restore_database(Path::new("whatever.sql")).await {
            Err(AppError::Config(_)) => {}
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert_eq!(runner.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_database_failure_propagates() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::failing(&["psql"]));
        let manager = manager_with(&tmp, runner);

        let err = manager
            .restore_database(Path::new("backups/missing.sql"))
            .await
            .unwrap_err();
        assert!(err.is_process_failure());
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_files_extracts_with_tar() -> Result<()> {
        let tmp = TempDir::new()?;
        let runner = Arc::new(RecordingRunner::new());
        let manager = manager_with(&tmp, Arc::clone(&runner));
        let artifact = PathBuf::from("backups/files-2025-08-25T10-00-00Z.tar.gz");

        manager.restore_files(&artifact).await?;

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "tar");
        assert_eq!(calls[0].args[0], "-xzf");
        Ok(())
    }
}
