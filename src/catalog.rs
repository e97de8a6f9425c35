// incident-backup/src/catalog.rs
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{error, info, warn};

use crate::manager::BackupManager;

pub const DATABASE_SUFFIX: &str = ".sql";
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// One recognized artifact in the backup store.
#[derive(Debug, Clone)]
struct CatalogEntry {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

fn is_backup_artifact(name: &str) -> bool {
    name.ends_with(DATABASE_SUFFIX) || name.ends_with(ARCHIVE_SUFFIX)
}

impl BackupManager {
    /// Names of all artifacts currently in the backup store, in whatever
    /// order the filesystem enumerates them. Never fails: an unreadable
    /// store is logged and yields an empty list.
    pub fn list_backups(&self) -> Vec<String> {
        match self.collect_entries() {
            Ok(entries) => entries.into_iter().map(|e| e.name).collect(),
            Err(e) => {
                warn!(
                    dir = %self.settings().backup_dir.display(),
                    error = %e,
                    "failed to enumerate backup store"
                );
                Vec::new()
            }
        }
    }

    fn collect_entries(&self) -> std::io::Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.settings().backup_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_backup_artifact(&name) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            entries.push(CatalogEntry {
                path: entry.path(),
                name,
                modified,
            });
        }
        Ok(entries)
    }

    /// Deletes the oldest artifacts beyond the retention cap. The cap covers
    /// the combined count of database snapshots and file archives, so a run
    /// of database backups can evict older file archives.
    ///
    /// Failures are terminal for this pass only: an enumeration error skips
    /// the pass, a deletion error aborts it, and neither reaches the caller.
    pub fn enforce_retention(&self) {
        let mut entries = match self.collect_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    dir = %self.settings().backup_dir.display(),
                    error = %e,
                    "retention pass skipped: cannot enumerate backup store"
                );
                return;
            }
        };

        let cap = self.settings().max_backups;
        if entries.len() <= cap {
            return;
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        for stale in &entries[cap..] {
            if let Err(e) = fs::remove_file(&stale.path) {
                error!(
                    path = %stale.path.display(),
                    error = %e,
                    "failed to delete expired backup, aborting retention pass"
                );
                return;
            }
            info!(path = %stale.path.display(), "deleted expired backup");
        }
    }
}
