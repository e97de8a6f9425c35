//! Backup and restore manager for the incident platform.
//!
//! Produces point-in-time snapshots of the primary database and of uploaded
//! file content, enforces a retention cap over the backup store, restores
//! either artifact kind, and can run unattended on a fixed schedule. All
//! external tools (pg_dump, psql, tar) are reached through the
//! [`exec::CommandRunner`] seam.
//!
//! Known limitation: the database snapshot and the file archive of one full
//! backup are produced independently and never represent the same logical
//! instant.

pub mod backup;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod exec;
pub mod manager;
pub mod restore;
pub mod scheduler;

pub use backup::FullBackup;
pub use config::BackupSettings;
pub use errors::{AppError, Result};
pub use exec::{CommandRunner, CommandSpec, SystemRunner};
pub use manager::BackupManager;
pub use scheduler::{SchedulerHandle, schedule};
