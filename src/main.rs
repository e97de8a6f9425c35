//! Backup/Restore Manager CLI
//!
//! Operator interface over the backup subsystem: one-off backups, restores,
//! catalog listing, and the unattended schedule.

// incident-backup/src/main.rs
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use incident_backup::{BackupManager, BackupSettings, SystemRunner, scheduler};
use tracing::Level;

/// Main entry point for the backup/restore manager
#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    // Expects config.json next to the executable, or the project root when
    // running with `cargo run`. Absent file falls back to env + defaults.
    let config_path = PathBuf::from("config.json");
    let settings = BackupSettings::load(&config_path).context(format!(
        "Failed to load backup configuration from {}",
        config_path.display()
    ))?;
    let manager = Arc::new(
        BackupManager::new(settings, Arc::new(SystemRunner))
            .context("Failed to initialize backup store")?,
    );

    let args: Vec<String> = env::args().collect();
    let choice = if args.len() > 1 {
        args[1].trim().to_string()
    } else {
        prompt_choice()?
    };

    match choice.as_str() {
        "1" | "backup" => {
            println!("🚀 Starting Full Backup...");
            let full = manager
                .create_full_backup()
                .await
                .context("Full backup failed")?;
            println!("Database snapshot: {}", full.database_path.display());
            println!("File archive: {}", full.files_path.display());
        }
        "2" | "backup-db" => {
            println!("🚀 Starting Database Backup...");
            let path = manager
                .create_database_backup()
                .await
                .context("Database backup failed")?;
            println!("Database snapshot: {}", path.display());
        }
        "3" | "backup-files" => {
            println!("🚀 Starting File Backup...");
            let path = manager
                .create_file_backup()
                .await
                .context("File backup failed")?;
            println!("File archive: {}", path.display());
        }
        "4" | "restore-db" => {
            let artifact = args
                .get(2)
                .context("Usage: incident-backup restore-db <artifact>")?;
            println!("🔄 Restoring database from {}...", artifact);
            manager
                .restore_database(Path::new(artifact))
                .await
                .context("Database restore failed")?;
        }
        "5" | "restore-files" => {
            let artifact = args
                .get(2)
                .context("Usage: incident-backup restore-files <artifact>")?;
            println!("🔄 Restoring files from {}...", artifact);
            manager
                .restore_files(Path::new(artifact))
                .await
                .context("File restore failed")?;
        }
        "6" | "list" => {
            for name in manager.list_backups() {
                println!("{name}");
            }
        }
        "7" | "schedule" => {
            let hours = match args.get(2) {
                Some(raw) => raw
                    .parse()
                    .context("Schedule interval must be a whole number of hours")?,
                None => manager.settings().backup_interval_hours,
            };
            println!("⏲ Running a full backup every {} hour(s). Ctrl-C to stop.", hours);
            let handle = scheduler::schedule(Arc::clone(&manager), hours).await;
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            handle.stop();
        }
        _ => {
            println!("❌ Invalid choice. See the menu for available operations.");
            anyhow::bail!("Invalid operation choice");
        }
    }
    Ok(())
}

/// Prompts the operator to select an operation
///
/// Returns the choice as String
fn prompt_choice() -> Result<String> {
    use std::io::{Write, stdin, stdout};

    println!("Select an operation:");
    println!("1. Full Backup (or type 'backup')");
    println!("2. Database Backup (or type 'backup-db')");
    println!("3. File Backup (or type 'backup-files')");
    println!("4. Restore Database (or type 'restore-db <artifact>')");
    println!("5. Restore Files (or type 'restore-files <artifact>')");
    println!("6. List Backups (or type 'list')");
    println!("7. Run on Schedule (or type 'schedule <hours>')");
    print!("Enter your choice: ");
    stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    Ok(input.trim().to_string())
}
