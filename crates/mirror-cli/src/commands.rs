//! Sync command implementation

use colored::Colorize;

use mirror_core::{ListFile, SyncConfig, SyncReport};

use crate::cli::SyncArgs;
use crate::error::{CliError, Result};

/// Resolve the run configuration: config file first, then flag overrides.
pub fn resolve_config(args: &SyncArgs) -> Result<SyncConfig> {
    let mut config = match &args.config {
        Some(path) => SyncConfig::load(path)?,
        None => {
            let source = args.source.clone().ok_or_else(|| {
                CliError::user("missing --source (or a config file with source_root)")
            })?;
            let target = args.target.clone().ok_or_else(|| {
                CliError::user("missing --target (or a config file with target_root)")
            })?;
            SyncConfig::new(source, target)
        }
    };

    if let Some(source) = &args.source {
        config.source_root.clone_from(source);
    }
    if let Some(target) = &args.target {
        config.target_root.clone_from(target);
    }
    if let Some(level) = args.level {
        config.compression_level = level;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.list.is_some() {
        config.list_file.clone_from(&args.list);
    } else if !args.paths.is_empty() {
        config.list_file = None;
    }

    Ok(config)
}

/// Run the sync command
pub fn run_sync(args: &SyncArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let engine = config.engine()?;

    if !args.json {
        println!(
            "{} Syncing {} -> {}",
            "=>".blue().bold(),
            engine.source_root().display(),
            engine.target_root().display()
        );
    }

    let report = match &config.list_file {
        Some(list) => engine.run_from(&ListFile::new(list))?,
        None if args.paths.is_empty() => {
            return Err(CliError::user(
                "no paths to sync: pass PATHS, --list, or list_file in the config",
            ));
        }
        None => engine.run(&args.paths)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    for removed in &report.removed {
        println!("   {} {}removed {}", "-".red(), prefix, removed.display().to_string().cyan());
    }
    for archived in &report.archived {
        println!(
            "   {} {}archived {} ({})",
            "+".green(),
            prefix,
            archived.path.cyan(),
            archived.reason.to_string().dimmed()
        );
    }
    for skipped in &report.skipped {
        println!("   {} skipped {} (source missing)", "?".yellow(), skipped.cyan());
    }

    if report.changed() {
        println!(
            "{} {}{} archived, {} removed, {} up to date",
            "OK".green().bold(),
            prefix,
            report.archived.len(),
            report.removed.len(),
            report.up_to_date.len()
        );
    } else {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
    }
}
