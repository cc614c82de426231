//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Media Archive Mirror - Keep a directory of tar.gz archives in line with a media library
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Archive listed entries and remove archives that are no longer listed
    ///
    /// Examples:
    ///   mirror sync --source /srv/media --target /srv/archives movies/Alpha
    ///   mirror sync --config mirror.toml --dry-run
    ///   mirror sync -s /srv/media -t /srv/archives --list wanted.txt --json
    Sync(SyncArgs),
}

/// Arguments for `mirror sync`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SyncArgs {
    /// Media library root
    #[arg(short, long, env = "MIRROR_SOURCE")]
    pub source: Option<PathBuf>,

    /// Archive directory
    #[arg(short, long, env = "MIRROR_TARGET")]
    pub target: Option<PathBuf>,

    /// Newline-delimited list of paths relative to the source root
    #[arg(short, long, conflicts_with = "paths")]
    pub list: Option<PathBuf>,

    /// Paths relative to the source root
    pub paths: Vec<String>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Gzip compression level (1-9)
    #[arg(long)]
    pub level: Option<u32>,

    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_args(cli: Cli) -> SyncArgs {
        match cli.command {
            Some(Commands::Sync(args)) => args,
            other => panic!("expected sync command, got {other:?}"),
        }
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["mirror"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["mirror", "sync", "-v", "-s", "/a", "-t", "/b"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_sync_with_paths() {
        let args = sync_args(Cli::parse_from([
            "mirror",
            "sync",
            "--source",
            "/srv/media",
            "--target",
            "/srv/archives",
            "movies/Alpha",
            "movies/Beta",
        ]));

        assert_eq!(args.source, Some(PathBuf::from("/srv/media")));
        assert_eq!(args.target, Some(PathBuf::from("/srv/archives")));
        assert_eq!(args.paths, vec!["movies/Alpha", "movies/Beta"]);
        assert!(args.list.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_sync_with_config_and_flags() {
        let args = sync_args(Cli::parse_from([
            "mirror",
            "sync",
            "--config",
            "mirror.toml",
            "--level",
            "9",
            "--dry-run",
            "--json",
        ]));

        assert_eq!(args.config, Some(PathBuf::from("mirror.toml")));
        assert_eq!(args.level, Some(9));
        assert!(args.dry_run);
        assert!(args.json);
    }

    #[test]
    fn test_list_conflicts_with_paths() {
        let result = Cli::try_parse_from([
            "mirror",
            "sync",
            "--list",
            "wanted.txt",
            "movies/Alpha",
        ]);
        assert!(result.is_err());
    }
}
