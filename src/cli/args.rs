//! Command-line interface definitions (clap derive).
//!
//! Every subcommand takes one target PATH (file or directory). `--root` only
//! decides where debug-toggle.toml is read from and what relative PATHs are
//! resolved against; it has no short form so `-r` stays free for `--recursive`.

use crate::error::ToggleError;
use crate::exclusion::ExclusionConfig;
use crate::types::{Mode, ToggleRequest};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debug-toggle")]
#[command(author, version, about = "Comment and uncomment tagged DEBUG blocks in source files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root holding debug-toggle.toml (defaults to current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Comment, uncomment or flip DEBUG blocks
    Toggle(ToggleArgs),

    /// Comment out active DEBUG blocks (same as `toggle --mode comment`)
    Comment(ModeArgs),

    /// Uncomment inactive DEBUG blocks (same as `toggle --mode uncomment`)
    Uncomment(ModeArgs),

    /// List tags with their active and inactive block counts
    List(ListArgs),

    /// Watch files and toggle blocks interactively
    Watch(WatchArgs),
}

/// Which files a command covers
#[derive(Args, Clone, Debug, Default)]
pub struct TargetOptions {
    /// File or directory to process
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Only process these extensions (comma separated, e.g. ts,js)
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Exclude files/directories matching glob pattern (can be repeated)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Don't respect .gitignore files
    #[arg(long)]
    pub no_gitignore: bool,
}

impl TargetOptions {
    /// Create an ExclusionConfig from these options, merging with config file patterns
    pub fn exclusion_config(&self, config_patterns: &[String]) -> ExclusionConfig {
        let mut patterns = config_patterns.to_vec();
        patterns.extend(self.exclude.iter().cloned());
        ExclusionConfig {
            patterns,
            respect_gitignore: !self.no_gitignore,
        }
    }
}

/// Tag selection and write behaviour shared by the mutating commands
#[derive(Args, Clone, Debug, Default)]
pub struct FilterOptions {
    /// Only touch blocks with these tags (comma separated; `all` for every tag)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Touch every block except those with these tags (comma separated)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub except: Vec<String>,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl FilterOptions {
    pub fn request(&self, mode: Mode) -> Result<ToggleRequest, ToggleError> {
        ToggleRequest::new(mode, &self.only, &self.except)
    }
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// What to do with the selected blocks
    #[arg(long, value_enum, default_value_t = Mode::Toggle)]
    pub mode: Mode,

    #[command(flatten)]
    pub target: TargetOptions,

    #[command(flatten)]
    pub filter: FilterOptions,
}

#[derive(Args, Debug)]
pub struct ModeArgs {
    #[command(flatten)]
    pub target: TargetOptions,

    #[command(flatten)]
    pub filter: FilterOptions,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the tag summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetOptions,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Debounce delay in milliseconds (defaults to debug-toggle.toml, then 100)
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    #[command(flatten)]
    pub target: TargetOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagFilter;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    /// Toggle command and all its options
    #[test]
    fn test_parse_toggle() {
        // Default values
        let cli = Cli::try_parse_from(["debug-toggle", "toggle", "src/app.ts"]).unwrap();
        let Commands::Toggle(args) = cli.command else {
            panic!("Expected Toggle")
        };
        assert_eq!(args.mode, Mode::Toggle);
        assert_eq!(args.target.path, PathBuf::from("src/app.ts"));
        assert!(!args.target.recursive);
        assert!(args.filter.only.is_empty());
        assert!(args.filter.except.is_empty());
        assert!(!args.filter.dry_run);

        // Mode, recursion, filters
        let cli = Cli::try_parse_from([
            "debug-toggle",
            "toggle",
            "src",
            "-r",
            "--mode",
            "comment",
            "--only",
            "keep,temp",
            "--dry-run",
        ])
        .unwrap();
        let Commands::Toggle(args) = cli.command else {
            panic!("Expected Toggle")
        };
        assert_eq!(args.mode, Mode::Comment);
        assert!(args.target.recursive);
        assert_eq!(args.filter.only, vec!["keep", "temp"]);
        assert!(args.filter.dry_run);
    }

    #[test]
    fn test_parse_shorthands() {
        let cli = Cli::try_parse_from(["debug-toggle", "comment", ".", "--except", "keep"]).unwrap();
        let Commands::Comment(args) = cli.command else {
            panic!("Expected Comment")
        };
        assert_eq!(args.filter.except, vec!["keep"]);

        let cli = Cli::try_parse_from(["debug-toggle", "uncomment", "a.py"]).unwrap();
        assert!(matches!(cli.command, Commands::Uncomment(_)));
    }

    #[test]
    fn test_filter_options_request() {
        let filter = FilterOptions {
            only: vec!["keep".to_string()],
            ..Default::default()
        };
        let request = filter.request(Mode::Comment).unwrap();
        assert!(matches!(request.filter, TagFilter::Only(_)));

        // Both lists given: rejected before any file is touched
        let filter = FilterOptions {
            only: vec!["keep".to_string()],
            except: vec!["temp".to_string()],
            dry_run: false,
        };
        assert!(matches!(
            filter.request(Mode::Toggle),
            Err(ToggleError::FilterConflict)
        ));
    }

    #[test]
    fn test_target_options() {
        let cli = Cli::try_parse_from([
            "debug-toggle",
            "list",
            "src",
            "--ext",
            "ts,js",
            "--exclude",
            "gen/**",
            "--exclude",
            "*.test.ts",
            "--no-gitignore",
            "--json",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("Expected List")
        };
        assert!(args.json);
        assert_eq!(args.target.ext, vec!["ts", "js"]);

        let exclusion = args.target.exclusion_config(&["vendor/**".to_string()]);
        assert_eq!(exclusion.patterns, vec!["vendor/**", "gen/**", "*.test.ts"]);
        assert!(!exclusion.respect_gitignore);
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from(["debug-toggle", "watch", "src"]).unwrap();
        let Commands::Watch(args) = cli.command else {
            panic!("Expected Watch")
        };
        assert!(args.debounce.is_none());

        let cli = Cli::try_parse_from(["debug-toggle", "watch", "src", "--debounce", "250", "-r"])
            .unwrap();
        let Commands::Watch(args) = cli.command else {
            panic!("Expected Watch")
        };
        assert_eq!(args.debounce, Some(250));
        assert!(args.target.recursive);
    }

    /// Test global flags (-v, --verbose, --root)
    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["debug-toggle", "-v", "list", "."]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["debug-toggle", "--root", "/tmp/project", "list", "."]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/project")));

        // Flags after command
        let cli = Cli::try_parse_from(["debug-toggle", "toggle", ".", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_error_cases() {
        assert!(Cli::try_parse_from(["debug-toggle"]).is_err()); // Missing command
        assert!(Cli::try_parse_from(["debug-toggle", "toggle"]).is_err()); // Missing path
        assert!(Cli::try_parse_from(["debug-toggle", "toggle", ".", "--mode", "flip"]).is_err());
        assert!(Cli::try_parse_from(["debug-toggle", "watch", ".", "--debounce", "soon"]).is_err());
    }

    #[test]
    fn test_help_output() {
        let mut cmd = Cli::command();
        let help = format!("{}", cmd.render_help());
        for name in ["toggle", "comment", "uncomment", "list", "watch"] {
            assert!(help.contains(name), "{}", help);
        }
    }
}
