use anyhow::Context;
use clap::Parser;
use debug_toggle::cli::{Cli, Commands};
use debug_toggle::commands::{run_comment, run_list, run_toggle, run_uncomment, run_watch};
use std::env;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    debug_toggle::init_logging(cli.verbose);

    // Determine root directory
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Toggle(args) => run_toggle(&args, &root),
        Commands::Comment(args) => run_comment(&args, &root),
        Commands::Uncomment(args) => run_uncomment(&args, &root),
        Commands::List(args) => run_list(&args, &root),
        Commands::Watch(args) => run_watch(&args, &root),
    }
}
