use anyhow::Result;
use clap::Parser;

use doot::cli::{self, Command};
use doot::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init(args.global.verbose, args.global.quiet);

    match args.command {
        None => commands::install::run(&args.global, &cli::InstallOpts::default()),
        Some(Command::Install(opts)) => commands::install::run(&args.global, &opts),
        Some(Command::Clean(opts)) => commands::clean::run(&args.global, &opts),
        Some(Command::Ls(opts)) => commands::ls::run(&args.global, &opts),
        Some(Command::Version) => {
            println!("doot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
