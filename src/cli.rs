use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles linker.
#[derive(Parser, Debug)]
#[command(
    name = "doot",
    about = "Install dotfiles as links into your home directory",
    version
)]
pub struct Cli {
    /// Defaults to `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except prompts
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Override the dotfiles repository location
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install dotfile links and remove stale ones
    Install(InstallOpts),
    /// Remove every installed dotfile link
    Clean(CleanOpts),
    /// List the currently installed links
    Ls(LsOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Rediscover installed links from disk instead of trusting the cache
    #[arg(long)]
    pub full_clean: bool,
}

/// Options for the `clean` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct CleanOpts {
    /// Rediscover installed links from disk instead of trusting the cache
    #[arg(long)]
    pub full_clean: bool,
}

/// Options for the `ls` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LsOpts {
    /// Print the links as a JSON object
    #[arg(long)]
    pub json: bool,
}
