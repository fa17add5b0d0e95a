use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "keyfs",
    about = "Browse and edit a flat blob store as a filesystem",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use a local store rooted at this directory, overriding the config
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Describe a path
    Stat(StatArgs),
    /// List a directory
    Ls(LsArgs),
    /// Print a file to stdout
    Cat(CatArgs),
    /// Write a file from stdin or a local file
    Put(PutArgs),
    /// Remove a file or an empty directory
    Rm(RmArgs),
    /// Create a directory
    Mkdir(MkdirArgs),
    /// List paths matching a shell pattern
    Glob(GlobArgs),
}

#[derive(Args)]
pub struct StatArgs {
    pub path: String,
}

#[derive(Args)]
pub struct LsArgs {
    #[arg(default_value = ".")]
    pub path: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub path: String,
}

#[derive(Args)]
pub struct PutArgs {
    pub path: String,
    /// Read contents from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RmArgs {
    pub path: String,
}

#[derive(Args)]
pub struct MkdirArgs {
    pub path: String,
    /// Create missing parents too
    #[arg(short, long)]
    pub parents: bool,
}

#[derive(Args)]
pub struct GlobArgs {
    pub pattern: String,
    /// Only report matches inside this subtree
    #[arg(long, default_value = "")]
    pub prefix: String,
}
