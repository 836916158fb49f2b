#![doc = include_str!("../README.md")]

pub mod cargo;
pub mod cli;
pub mod error;
pub mod fs;
pub mod license;
pub mod registry;
pub mod rewrite;
pub mod steps;
pub mod verify;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use cli::ReleaseCommand;

    let cli = cli::ReleaseCli::parse();
    match cli.command {
        ReleaseCommand::Bump(args) => steps::bump::execute(args),
        ReleaseCommand::License(args) => steps::license::execute(args),
    }
}
