use crate::steps::bump::BumpArgs;
use crate::steps::license::LicenseArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hetu-release", version, about)]
pub struct ReleaseCli {
    #[command(subcommand)]
    pub command: ReleaseCommand,
}

#[derive(Subcommand)]
pub enum ReleaseCommand {
    /// Set a new version on every HetuDB crate and the pins between them.
    Bump(BumpArgs),

    /// Write the third-party license attribution file.
    License(LicenseArgs),
}
