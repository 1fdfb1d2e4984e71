//! CLI [`Args`] of the server binary.

use clap::Parser;

/// Server of the staffing agency website.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] from the command line.
    ///
    /// # Errors
    ///
    /// If the command line arguments do not form valid [`Args`].
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
