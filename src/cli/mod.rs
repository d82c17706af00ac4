pub mod build;
pub mod completions;
pub mod init;
pub mod templates;

use clap::{ArgAction, Parser, Subcommand};

/// asgen - Asset discovery and source generation
#[derive(Parser, Debug)]
#[command(name = "asgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter for the requested verbosity.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate source modules for a directory of assets
    Build(build::BuildArgs),

    /// Initialize an asgen project (generates asgen.yaml)
    Init(init::InitArgs),

    /// Export the built-in templates for customisation
    Templates(templates::TemplatesArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
