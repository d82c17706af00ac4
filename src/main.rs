use asgen::cli::{Cli, Commands};
use asgen::output::Printer;
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let printer = Printer::new();
    match cli.command {
        Commands::Build(args) => asgen::cli::build::run(args, &printer)?,
        Commands::Init(args) => asgen::cli::init::run(args, &printer)?,
        Commands::Templates(args) => asgen::cli::templates::run(args, &printer)?,
        Commands::Completions(args) => asgen::cli::completions::run(args)?,
    }

    Ok(())
}
