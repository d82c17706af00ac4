//! Build command implementation.
//!
//! Generates source modules for a target directory and, with `--compile`,
//! builds them with the Flex SDK.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::compiler::FlexSdk;
use crate::config::{CompileArguments, CompileMode, Config};
use crate::error::{AsgenError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{Pipeline, PipelineOptions, RunSummary};
use crate::system::{HostSystem, System};

/// Generate source modules for a directory of assets
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory containing the assets
    pub dir: PathBuf,

    /// Output artifact name (default: the directory's name)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Target player version
    #[arg(long, short, value_parser = parse_player)]
    pub player: Option<f32>,

    /// Quality (1-100)
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Compile mode: 1 = manifest only, 2 = everything found
    #[arg(long, short, value_parser = parse_mode)]
    pub mode: Option<CompileMode>,

    /// Produce a .swc library instead of a .swf
    #[arg(long, short)]
    pub swc: bool,

    /// Generate into this directory instead of ./.temp
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Directory of template overrides
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Capacity of the module handle pool in bytes
    #[arg(long)]
    pub pool_capacity: Option<usize>,

    /// Keep generated sources after compiling
    #[arg(long, short = 'd', alias = "debug")]
    pub keep: bool,

    /// Compile the generated sources with the Flex SDK
    #[arg(long)]
    pub compile: bool,

    /// Flex SDK location (default: flex_home in asgen.yaml, then FLEX_HOME)
    #[arg(long)]
    pub flex_home: Option<PathBuf>,
}

fn parse_player(value: &str) -> std::result::Result<f32, String> {
    let player: f32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a version number", value))?;
    if player < 9.0 {
        return Err("player version must be 9 or above".to_string());
    }
    Ok(player)
}

fn parse_mode(value: &str) -> std::result::Result<CompileMode, String> {
    value
        .parse()
        .ok()
        .and_then(CompileMode::from_number)
        .ok_or_else(|| format!("'{}' is not a compile mode (1 or 2)", value))
}

impl BuildArgs {
    fn compile_arguments(&self) -> CompileArguments {
        CompileArguments {
            name: self.output.clone(),
            player: self.player,
            mode: self.mode,
            quality: self.quality,
            swc: self.swc,
        }
    }
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let system = HostSystem;
    let cwd = system.current_dir()?;
    let absolute = |path: &Path| cwd.join(path);

    let options = PipelineOptions {
        out_dir: args.out_dir.as_deref().map(absolute),
        templates: args.templates.as_deref().map(absolute),
        pool_capacity: args.pool_capacity,
        keep: args.keep,
    };

    printer.status("Generating", &display_path(&args.dir));

    let sdk = if args.compile {
        Some(flex_sdk(&args)?)
    } else {
        None
    };

    let mut pipeline = Pipeline::new(&system).with_options(options);
    if let Some(sdk) = &sdk {
        pipeline = pipeline.with_builder(sdk);
    }
    let summary = pipeline.run(&args.dir, args.compile_arguments())?;

    report(&summary, printer)
}

/// The SDK from `--flex-home`, the project config or `FLEX_HOME`.
fn flex_sdk(args: &BuildArgs) -> Result<FlexSdk> {
    if let Some(home) = &args.flex_home {
        return Ok(FlexSdk::new(home));
    }
    if let Some(home) = Config::load_or_default(&args.dir)?.flex_home {
        return Ok(FlexSdk::new(args.dir.join(home)));
    }
    FlexSdk::from_env().ok_or_else(|| AsgenError::Config {
        message: "Flex SDK not found".to_string(),
        help: Some("Pass --flex-home, set flex_home in asgen.yaml or set FLEX_HOME".to_string()),
    })
}

fn report(summary: &RunSummary, printer: &Printer) -> Result<()> {
    for diagnostic in summary.diagnostics.iter() {
        printer.diagnostic(diagnostic);
    }

    printer.success(
        "Generated",
        &format!(
            "{} ({}) in {} [{}]",
            plural(summary.compiled.len(), "asset", "assets"),
            plural(summary.generated.len(), "module", "modules"),
            printer.cyan(&display_path(&summary.output_dir)),
            summary.strategy
        ),
    );

    if let Some(build) = &summary.build {
        if !build.success() {
            eprint!("{}", build.output);
            return Err(AsgenError::Build {
                message: format!(
                    "compiling {} failed with exit code {}",
                    display_path(&summary.request.output),
                    build.exit_code
                ),
                help: None,
            });
        }
        printer.success("Compiled", &display_path(&summary.request.output));
        if summary.cleaned {
            printer.info("Removed", &display_path(&summary.output_dir));
        }
    }

    if !summary.diagnostics.is_empty() {
        printer.warning(
            "Finished",
            &plural(summary.diagnostics.warning_count(), "warning", "warnings"),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> std::result::Result<BuildArgs, clap::Error> {
        let mut argv = vec!["asgen", "build"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).map(|cli| match cli.command {
            Commands::Build(args) => args,
            other => panic!("unexpected command {:?}", other),
        })
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["art", "-o", "game", "-p", "10.3", "-q", "80", "-m", "2", "-s"]).unwrap();

        let compile = args.compile_arguments();
        assert_eq!(compile.name.as_deref(), Some("game"));
        assert_eq!(compile.player, Some(10.3));
        assert_eq!(compile.quality, Some(80));
        assert_eq!(compile.mode, Some(CompileMode::All));
        assert!(compile.swc);
    }

    #[test]
    fn test_quality_range() {
        assert!(parse(&["art", "-q", "0"]).is_err());
        assert!(parse(&["art", "-q", "101"]).is_err());
        assert!(parse(&["art", "-q", "100"]).is_ok());
    }

    #[test]
    fn test_player_minimum() {
        assert!(parse(&["art", "-p", "8"]).is_err());
        assert!(parse(&["art", "-p", "nine"]).is_err());
        assert!(parse(&["art", "-p", "9"]).is_ok());
    }

    #[test]
    fn test_mode_values() {
        assert!(parse(&["art", "-m", "3"]).is_err());
        assert_eq!(parse(&["art", "-m", "1"]).unwrap().mode, Some(CompileMode::Definition));
    }

    #[test]
    fn test_debug_alias_keeps_sources() {
        assert!(parse(&["art", "--debug"]).unwrap().keep);
        assert!(parse(&["art", "-d"]).unwrap().keep);
    }

    #[test]
    fn test_run_generates_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let art = dir.path().join("art");
        std::fs::create_dir_all(&art).unwrap();
        std::fs::write(art.join("coin.png"), b"").unwrap();
        let out = dir.path().join("gen");

        let args = parse(&[
            art.to_str().unwrap(),
            "--out-dir",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(args, &Printer::new()).unwrap();

        assert!(out.join("coin.as").exists());
        assert!(out.join("Main.as").exists());
    }
}
