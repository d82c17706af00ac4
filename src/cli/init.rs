//! Init command implementation.
//!
//! Writes a default `asgen.yaml` into a project directory.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILENAME};
use crate::discovery::DEFINITION_FILENAME;
use crate::error::{AsgenError, Result};
use crate::output::{display_path, Printer};

/// Initialize an asgen project by generating asgen.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing asgen.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(AsgenError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let yaml = Config::default().to_yaml()?;
    fs::write(&config_path, &yaml).map_err(|e| AsgenError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    if args.path.join(DEFINITION_FILENAME).is_file() {
        printer.info("Found", &format!("{} (assets are declared)", DEFINITION_FILENAME));
    }
    printer.success("Created", &display_path(&config_path));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_config() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::new()).unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(content.contains("movieclip_pattern"));
        assert_eq!(Config::parse(&content).unwrap(), Config::default());
    }

    #[test]
    fn test_init_errors_if_config_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "pool_capacity: 64").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        let result = run(args, &Printer::new());
        assert!(result.is_err());
        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(content, "pool_capacity: 64");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "pool_capacity: 64").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::new()).unwrap();

        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(Config::parse(&content).unwrap().pool_capacity, 1024);
    }
}
