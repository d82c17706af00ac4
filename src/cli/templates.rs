//! Templates command implementation.
//!
//! Exports the built-in templates so they can be customised and passed
//! back with `--templates` or the `templates` config key.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{AsgenError, Result};
use crate::output::{display_path, plural, Printer};
use crate::template::BUILTIN_TEMPLATES;

/// Export the built-in templates
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Directory to write the templates into
    pub dir: PathBuf,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: TemplatesArgs, printer: &Printer) -> Result<()> {
    fs::create_dir_all(&args.dir).map_err(|e| AsgenError::Io {
        path: args.dir.clone(),
        message: format!("Failed to create directory: {}", e),
    })?;

    let mut written = 0;
    for (id, source) in BUILTIN_TEMPLATES {
        let path = args.dir.join(id);
        if path.exists() && !args.force {
            printer.warning("Skipping", &format!("{} (exists)", display_path(&path)));
            continue;
        }
        fs::write(&path, source).map_err(|e| AsgenError::Io {
            path: path.clone(),
            message: format!("Failed to write template: {}", e),
        })?;
        written += 1;
    }

    printer.success(
        "Exported",
        &format!(
            "{} to {}",
            plural(written, "template", "templates"),
            display_path(&args.dir)
        ),
    );
    Ok(())
}
