//! Asset discovery.
//!
//! Two strategies find the assets of a target directory and feed them to
//! the [`TemplateEngine`]:
//! - [`ManifestStrategy`] reads the assets declared in `definition.xml`.
//! - [`ConventionStrategy`] walks the directory and groups files by name.
//!
//! # Example
//!
//! ```ignore
//! use asgen::discovery::select_strategy;
//!
//! let (kind, mut producer) = select_strategy("./art", manifest, CompileMode::All, &config)?;
//! producer.discover_and_emit(&mut engine)?;
//! ```

mod manifest;
mod scanner;

use std::fmt;
use std::path::Path;

use crate::config::{CompileMode, Config};
use crate::error::Result;
use crate::template::TemplateEngine;

pub use manifest::{Manifest, ManifestSettings, ManifestStrategy, DEFINITION_FILENAME};
pub use scanner::{strip_ignored_suffix, ConventionStrategy, FamilyPattern};

/// Something that finds assets and emits a module for each.
pub trait AssetProducer {
    /// Emit every discovered asset, then the entry point and support
    /// classes.
    fn discover_and_emit(&mut self, engine: &mut TemplateEngine) -> Result<()>;
}

/// Which strategy a run used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Manifest,
    Convention,
}

impl StrategyKind {
    /// The strategy for a manifest (if any) and a resolved mode.
    pub fn for_run(has_manifest: bool, mode: CompileMode) -> Self {
        match (has_manifest, mode) {
            (true, CompileMode::Definition) => StrategyKind::Manifest,
            _ => StrategyKind::Convention,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Manifest => write!(f, "manifest"),
            StrategyKind::Convention => write!(f, "convention"),
        }
    }
}

/// Build the producer for a run over `root`.
pub fn select_strategy(
    root: &Path,
    manifest: Option<Manifest>,
    mode: CompileMode,
    config: &Config,
) -> Result<(StrategyKind, Box<dyn AssetProducer>)> {
    let kind = StrategyKind::for_run(manifest.is_some(), mode);
    let producer: Box<dyn AssetProducer> = match (kind, manifest) {
        (StrategyKind::Manifest, Some(manifest)) => Box::new(ManifestStrategy::new(manifest, root)),
        _ => Box::new(ConventionStrategy::new(root, config)?),
    };
    Ok((kind, producer))
}
