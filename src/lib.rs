//! asgen - Asset discovery and source generation
//!
//! A library for turning a directory of media files, or an XML manifest
//! describing them, into generated ActionScript modules ready to compile
//! into a `.swf` or `.swc`.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod system;
pub mod template;
pub mod types;

pub use compiler::{ArtifactBuilder, BuildOutcome, BuildRequest, FlexSdk};
pub use config::{CompileArguments, CompileMode, Config, Stage};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use discovery::{
    select_strategy, AssetProducer, ConventionStrategy, Manifest, ManifestStrategy, StrategyKind,
};
pub use error::{AsgenError, Result};
pub use pipeline::{Pipeline, PipelineOptions, RunSummary};
pub use pool::MemoryPool;
pub use system::{HostSystem, System};
pub use template::{Emission, EngineOptions, TemplateEngine};
pub use types::{Asset, AssetBit, AssetClass, AssetEntry, BaseClass, FileType, SpriteAsset};
