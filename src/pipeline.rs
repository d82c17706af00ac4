//! One full generation run.
//!
//! [`Pipeline::run`] resolves the settings for a target directory, picks a
//! discovery strategy, generates every module into the output directory and
//! optionally hands the result to an [`ArtifactBuilder`].

use std::path::{Path, PathBuf};

use crate::compiler::{ArtifactBuilder, BuildOutcome, BuildRequest};
use crate::config::{CompileArguments, CompileMode, Config};
use crate::diagnostics::{codes, Diagnostics};
use crate::discovery::{select_strategy, Manifest, StrategyKind};
use crate::error::{AsgenError, Result};
use crate::system::System;
use crate::template::{template_id, EngineOptions, TemplateEngine, MAIN_CLASS};

/// Name used when the requested output name is hidden.
pub const FALLBACK_OUTPUT_NAME: &str = "output";

/// Settings that are not part of [`CompileArguments`].
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Generate here instead of the system temp directory.
    pub out_dir: Option<PathBuf>,
    /// Overrides the config's template directory.
    pub templates: Option<PathBuf>,
    /// Overrides the config's pool capacity.
    pub pool_capacity: Option<usize>,
    /// Keep the output directory after a build.
    pub keep: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub strategy: StrategyKind,
    /// Names of the emitted assets, in emission order.
    pub compiled: Vec<String>,
    /// Every generated file.
    pub generated: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub diagnostics: Diagnostics,
    pub request: BuildRequest,
    pub build: Option<BuildOutcome>,
    /// Whether the output directory was removed after the build.
    pub cleaned: bool,
}

/// Runs discovery and generation for a target directory.
pub struct Pipeline<'a> {
    system: &'a dyn System,
    builder: Option<&'a dyn ArtifactBuilder>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(system: &'a dyn System) -> Self {
        Self {
            system,
            builder: None,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the generated sources with `builder` after generation.
    pub fn with_builder(mut self, builder: &'a dyn ArtifactBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    pub fn run(&self, target_dir: &Path, mut args: CompileArguments) -> Result<RunSummary> {
        let target = canonical_dir(target_dir)?;
        let mut diagnostics = Diagnostics::new();

        let mut config = Config::load_or_default(&target)?;
        if let Some(templates) = &self.options.templates {
            config.templates = Some(templates.clone());
        }
        if let Some(capacity) = self.options.pool_capacity {
            config.pool_capacity = capacity;
        }

        let manifest = Manifest::load(&target)?;
        if let Some(manifest) = &manifest {
            manifest.merge_into(&mut args, &mut diagnostics)?;
        }
        let mode = *args.mode.get_or_insert(CompileMode::All);

        let output = self.output_path(&target, &args, &mut diagnostics)?;

        let explicit_out_dir = self.options.out_dir.is_some();
        let output_dir = match &self.options.out_dir {
            Some(dir) => dir.clone(),
            None => {
                // Each run starts from an empty temp directory.
                let temp = self.system.temp_dir()?;
                self.system.remove_dir(&temp)?;
                temp
            }
        };
        self.system.make_dir(&output_dir)?;
        let output_dir = canonical_dir(&output_dir)?;

        log::info!(
            "generating {} into {} (mode {}, player {})",
            target.display(),
            output_dir.display(),
            mode,
            args.player_or_default()
        );

        let mut engine = TemplateEngine::new(EngineOptions {
            output_dir: output_dir.clone(),
            templates: config.templates.as_ref().map(|dir| target.join(dir)),
            pool_capacity: config.pool_capacity,
            use_vector: args.use_vector(),
            stage: config.stage.clone(),
        });

        let (strategy, mut producer) = select_strategy(&target, manifest, mode, &config)?;
        producer.discover_and_emit(&mut engine)?;

        let request = BuildRequest {
            main_file: output_dir.join(template_id(MAIN_CLASS)),
            source_dir: output_dir.clone(),
            output,
            player: args.player_or_default(),
            quality: args.quality_or_default(),
            swc: args.swc,
        };

        let build = match self.builder {
            Some(builder) => Some(builder.build(&request)?),
            None => None,
        };

        let cleaned = build.is_some() && !self.options.keep && !explicit_out_dir;
        if cleaned {
            self.system.remove_dir(&output_dir)?;
        }

        diagnostics.merge(std::mem::take(engine.diagnostics_mut()));
        Ok(RunSummary {
            strategy,
            compiled: engine.compile_list().to_vec(),
            generated: engine.generated().to_vec(),
            output_dir,
            diagnostics,
            request,
            build,
            cleaned,
        })
    }

    /// Artifact path in the current directory.
    ///
    /// Hidden names are replaced and the artifact extension is appended
    /// when missing.
    fn output_path(
        &self,
        target: &Path,
        args: &CompileArguments,
        diagnostics: &mut Diagnostics,
    ) -> Result<PathBuf> {
        let mut name = match &args.name {
            Some(name) => name.clone(),
            None => target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| FALLBACK_OUTPUT_NAME.to_string()),
        };

        let hidden = Path::new(&name)
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden {
            diagnostics.warning(
                codes::INVALID_NAME,
                format!("output name '{}' is hidden, using '{}'", name, FALLBACK_OUTPUT_NAME),
            );
            name = FALLBACK_OUTPUT_NAME.to_string();
        }

        let extension = if args.swc { ".swc" } else { ".swf" };
        if !name.ends_with(".swf") && !name.ends_with(".swc") {
            name.push_str(extension);
        }

        Ok(self.system.current_dir()?.join(name))
    }
}

fn canonical_dir(dir: &Path) -> Result<PathBuf> {
    let canonical = dir.canonicalize().map_err(|e| AsgenError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to resolve directory: {}", e),
    })?;
    if !canonical.is_dir() {
        return Err(AsgenError::Io {
            path: dir.to_path_buf(),
            message: "Not a directory".to_string(),
        });
    }
    Ok(canonical)
}
