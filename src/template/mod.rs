//! Source generation from templates.
//!
//! The [`TemplateEngine`] turns a template plus a fresh set of variable
//! bindings into one generated module. It owns everything the discovery
//! strategies share: the template cache, the handle pool, the list of
//! compiled asset names and the run's diagnostics.
//!
//! # Example
//!
//! ```ignore
//! use asgen::template::{EngineOptions, TemplateEngine};
//!
//! let mut engine = TemplateEngine::new(EngineOptions::new("build/.temp"));
//! engine.emit_simple(&asset)?;
//! engine.finalize()?;
//! ```

mod builtin;
mod expand;
mod module;
mod store;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::Stage;
use crate::diagnostics::{codes, Diagnostics};
use crate::error::{AsgenError, Result};
use crate::pool::{MemoryPool, DEFAULT_POOL_CAPACITY};
use crate::types::{Asset, AssetClass, BaseClass, FileType, SpriteAsset};

pub use builtin::{builtin, BUILTIN_TEMPLATES};
pub use expand::{Expander, Expansion, FrameRows, NameRows, RowSource, Value, Variables, LOOP1, LOOP2};
pub use module::OutputModule;
pub use store::{TemplateSource, TemplateStore};

/// Extension of generated modules and template ids.
pub const MODULE_EXTENSION: &str = "as";

/// Name of the generated entry-point class.
pub const MAIN_CLASS: &str = "Main";

/// Copyright line written into every generated header.
pub const COPYRIGHT: &str = "Copyright (c) the asgen authors";

/// Template id for a class name, e.g. `Sprite` -> `Sprite.as`.
pub fn template_id(class_name: &str) -> String {
    format!("{}.{}", class_name, MODULE_EXTENSION)
}

/// Outcome of one emission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Written(PathBuf),
    /// Skipped after a recoverable problem, recorded as a diagnostic.
    Skipped,
}

impl Emission {
    pub fn is_written(&self) -> bool {
        matches!(self, Emission::Written(_))
    }
}

/// Settings for a [`TemplateEngine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub output_dir: PathBuf,
    pub templates: Option<PathBuf>,
    pub pool_capacity: usize,
    /// Use `Vector.<DisplayObject>` rather than `Array` in base classes.
    pub use_vector: bool,
    pub stage: Stage,
}

impl EngineOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            templates: None,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            use_vector: true,
            stage: Stage::default(),
        }
    }
}

pub struct TemplateEngine {
    output_dir: PathBuf,
    header: String,
    store: TemplateStore,
    pool: MemoryPool,
    use_vector: bool,
    stage: Stage,
    compile_list: Vec<String>,
    generated: Vec<PathBuf>,
    base_classes: BTreeSet<BaseClass>,
    diagnostics: Diagnostics,
}

impl TemplateEngine {
    pub fn new(options: EngineOptions) -> Self {
        let store = match options.templates {
            Some(dir) => TemplateStore::with_overrides(dir),
            None => TemplateStore::builtin(),
        };

        Self {
            output_dir: options.output_dir,
            header: generated_header(),
            store,
            pool: MemoryPool::new(options.pool_capacity),
            use_vector: options.use_vector,
            stage: options.stage,
            compile_list: Vec::new(),
            generated: Vec::new(),
            base_classes: BTreeSet::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Names of assets emitted so far, in emission order.
    pub fn compile_list(&self) -> &[String] {
        &self.compile_list
    }

    /// Every file written so far, support modules included.
    pub fn generated(&self) -> &[PathBuf] {
        &self.generated
    }

    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Record a recoverable problem.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.diagnostics.warning(code, message);
    }

    /// Open a template, rewound to the start.
    pub fn open_template(&mut self, id: &str) -> Result<&mut (dyn TemplateSource + 'static)> {
        self.store.open(id)
    }

    /// Create a module in the output directory, header already written.
    pub fn create_output_module(&mut self, name: &str) -> Result<OutputModule> {
        let path = self.output_dir.join(name);
        OutputModule::create(&mut self.pool, &path, &self.header)
    }

    /// Expand `template` into the module `output_name`.
    ///
    /// `loop1` and `loop2` bind the loop directives; lines using a directive
    /// without a binding are substituted like any other line.
    pub fn emit_module(
        &mut self,
        template: &str,
        variables: &Variables,
        loop1: Option<&dyn RowSource>,
        loop2: Option<&dyn RowSource>,
        output_name: &str,
    ) -> Result<PathBuf> {
        let source = self.store.open(template)?;
        let path = self.output_dir.join(output_name);
        let mut module = OutputModule::create(&mut self.pool, &path, &self.header)?;

        let mut expander = Expander::new(variables);
        if let Some(rows) = loop1 {
            expander = expander.with_loop1(rows);
        }
        if let Some(rows) = loop2 {
            expander = expander.with_loop2(rows);
        }

        let undefined = match expander.expand(source, module.writer()) {
            Ok(undefined) => undefined,
            Err(e) => {
                let path = module.abandon(&mut self.pool);
                return Err(AsgenError::CannotCreate {
                    path,
                    message: e.to_string(),
                });
            }
        };

        for token in undefined {
            self.diagnostics.warning(
                codes::UNDEFINED_VARIABLE,
                format!("undefined variable {} in {}", token, template),
            );
        }

        let path = module.finish(&mut self.pool)?;
        self.generated.push(path.clone());
        Ok(path)
    }

    /// Emit the module for a single-file asset.
    pub fn emit_simple(&mut self, asset: &Asset) -> Result<Emission> {
        let file_type = FileType::detect(asset.path());
        if !file_type.is_supported() {
            self.warn(
                codes::UNSUPPORTED_TYPE,
                format!("unsupported file type: {}", asset.path()),
            );
            return Ok(Emission::Skipped);
        }
        if asset.class == AssetClass::Undefined || asset.class.is_sprite() {
            self.warn(
                codes::UNDEFINED_CLASS,
                format!("no simple class for '{}' ({})", asset.name(), asset.class),
            );
            return Ok(Emission::Skipped);
        }

        let mut variables = Variables::new();
        variables
            .set("name", asset.name())
            .set("path", asset.path().replace('\\', "/"))
            .set("mime", file_type.mime());

        let template = template_id(asset.class.template_name());
        let result = self.emit_module(&template, &variables, None, None, &template_id(asset.name()));
        let emission = self.settle(result)?;
        if let Emission::Written(path) = &emission {
            log::info!("creating: {} of type '{}'", path.display(), asset.class);
            self.record(asset.name());
        }
        Ok(emission)
    }

    /// Emit the module for a sprite or movie clip.
    ///
    /// Frame rows are written for every index of the frame list, empty
    /// frames included. The sprite's own `x`, `y`, `alpha` and `visible`
    /// lines are left out when the property is unset.
    pub fn emit_sprite(&mut self, sprite: &SpriteAsset) -> Result<Emission> {
        let class = sprite.class();
        let Some(base) = BaseClass::for_class(class) else {
            self.warn(
                codes::UNDEFINED_CLASS,
                format!("'{}' is not a sprite class ({})", sprite.name(), class),
            );
            return Ok(Emission::Skipped);
        };

        let bit = &sprite.asset.bit;
        let mut variables = Variables::new();
        variables
            .set("name", sprite.name())
            .set_or_drop("x", &bit.x)
            .set_or_drop("y", &bit.y)
            .set_or_drop("alpha", &bit.alpha)
            .set_or_drop("visible", &bit.visible);

        let declarations = FrameRows::declarations(&sprite.frames);
        let properties = FrameRows::properties(&sprite.frames);

        let template = template_id(class.template_name());
        let result = self.emit_module(
            &template,
            &variables,
            Some(&declarations),
            Some(&properties),
            &template_id(sprite.name()),
        );
        let emission = self.settle(result)?;
        if let Emission::Written(path) = &emission {
            log::info!(
                "creating: {} of type '{}' ({} frames)",
                path.display(),
                class,
                sprite.frames.len()
            );
            self.record(sprite.name());
            self.base_classes.insert(base);
        }
        Ok(emission)
    }

    /// Emit the entry-point module listing every compiled asset.
    pub fn emit_entry_point(&mut self) -> Result<Emission> {
        log::info!("created {} asset files", self.compile_list.len());

        let mut variables = Variables::new();
        variables
            .set("width", self.stage.width.to_string())
            .set("height", self.stage.height.to_string())
            .set("bgcolor", self.stage.background.clone())
            .set("fps", self.stage.fps.to_string());

        let names = self.compile_list.clone();
        let rows = NameRows(&names);
        let template = template_id(MAIN_CLASS);
        let result = self.emit_module(&template, &variables, Some(&rows), None, &template);
        self.settle(result)
    }

    /// Emit a sprite support class.
    pub fn emit_base_class(&mut self, base: BaseClass) -> Result<Emission> {
        log::info!("creating base class: {}", base.template_name());

        let array_type = if self.use_vector {
            "Vector.<DisplayObject>"
        } else {
            "Array"
        };
        let mut variables = Variables::new();
        variables.set("arraytype", array_type);

        let template = template_id(base.template_name());
        let result = self.emit_module(&template, &variables, None, None, &template);
        self.settle(result)
    }

    /// Emit the entry point, then the support class of every sprite
    /// flavour that was emitted at least once.
    pub fn finalize(&mut self) -> Result<()> {
        self.emit_entry_point()?;
        let bases: Vec<BaseClass> = self.base_classes.iter().copied().collect();
        for base in bases {
            self.emit_base_class(base)?;
        }
        Ok(())
    }

    /// Turn per-module failures into a skip; pass fatal errors through.
    fn settle(&mut self, result: Result<PathBuf>) -> Result<Emission> {
        match result {
            Ok(path) => Ok(Emission::Written(path)),
            Err(AsgenError::TemplateNotFound { id }) => {
                self.warn(
                    codes::TEMPLATE_NOT_FOUND,
                    format!("could not open template file {}", id),
                );
                Ok(Emission::Skipped)
            }
            Err(AsgenError::CannotCreate { path, message }) => {
                self.warn(
                    codes::CANNOT_CREATE,
                    format!("failed to open file {}: {}", path.display(), message),
                );
                Ok(Emission::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    fn record(&mut self, name: &str) {
        if !self.compile_list.iter().any(|n| n == name) {
            self.compile_list.push(name.to_string());
        }
    }
}

fn generated_header() -> String {
    format!(
        "//\n// {} {}\n// {}\n//\n// Automatically generated on {}\n//\n\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        COPYRIGHT,
        chrono::Local::now().format("%a %b %-d %H:%M:%S %Y"),
    )
}
