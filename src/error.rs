use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for asgen operations
#[derive(Error, Diagnostic, Debug)]
pub enum AsgenError {
    #[error("IO error: {0}")]
    #[diagnostic(code(asgen::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(asgen::io))]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(asgen::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(asgen::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Template not found: {id}")]
    #[diagnostic(
        code(asgen::template::not_found),
        help("Check the templates directory or remove the override")
    )]
    TemplateNotFound { id: String },

    #[error("Cannot create {path}: {message}")]
    #[diagnostic(code(asgen::emit::cannot_create))]
    CannotCreate { path: PathBuf, message: String },

    #[error("Out of pool memory: requested {requested} bytes, {available} of {capacity} available")]
    #[diagnostic(
        code(asgen::pool::exhausted),
        help("Raise `pool_capacity` in asgen.yaml or pass --pool-capacity")
    )]
    PoolExhausted {
        requested: usize,
        available: usize,
        capacity: usize,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(asgen::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl AsgenError {
    /// Whether this error must abort the whole run.
    ///
    /// Template lookups and output file creation fail per module; the
    /// remaining modules still get generated.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AsgenError::TemplateNotFound { .. } | AsgenError::CannotCreate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AsgenError>;
