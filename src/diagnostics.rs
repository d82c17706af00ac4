//! Diagnostics collected during a generation run.
//!
//! Recoverable problems (unknown manifest tags, missing files, undefined
//! template variables) never stop a run. Each one is logged through the
//! `log` facade as it happens and kept here so callers can inspect or
//! summarise them afterwards.

use std::fmt;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Diagnostic codes.
pub mod codes {
    pub const UNKNOWN_TAG: &str = "asgen::manifest::unknown-tag";
    pub const UNKNOWN_ATTRIBUTE: &str = "asgen::manifest::unknown-attribute";
    pub const MISSING_ATTRIBUTE: &str = "asgen::manifest::missing-attribute";
    pub const MISSING_PATH: &str = "asgen::manifest::missing-path";
    pub const INVALID_VALUE: &str = "asgen::manifest::invalid-value";
    pub const UNDEFINED_VARIABLE: &str = "asgen::template::undefined-variable";
    pub const TEMPLATE_NOT_FOUND: &str = "asgen::template::not-found";
    pub const CANNOT_CREATE: &str = "asgen::emit::cannot-create";
    pub const UNSUPPORTED_TYPE: &str = "asgen::emit::unsupported-type";
    pub const UNDEFINED_CLASS: &str = "asgen::emit::undefined-class";
    pub const INVALID_NAME: &str = "asgen::output::invalid-name";
    pub const CANNOT_READ: &str = "asgen::scan::cannot-read";
    pub const FRAME_INDEX: &str = "asgen::scan::frame-index";
}

/// A single diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, see [`codes`].
    pub code: String,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Collects diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Error => log::error!("{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message));
    }

    pub fn error(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Diagnostic::error(code, message));
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    /// Count diagnostics carrying `code`.
    pub fn count(&self, code: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
