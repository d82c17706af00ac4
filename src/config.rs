//! Project configuration.
//!
//! Two layers feed a run:
//! - `asgen.yaml` at the target directory root: naming patterns, template
//!   overrides, pool sizing and stage defaults.
//! - [`CompileArguments`]: values supplied by the caller, merged with the
//!   manifest settings (caller always wins).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AsgenError, Result};
use crate::pool::DEFAULT_POOL_CAPACITY;

/// The name of the project config file.
pub const CONFIG_FILENAME: &str = "asgen.yaml";

/// Player version used when neither caller nor manifest sets one.
pub const DEFAULT_PLAYER: f32 = 11.1;

/// Quality used when neither caller nor manifest sets one.
pub const DEFAULT_QUALITY: u8 = 100;

/// Project config loaded from asgen.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix pattern for movie-clip frame files; one `\d+` component.
    pub movieclip_pattern: String,

    /// Prefix pattern for sprite member files; one `\d+` component.
    pub sprite_pattern: String,

    /// Everything from the last occurrence of this marker to the end of a
    /// file's base name is ignored.
    pub suffix_ignore: String,

    /// Capacity of the generated-file handle pool, in bytes.
    pub pool_capacity: usize,

    /// Directory whose files override the built-in templates.
    pub templates: Option<PathBuf>,

    pub stage: Stage,

    /// Flex SDK location used by `build --compile`.
    pub flex_home: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movieclip_pattern: r"^mc\d+__".to_string(),
            sprite_pattern: r"^sp\d+__".to_string(),
            suffix_ignore: "___".to_string(),
            pool_capacity: DEFAULT_POOL_CAPACITY,
            templates: None,
            stage: Stage::default(),
            flex_home: None,
        }
    }
}

impl Config {
    /// Load config from an asgen.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AsgenError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `asgen.yaml` from `dir`, or defaults when absent.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| AsgenError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Render this config as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| AsgenError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}

/// Stage settings for the entry-point module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub fps: u32,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            background: "#ffffff".to_string(),
            fps: 24,
        }
    }
}

/// Which assets a run compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Only what the manifest declares.
    Definition,
    /// Everything found in the target directory.
    All,
}

impl CompileMode {
    pub fn from_number(value: i64) -> Option<Self> {
        match value {
            1 => Some(CompileMode::Definition),
            2 => Some(CompileMode::All),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            CompileMode::Definition => 1,
            CompileMode::All => 2,
        }
    }
}

impl fmt::Display for CompileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileMode::Definition => write!(f, "definition"),
            CompileMode::All => write!(f, "all"),
        }
    }
}

/// Build settings for one run.
///
/// Unset fields are filled from the manifest, then from defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileArguments {
    pub name: Option<String>,
    pub player: Option<f32>,
    pub mode: Option<CompileMode>,
    pub quality: Option<u8>,
    pub swc: bool,
}

impl CompileArguments {
    pub fn player_or_default(&self) -> f32 {
        self.player.unwrap_or(DEFAULT_PLAYER)
    }

    pub fn quality_or_default(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }

    /// Generated sprites use typed vectors from player 11 on.
    pub fn use_vector(&self) -> bool {
        self.player_or_default() >= 11.0
    }
}
