//! Building the generated sources into an artifact.
//!
//! The run only prepares a [`BuildRequest`]; an [`ArtifactBuilder`] turns
//! it into a `.swf` or `.swc`. [`FlexSdk`] drives the Flex SDK compilers.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::error::{AsgenError, Result};

/// Player version assumed when no player directory matches.
const FALLBACK_PLAYER: f32 = 9.0;

/// Inputs of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    /// Directory holding the generated modules.
    pub source_dir: PathBuf,
    /// The entry-point module.
    pub main_file: PathBuf,
    /// Artifact to produce.
    pub output: PathBuf,
    pub player: f32,
    pub quality: u8,
    /// Produce a packaged library instead of a standalone artifact.
    pub swc: bool,
}

/// Result of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub exit_code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Produces a build artifact from generated sources.
pub trait ArtifactBuilder {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome>;
}

/// A Flex SDK installation.
#[derive(Debug, Clone)]
pub struct FlexSdk {
    home: PathBuf,
}

impl FlexSdk {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Locate the SDK from `FLEX_HOME`.
    pub fn from_env() -> Option<Self> {
        std::env::var_os("FLEX_HOME").map(Self::new)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    fn libs(&self) -> PathBuf {
        self.home.join("frameworks").join("libs")
    }

    /// Player version and directory to compile against.
    ///
    /// Falls back to the highest installed version when `player` has no
    /// directory of its own.
    pub fn player_dir(&self, player: f32) -> (f32, PathBuf) {
        let players = self.libs().join("player");
        let wanted = players.join(player.to_string());
        if wanted.is_dir() {
            return (player, wanted);
        }

        log::warn!("no flex player directory {}", wanted.display());
        let installed = std::fs::read_dir(&players)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_string_lossy().parse::<f32>().ok())
            .fold(FALLBACK_PLAYER, f32::max);

        let dir = players.join(installed.to_string());
        log::warn!("using default player directory {}", dir.display());
        (installed, dir)
    }

    /// Compiler executable and arguments for `request`.
    pub fn command_line(&self, request: &BuildRequest) -> (PathBuf, Vec<String>) {
        let bin = self.home.join("bin");
        let libs = self.libs();
        let (player, player_dir) = self.player_dir(request.player);
        let mut args = Vec::new();

        let program = if request.swc {
            args.push("-source-path".to_string());
            args.push(request.source_dir.display().to_string());
            args.push("-include-classes".to_string());
            args.push(main_class(&request.main_file));
            bin.join("compc")
        } else {
            args.push(request.main_file.display().to_string());
            args.push("-default-size=1,1".to_string());
            args.push("-default-background-color=0xffffff".to_string());
            args.push("-static-link-runtime-shared-libraries=true".to_string());
            bin.join("mxmlc")
        };

        args.push("-output".to_string());
        args.push(request.output.display().to_string());
        args.push(format!("-target-player={}", player));
        args.push("-strict".to_string());
        args.push(format!(
            "-library-path+={}",
            player_dir.join("playerglobal.swc").display()
        ));
        args.push(format!("-library-path+={}", libs.join("core.swc").display()));
        args.push("-use-network=true".to_string());
        args.push("-define=CONFIG::DEBUG,true".to_string());
        args.push("-define=CONFIG::FP10,true".to_string());
        args.push("-define=CONFIG::FP9,false".to_string());

        (program, args)
    }
}

impl ArtifactBuilder for FlexSdk {
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome> {
        let (program, args) = self.command_line(request);
        log::info!(
            "compile {} as {} ...",
            request.main_file.display(),
            request.output.display()
        );

        let started = Instant::now();
        let output = Command::new(&program)
            .args(&args)
            .current_dir(&request.source_dir)
            .output()
            .map_err(|e| AsgenError::Build {
                message: format!("Failed to run {}: {}", program.display(), e),
                help: Some("Check --flex-home or the FLEX_HOME variable".to_string()),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let outcome = BuildOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            output: text,
        };
        if outcome.success() {
            log::info!(
                "compilation of {} completed in {:.2} sec",
                request.output.display(),
                started.elapsed().as_secs_f32()
            );
        }
        Ok(outcome)
    }
}

fn main_class(main_file: &Path) -> String {
    main_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn request(swc: bool) -> BuildRequest {
        BuildRequest {
            source_dir: PathBuf::from("/work/.temp"),
            main_file: PathBuf::from("/work/.temp/Main.as"),
            output: PathBuf::from("/work/art.swf"),
            player: 11.1,
            quality: 100,
            swc,
        }
    }

    #[test]
    fn test_player_dir_exact() {
        let sdk_dir = tempdir().unwrap();
        let wanted = sdk_dir.path().join("frameworks/libs/player/11.1");
        fs::create_dir_all(&wanted).unwrap();

        let sdk = FlexSdk::new(sdk_dir.path());
        assert_eq!(sdk.player_dir(11.1), (11.1, wanted));
    }

    #[test]
    fn test_player_dir_falls_back_to_highest() {
        let sdk_dir = tempdir().unwrap();
        for version in ["10.2", "10.3", "notes"] {
            fs::create_dir_all(sdk_dir.path().join("frameworks/libs/player").join(version)).unwrap();
        }

        let sdk = FlexSdk::new(sdk_dir.path());
        let (player, dir) = sdk.player_dir(11.1);

        assert_eq!(player, 10.3);
        assert!(dir.ends_with("10.3"));
    }

    #[test]
    fn test_player_dir_without_install() {
        let sdk_dir = tempdir().unwrap();
        let sdk = FlexSdk::new(sdk_dir.path());

        assert_eq!(sdk.player_dir(11.1).0, 9.0);
    }

    #[test]
    fn test_swf_command_line() {
        let sdk = FlexSdk::new("/sdk");
        let (program, args) = sdk.command_line(&request(false));

        assert_eq!(program, PathBuf::from("/sdk/bin/mxmlc"));
        assert_eq!(args[0], "/work/.temp/Main.as");
        assert!(args.contains(&"-static-link-runtime-shared-libraries=true".to_string()));
        let output = args.iter().position(|a| a == "-output").unwrap();
        assert_eq!(args[output + 1], "/work/art.swf");
        assert!(args.contains(&"-target-player=9".to_string()));
        assert!(args.contains(&"-strict".to_string()));
    }

    #[test]
    fn test_swc_command_line() {
        let sdk = FlexSdk::new("/sdk");
        let (program, args) = sdk.command_line(&request(true));

        assert_eq!(program, PathBuf::from("/sdk/bin/compc"));
        assert_eq!(
            &args[..4],
            &["-source-path", "/work/.temp", "-include-classes", "Main"].map(String::from)
        );
        assert!(!args.iter().any(|a| a.starts_with("-default-size")));
    }

    #[test]
    fn test_missing_compiler_is_build_error() {
        let sdk_dir = tempdir().unwrap();
        let sdk = FlexSdk::new(sdk_dir.path());
        let mut request = request(false);
        request.source_dir = sdk_dir.path().to_path_buf();

        let err = sdk.build(&request).unwrap_err();
        assert!(matches!(err, AsgenError::Build { .. }));
    }

    #[test]
    fn test_outcome_success() {
        let ok = BuildOutcome {
            exit_code: 0,
            output: String::new(),
        };
        assert!(ok.success());
        assert!(!BuildOutcome { exit_code: 2, ..ok }.success());
    }
}
