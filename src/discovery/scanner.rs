//! Convention-based discovery.
//!
//! Walks a directory tree and groups files into sprite families by their
//! names. With the default patterns, `mc0__walk.png`, `mc1__walk.png`, ...
//! become the frames of a movie clip `walk`, and `sp0__hero.png`, ... the
//! members of a sprite `hero`. Everything else is emitted as a plain asset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, CONFIG_FILENAME};
use crate::diagnostics::codes;
use crate::error::{AsgenError, Result};
use crate::system::{relative_path, slash_path};
use crate::template::TemplateEngine;
use crate::types::{Asset, AssetBit, AssetClass, FileType, SpriteAsset, MAX_FRAMES};

use super::manifest::DEFINITION_FILENAME;
use super::AssetProducer;

const DIGITS: &str = r"\d+";

/// A family prefix pattern and its zero-variant.
#[derive(Debug, Clone)]
pub struct FamilyPattern {
    class: AssetClass,
    prefix: Regex,
    zero: Regex,
}

impl FamilyPattern {
    /// Compile `pattern`, which must contain one `\d+` component.
    pub fn new(pattern: &str, class: AssetClass) -> Result<Self> {
        if !pattern.contains(DIGITS) {
            return Err(AsgenError::Config {
                message: format!("pattern '{}' has no {} component", pattern, DIGITS),
                help: Some(r"e.g. ^mc\d+__".to_string()),
            });
        }

        let zero = pattern.replacen(DIGITS, "0", 1);
        Ok(Self {
            class,
            prefix: compile(pattern)?,
            zero: compile(&zero)?,
        })
    }

    pub fn class(&self) -> AssetClass {
        self.class
    }

    /// Family name and frame index of `name`, if it belongs to a family.
    ///
    /// The family name is `name` without the matched prefix. A digit right
    /// after the prefix means the number continues, so the name is not a
    /// member.
    pub fn member(&self, name: &str) -> Option<(String, usize)> {
        let found = self.prefix.find(name)?;
        let rest = &name[found.end()..];
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let family = format!("{}{}", &name[..found.start()], rest);
        if family.is_empty() {
            return None;
        }
        let index = first_number(found.as_str())?;
        Some((family, index))
    }

    /// Whether `name` carries the family's zero-variant prefix.
    pub fn is_zero(&self, name: &str) -> bool {
        self.zero.is_match(name)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AsgenError::Config {
        message: format!("invalid pattern '{}': {}", pattern, e),
        help: Some(format!("Check the patterns in {}", CONFIG_FILENAME)),
    })
}

fn first_number(text: &str) -> Option<usize> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Remove everything from the last `marker` to the end of `name`.
pub fn strip_ignored_suffix<'n>(name: &'n str, marker: &str) -> &'n str {
    if marker.is_empty() {
        return name;
    }
    match name.rfind(marker) {
        Some(index) => &name[..index],
        None => name,
    }
}

/// A file in the directory being processed.
#[derive(Debug, Clone)]
struct Listed {
    path: PathBuf,
    /// Base name with the ignored suffix removed.
    name: String,
}

/// How a file is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Role {
    /// Zero-variant member: emits the whole family.
    Family { class: AssetClass, name: String },
    /// Member of a family triggered by a sibling.
    Member,
    Plain,
}

/// Emits assets found by walking a directory.
pub struct ConventionStrategy {
    root: PathBuf,
    /// Movie clips first: they win when both patterns match.
    patterns: [FamilyPattern; 2],
    suffix_ignore: String,
}

impl ConventionStrategy {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            patterns: [
                FamilyPattern::new(&config.movieclip_pattern, AssetClass::MovieClip)?,
                FamilyPattern::new(&config.sprite_pattern, AssetClass::Sprite)?,
            ],
            suffix_ignore: config.suffix_ignore.clone(),
        })
    }

    fn walk(&self, dir: &Path, engine: &mut TemplateEngine) -> Result<()> {
        log::info!("parsing: {}", dir.display());

        let entries = list_dir(dir, engine);
        let files: Vec<Listed> = entries
            .iter()
            .filter(|e| e.file_type().is_file())
            .filter(|e| !(dir == self.root && is_reserved(e)))
            .map(|e| Listed {
                name: self.base_name(e.path()),
                path: e.path().to_path_buf(),
            })
            .collect();

        let mut emitted: HashSet<(AssetClass, String)> = HashSet::new();

        for entry in &entries {
            if entry.file_type().is_dir() {
                self.walk(entry.path(), engine)?;
                continue;
            }
            let Some(file) = files.iter().find(|f| f.path == entry.path()) else {
                continue;
            };

            match self.role(file, &files) {
                Role::Family { class, name } => {
                    if emitted.insert((class, name.clone())) {
                        let sprite = self.family(class, &name, &files, engine);
                        engine.emit_sprite(&sprite)?;
                    }
                }
                Role::Member => {}
                Role::Plain => {
                    let path = relative(engine, &file.path);
                    let class = AssetClass::from_file_type(FileType::detect(&path));
                    engine.emit_simple(&Asset::new(file.name.clone(), path, class))?;
                }
            }
        }

        Ok(())
    }

    fn base_name(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        strip_ignored_suffix(&stem, &self.suffix_ignore).to_string()
    }

    fn role(&self, file: &Listed, files: &[Listed]) -> Role {
        for pattern in &self.patterns {
            if !pattern.prefix.is_match(&file.name) {
                continue;
            }
            let Some((family, _)) = pattern.member(&file.name) else {
                return Role::Plain;
            };
            if pattern.is_zero(&file.name) {
                return Role::Family {
                    class: pattern.class(),
                    name: family,
                };
            }
            let triggered = files.iter().any(|sibling| {
                pattern.is_zero(&sibling.name)
                    && pattern.member(&sibling.name).is_some_and(|(f, _)| f == family)
            });
            return if triggered { Role::Member } else { Role::Plain };
        }
        Role::Plain
    }

    /// Collect the frames of `family` from the directory listing.
    fn family(
        &self,
        class: AssetClass,
        family: &str,
        files: &[Listed],
        engine: &mut TemplateEngine,
    ) -> SpriteAsset {
        let mut sprite = SpriteAsset::new(family, class);
        let Some(pattern) = self.patterns.iter().find(|p| p.class() == class) else {
            return sprite;
        };

        for file in files {
            match pattern.member(&file.name) {
                Some((name, index)) if name == family => {
                    let path = relative(engine, &file.path);
                    if !sprite.set_frame(index, AssetBit::with_path(path)) {
                        engine.warn(
                            codes::FRAME_INDEX,
                            format!(
                                "skipping '{}': frame index {} exceeds the limit of {}",
                                file.path.display(),
                                index,
                                MAX_FRAMES
                            ),
                        );
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "family '{}': {} of {} frames present",
            family,
            sprite.filled_frames(),
            sprite.frames.len()
        );
        sprite
    }
}

impl AssetProducer for ConventionStrategy {
    fn discover_and_emit(&mut self, engine: &mut TemplateEngine) -> Result<()> {
        let started = Instant::now();
        let root = self.root.clone();
        self.walk(&root, engine)?;
        engine.finalize()?;
        log::info!("parsing took {:.3} seconds", started.elapsed().as_secs_f32());
        Ok(())
    }
}

/// Entries of `dir` sorted by name, hidden entries and symlinks left out.
fn list_dir(dir: &Path, engine: &mut TemplateEngine) -> Vec<DirEntry> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        match entry {
            Ok(entry) if entry.path_is_symlink() => {}
            Ok(entry) => entries.push(entry),
            Err(e) => engine.warn(codes::CANNOT_READ, format!("skipping unreadable entry: {}", e)),
        }
    }
    entries
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Project files at the root are not assets.
fn is_reserved(entry: &DirEntry) -> bool {
    let name = entry.file_name();
    name == CONFIG_FILENAME || name == DEFINITION_FILENAME
}

fn relative(engine: &TemplateEngine, path: &Path) -> String {
    slash_path(&relative_path(engine.output_dir(), path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::EngineOptions;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, b"").unwrap();
        }
    }

    /// Run discovery over `src` inside `root`, generating into `root/out`.
    fn run(root: &TempDir) -> TemplateEngine {
        let out = root.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let mut engine = TemplateEngine::new(EngineOptions::new(&out));
        let mut strategy = ConventionStrategy::new(root.path().join("src"), &Config::default()).unwrap();
        strategy.discover_and_emit(&mut engine).unwrap();
        engine
    }

    fn mc() -> FamilyPattern {
        FamilyPattern::new(r"^mc\d+__", AssetClass::MovieClip).unwrap()
    }

    #[test]
    fn test_strip_ignored_suffix() {
        assert_eq!(strip_ignored_suffix("photo___extra", "___"), "photo");
        assert_eq!(strip_ignored_suffix("a___b___c", "___"), "a___b");
        assert_eq!(strip_ignored_suffix("photo", "___"), "photo");
        assert_eq!(strip_ignored_suffix("photo___x", ""), "photo___x");
    }

    #[test]
    fn test_pattern_needs_digits() {
        let err = FamilyPattern::new("^mc__", AssetClass::MovieClip).unwrap_err();
        assert!(matches!(err, AsgenError::Config { .. }));
    }

    #[test]
    fn test_invalid_regex() {
        let err = FamilyPattern::new(r"^mc(\d+__", AssetClass::MovieClip).unwrap_err();
        assert!(matches!(err, AsgenError::Config { .. }));
    }

    #[test]
    fn test_member() {
        let pattern = mc();
        assert_eq!(pattern.member("mc0__walk"), Some(("walk".to_string(), 0)));
        assert_eq!(pattern.member("mc12__walk"), Some(("walk".to_string(), 12)));
        assert_eq!(pattern.member("walk"), None);
        assert_eq!(pattern.member("mc1__"), None);
        assert_eq!(pattern.member("mc1__2walk"), None);
    }

    #[test]
    fn test_zero_variant() {
        let pattern = mc();
        assert!(pattern.is_zero("mc0__walk"));
        assert!(!pattern.is_zero("mc5__walk"));
    }

    #[test]
    fn test_sparse_family() {
        let root = tempdir().unwrap();
        touch(&root.path().join("src"), &["mc0__a0.png", "mc2__a0.png"]);

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["a0".to_string()]);
        let text = fs::read_to_string(root.path().join("out/a0.as")).unwrap();
        let rows: Vec<&str> = text.lines().filter(|l| l.contains("[Embed(")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains(r#"source="../src/mc0__a0.png""#));
        assert!(rows[1].contains(r#"source="""#));
        assert!(rows[2].contains(r#"source="../src/mc2__a0.png""#));
    }

    #[test]
    fn test_out_of_range_frame_index_skipped() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &["mc0__x.png", "mc1__x.png", "mc18446744073709551615__x.png", "mc4000000000__x.png"],
        );

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["x".to_string()]);
        assert_eq!(engine.diagnostics().count(codes::FRAME_INDEX), 2);
        let text = fs::read_to_string(root.path().join("out/x.as")).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains("[Embed(")).count(), 2);
    }

    #[test]
    fn test_lone_numbered_file_is_plain() {
        let root = tempdir().unwrap();
        touch(&root.path().join("src"), &["mc5__hero.png"]);

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["mc5__hero".to_string()]);
        let text = fs::read_to_string(root.path().join("out/mc5__hero.as")).unwrap();
        assert!(text.contains("extends BitmapData"));
    }

    #[test]
    fn test_family_emitted_once() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &["mc0__run.png", "mc1__run.png", "mc2__run.png", "sp0__hud.png", "sp1__hud.png"],
        );

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["run".to_string(), "hud".to_string()]);
        assert_eq!(engine.diagnostics().len(), 0);
        let hud = fs::read_to_string(root.path().join("out/hud.as")).unwrap();
        assert!(hud.contains("extends ExtendedSprite"));
        assert_eq!(hud.matches("addMember(").count(), 2);
        assert!(root.path().join("out/ExtendedSprite.as").exists());
        assert!(root.path().join("out/ExtendedMovieClip.as").exists());
    }

    #[test]
    fn test_suffix_stripped_before_matching() {
        let root = tempdir().unwrap();
        touch(&root.path().join("src"), &["photo___extra.png", "mc0__jump___v2.png"]);

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["jump".to_string(), "photo".to_string()]);
    }

    #[test]
    fn test_depth_first_alphabetical() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &["b.png", "a/z.mp3", "a/c/y.json", "c.txt", ".hidden.png"],
        );

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["y", "z", "b", "c"].map(String::from));
    }

    #[test]
    fn test_families_are_per_directory() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &["left/mc0__door.png", "right/mc1__door.png"],
        );

        let engine = run(&root);

        // The right-hand file has no zero-variant sibling.
        assert_eq!(engine.compile_list(), &["door".to_string(), "mc1__door".to_string()]);
    }

    #[test]
    fn test_unsupported_files_warn() {
        let root = tempdir().unwrap();
        touch(&root.path().join("src"), &["notes.docx", "logo.png"]);

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["logo".to_string()]);
        assert_eq!(engine.diagnostics().count(codes::UNSUPPORTED_TYPE), 1);
    }

    #[test]
    fn test_project_files_skipped_at_root() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &[CONFIG_FILENAME, DEFINITION_FILENAME, "data/definition.xml"],
        );

        let engine = run(&root);

        assert_eq!(engine.compile_list(), &["definition".to_string()]);
    }

    #[test]
    fn test_idempotent() {
        let root = tempdir().unwrap();
        touch(
            &root.path().join("src"),
            &["mc0__a.png", "mc3__a.png", "sp0__b.png", "x.mp3", "d/y.png"],
        );

        let first = run(&root);
        let first_main = fs::read_to_string(root.path().join("out/Main.as")).unwrap();
        let first_a = fs::read_to_string(root.path().join("out/a.as")).unwrap();
        let second = run(&root);
        let second_main = fs::read_to_string(root.path().join("out/Main.as")).unwrap();
        let second_a = fs::read_to_string(root.path().join("out/a.as")).unwrap();

        assert_eq!(first.compile_list(), second.compile_list());
        assert_eq!(body(&first_main), body(&second_main));
        assert_eq!(body(&first_a), body(&second_a));
    }

    fn body(text: &str) -> &str {
        text.split_once("//\n\n").map(|(_, b)| b).unwrap_or(text)
    }
}
