//! XML asset manifest (`definition.xml`).
//!
//! The manifest declares build settings at the top level and the assets to
//! compile under `<library>`:
//!
//! ```xml
//! <assets>
//!   <player>11.1</player>
//!   <library>
//!     <movieclips>
//!       <mc class="Walk" path="walk/">
//!         <frame path="0.png" x="2"/>
//!       </mc>
//!     </movieclips>
//!     <bitmaps><bmp class="Coin" path="coin.png"/></bitmaps>
//!   </library>
//! </assets>
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::config::{CompileArguments, CompileMode, DEFAULT_PLAYER, DEFAULT_QUALITY};
use crate::diagnostics::{codes, Diagnostics};
use crate::error::{AsgenError, Result};
use crate::system::{relative_path, slash_path};
use crate::template::TemplateEngine;
use crate::types::{Asset, AssetBit, AssetClass, AssetEntry, FileType, SpriteAsset};

use super::AssetProducer;

/// The name of the manifest file.
pub const DEFINITION_FILENAME: &str = "definition.xml";

const LIBRARY: &str = "library";
const PLAYER: &str = "player";
const QUALITY: &str = "quality";
const MODE: &str = "mode";
const NAME: &str = "name";
const SWC: &str = "swc";

const ATTR_CLASS: &str = "class";
const ATTR_PATH: &str = "path";
const ATTRIBUTES: [&str; 7] = [ATTR_CLASS, ATTR_PATH, "name", "x", "y", "alpha", "visible"];

/// A library category and the tags it accepts.
#[derive(Debug, Clone, Copy)]
struct Category {
    tag: &'static str,
    item: &'static str,
    /// Child tag of multi-frame items, for sprite categories.
    frame: Option<&'static str>,
    /// Class of sprite items; other items are classified by extension.
    class: AssetClass,
}

const CATEGORIES: [Category; 5] = [
    Category {
        tag: "sprites",
        item: "spr",
        frame: Some("object"),
        class: AssetClass::Sprite,
    },
    Category {
        tag: "movieclips",
        item: "mc",
        frame: Some("frame"),
        class: AssetClass::MovieClip,
    },
    Category {
        tag: "bitmaps",
        item: "bmp",
        frame: None,
        class: AssetClass::BitmapData,
    },
    Category {
        tag: "sounds",
        item: "snd",
        frame: None,
        class: AssetClass::Sound,
    },
    Category {
        tag: "binaries",
        item: "bin",
        frame: None,
        class: AssetClass::ByteArray,
    },
];

/// A well-formed manifest loaded from disk.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    source: String,
}

impl Manifest {
    /// Load `definition.xml` from `dir`, if present.
    ///
    /// Malformed XML is a [`AsgenError::Parse`] error.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(DEFINITION_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }

        let source = std::fs::read_to_string(&path).map_err(|e| AsgenError::Io {
            path: path.clone(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(path, source).map(Some)
    }

    /// Validate `source` as XML.
    pub fn parse(path: PathBuf, source: String) -> Result<Self> {
        Document::parse(&source).map_err(|e| parse_error(&e))?;
        Ok(Self { path, source })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn document(&self) -> Result<Document<'_>> {
        Document::parse(&self.source).map_err(|e| parse_error(&e))
    }

    /// Read the top-level settings.
    ///
    /// Unknown top-level tags and unparsable values are recorded in
    /// `diagnostics`.
    pub fn settings(&self, diagnostics: &mut Diagnostics) -> Result<ManifestSettings> {
        let doc = self.document()?;
        let root = doc.root_element();
        let mut settings = ManifestSettings::default();

        for node in root.children().filter(Node::is_element) {
            let tag = node.tag_name().name();
            let text = node.text().unwrap_or("").trim();

            match tag {
                LIBRARY => settings.has_library = true,
                MODE => match text.parse().ok().and_then(CompileMode::from_number) {
                    Some(mode) => settings.mode = mode,
                    None => invalid_value(diagnostics, tag, text),
                },
                PLAYER => match text.parse::<f32>() {
                    Ok(player) => settings.player = player,
                    Err(_) => invalid_value(diagnostics, tag, text),
                },
                QUALITY => match text.parse::<i64>() {
                    Ok(quality) => {
                        settings.quality = u8::try_from(quality)
                            .ok()
                            .filter(|q| *q <= 100)
                            .unwrap_or(DEFAULT_QUALITY);
                    }
                    Err(_) => invalid_value(diagnostics, tag, text),
                },
                NAME => settings.name = Some(text.to_string()).filter(|n| !n.is_empty()),
                SWC => settings.swc = text == "1",
                _ => warn_unknown_tag(diagnostics, tag, root.tag_name().name()),
            }
        }

        Ok(settings)
    }

    /// Fill the unset fields of `args` from this manifest.
    ///
    /// Caller values always win; the swc flag is set when either side asks
    /// for it.
    pub fn merge_into(&self, args: &mut CompileArguments, diagnostics: &mut Diagnostics) -> Result<()> {
        let settings = self.settings(diagnostics)?;

        if args.name.is_none() {
            args.name = settings.name;
        }
        args.swc |= settings.swc;
        if args.mode.is_none() {
            args.mode = Some(if settings.has_library {
                settings.mode
            } else {
                CompileMode::All
            });
        }
        args.player.get_or_insert(settings.player);
        args.quality.get_or_insert(settings.quality);

        Ok(())
    }

    /// Parse the `<library>` section into assets keyed by class name.
    ///
    /// Asset paths are resolved against `source_dir` and recorded relative
    /// to `output_dir`. A later declaration of the same class replaces the
    /// earlier one.
    pub fn assets(
        &self,
        source_dir: &Path,
        output_dir: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, AssetEntry>> {
        let doc = self.document()?;
        let mut reader = LibraryReader {
            source_dir,
            output_dir,
            diagnostics,
            assets: BTreeMap::new(),
        };

        let library = doc
            .root_element()
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == LIBRARY);

        if let Some(library) = library {
            for node in library.children().filter(Node::is_element) {
                let tag = node.tag_name().name();
                match CATEGORIES.iter().find(|c| c.tag == tag) {
                    Some(category) => reader.read_category(node, category),
                    None => warn_unknown_tag(reader.diagnostics, tag, LIBRARY),
                }
            }
        }

        Ok(reader.assets)
    }
}

/// Settings read from the manifest's top level, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSettings {
    pub player: f32,
    pub quality: u8,
    pub mode: CompileMode,
    pub name: Option<String>,
    pub swc: bool,
    pub has_library: bool,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER,
            quality: DEFAULT_QUALITY,
            mode: CompileMode::Definition,
            name: None,
            swc: false,
            has_library: false,
        }
    }
}

struct LibraryReader<'a> {
    source_dir: &'a Path,
    output_dir: &'a Path,
    diagnostics: &'a mut Diagnostics,
    assets: BTreeMap<String, AssetEntry>,
}

impl LibraryReader<'_> {
    fn read_category(&mut self, category_node: Node, category: &Category) {
        for node in category_node.children().filter(Node::is_element) {
            self.check_attributes(node);

            let tag = node.tag_name().name();
            if tag != category.item {
                warn_unknown_tag(self.diagnostics, tag, category.tag);
                continue;
            }

            let Some(class_name) = node.attribute(ATTR_CLASS).filter(|c| !c.is_empty()) else {
                warn_missing_attribute(self.diagnostics, ATTR_CLASS, tag);
                continue;
            };

            let has_frames = node.children().any(|c| c.is_element());
            let entry = match category.frame {
                Some(frame_tag) if has_frames => {
                    self.read_multi_frame(node, class_name, frame_tag, category.class)
                }
                _ => self.read_single_frame(node, class_name, category.class),
            };

            if let Some(entry) = entry {
                if self.assets.insert(class_name.to_string(), entry).is_some() {
                    log::debug!("'{}' declared more than once, keeping the last", class_name);
                }
            }
        }
    }

    fn read_single_frame(&mut self, node: Node, class_name: &str, class: AssetClass) -> Option<AssetEntry> {
        let tag = node.tag_name().name();
        let Some(path_attr) = node.attribute(ATTR_PATH).filter(|p| !p.is_empty()) else {
            warn_missing_attribute(self.diagnostics, ATTR_PATH, tag);
            return None;
        };

        let path = self.existing(&self.source_dir.join(path_attr))?;

        if class.is_sprite() {
            let mut sprite = SpriteAsset::new(class_name, class);
            let mut frame = read_bit(node);
            frame.path = path;
            sprite.frames.push(frame);
            Some(AssetEntry::Sprite(sprite))
        } else {
            let class = AssetClass::from_file_type(FileType::detect(&path));
            Some(AssetEntry::Simple(Asset::new(class_name, path, class)))
        }
    }

    fn read_multi_frame(
        &mut self,
        node: Node,
        class_name: &str,
        frame_tag: &str,
        class: AssetClass,
    ) -> Option<AssetEntry> {
        let base = self.source_dir.join(node.attribute(ATTR_PATH).unwrap_or(""));
        if !base.exists() {
            self.warn_missing_path(&base);
            return None;
        }

        let mut sprite = SpriteAsset::new(class_name, class);
        let parent = read_bit(node);
        sprite.asset.bit.x = parent.x;
        sprite.asset.bit.y = parent.y;
        sprite.asset.bit.alpha = parent.alpha;
        sprite.asset.bit.visible = parent.visible;

        for child in node.children().filter(Node::is_element) {
            self.check_attributes(child);

            let tag = child.tag_name().name();
            if tag != frame_tag {
                warn_unknown_tag(self.diagnostics, tag, node.tag_name().name());
                continue;
            }

            let Some(relative) = child.attribute(ATTR_PATH).filter(|p| !p.is_empty()) else {
                warn_missing_attribute(self.diagnostics, ATTR_PATH, tag);
                continue;
            };

            let Some(path) = self.existing(&base.join(relative)) else {
                continue;
            };

            let mut frame = read_bit(child);
            frame.path = path;
            sprite.frames.push(frame);
        }

        if sprite.frames.is_empty() {
            None
        } else {
            Some(AssetEntry::Sprite(sprite))
        }
    }

    /// Path relative to the output directory, if `path` exists.
    fn existing(&mut self, path: &Path) -> Option<String> {
        if path.exists() {
            Some(slash_path(&relative_path(self.output_dir, path)))
        } else {
            self.warn_missing_path(path);
            None
        }
    }

    fn warn_missing_path(&mut self, path: &Path) {
        self.diagnostics.warning(
            codes::MISSING_PATH,
            format!("path '{}' does not exist", path.display()),
        );
    }

    fn check_attributes(&mut self, node: Node) {
        let tag = node.tag_name().name();
        for attribute in node.attributes() {
            if !ATTRIBUTES.contains(&attribute.name()) {
                self.diagnostics.warning(
                    codes::UNKNOWN_ATTRIBUTE,
                    format!("invalid attribute '{}' in '{}'", attribute.name(), tag),
                );
            }
        }
    }
}

/// Display properties and name of a node; path is left empty.
fn read_bit(node: Node) -> AssetBit {
    let attr = |name: &str| node.attribute(name).unwrap_or("").to_string();
    AssetBit {
        name: attr("name"),
        path: String::new(),
        x: attr("x"),
        y: attr("y"),
        alpha: attr("alpha"),
        visible: attr("visible"),
    }
}

fn parse_error(e: &roxmltree::Error) -> AsgenError {
    AsgenError::Parse {
        message: format!("{} => {}", DEFINITION_FILENAME, e),
        help: Some(format!("Fix the XML syntax of {}", DEFINITION_FILENAME)),
    }
}

fn warn_unknown_tag(diagnostics: &mut Diagnostics, tag: &str, parent: &str) {
    diagnostics.warning(
        codes::UNKNOWN_TAG,
        format!(
            "invalid node '{}' in parent '{}' within {}",
            tag, parent, DEFINITION_FILENAME
        ),
    );
}

fn warn_missing_attribute(diagnostics: &mut Diagnostics, attribute: &str, tag: &str) {
    diagnostics.warning(
        codes::MISSING_ATTRIBUTE,
        format!("missing '{}' attribute in '{}' node", attribute, tag),
    );
}

fn invalid_value(diagnostics: &mut Diagnostics, tag: &str, text: &str) {
    diagnostics.warning(
        codes::INVALID_VALUE,
        format!("invalid value '{}' for '{}' in {}", text, tag, DEFINITION_FILENAME),
    );
}

/// Emits the assets declared in a manifest.
pub struct ManifestStrategy {
    manifest: Manifest,
    source_dir: PathBuf,
}

impl ManifestStrategy {
    pub fn new(manifest: Manifest, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            source_dir: source_dir.into(),
        }
    }
}

impl AssetProducer for ManifestStrategy {
    fn discover_and_emit(&mut self, engine: &mut TemplateEngine) -> Result<()> {
        log::info!("parse {}", DEFINITION_FILENAME);

        let output_dir = engine.output_dir().to_path_buf();
        let assets = self
            .manifest
            .assets(&self.source_dir, &output_dir, engine.diagnostics_mut())?;

        for entry in assets.values() {
            match entry {
                AssetEntry::Sprite(sprite) => engine.emit_sprite(sprite)?,
                AssetEntry::Simple(asset) => engine.emit_simple(asset)?,
            };
        }

        engine.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn manifest(xml: &str) -> Manifest {
        Manifest::parse(PathBuf::from(DEFINITION_FILENAME), xml.to_string()).unwrap()
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempdir().unwrap();
        assert!(Manifest::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITION_FILENAME), "<assets><library></assets>").unwrap();

        let err = Manifest::load(dir.path()).unwrap_err();
        match err {
            AsgenError::Parse { message, .. } => assert!(message.starts_with("definition.xml => ")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_settings_defaults() {
        let mut diagnostics = Diagnostics::new();
        let settings = manifest("<assets/>").settings(&mut diagnostics).unwrap();

        assert_eq!(settings, ManifestSettings::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_settings_values() {
        let mut diagnostics = Diagnostics::new();
        let settings = manifest(
            "<assets><player>10.2</player><quality>80</quality><mode>2</mode>\
             <name>game</name><swc>1</swc><library/></assets>",
        )
        .settings(&mut diagnostics)
        .unwrap();

        assert_eq!(settings.player, 10.2);
        assert_eq!(settings.quality, 80);
        assert_eq!(settings.mode, CompileMode::All);
        assert_eq!(settings.name.as_deref(), Some("game"));
        assert!(settings.swc);
        assert!(settings.has_library);
    }

    #[test]
    fn test_quality_out_of_range_becomes_default() {
        let mut diagnostics = Diagnostics::new();
        let settings = manifest("<assets><quality>250</quality></assets>")
            .settings(&mut diagnostics)
            .unwrap();
        assert_eq!(settings.quality, 100);
    }

    #[test]
    fn test_unknown_top_level_tag_warns() {
        let mut diagnostics = Diagnostics::new();
        manifest("<assets><author>me</author></assets>")
            .settings(&mut diagnostics)
            .unwrap();

        assert_eq!(diagnostics.count(codes::UNKNOWN_TAG), 1);
        let message = &diagnostics.iter().next().unwrap().message;
        assert_eq!(message, "invalid node 'author' in parent 'assets' within definition.xml");
    }

    #[test]
    fn test_caller_player_wins() {
        let mut diagnostics = Diagnostics::new();
        let manifest = manifest("<assets><player>10</player></assets>");

        let mut args = CompileArguments {
            player: Some(9.0),
            ..Default::default()
        };
        manifest.merge_into(&mut args, &mut diagnostics).unwrap();
        assert_eq!(args.player, Some(9.0));

        let mut args = CompileArguments::default();
        manifest.merge_into(&mut args, &mut diagnostics).unwrap();
        assert_eq!(args.player, Some(10.0));

        let mut args = CompileArguments::default();
        self::manifest("<assets/>")
            .merge_into(&mut args, &mut diagnostics)
            .unwrap();
        assert_eq!(args.player, Some(DEFAULT_PLAYER));
    }

    #[test]
    fn test_mode_follows_library_presence() {
        let mut diagnostics = Diagnostics::new();

        let mut args = CompileArguments::default();
        manifest("<assets><mode>1</mode></assets>")
            .merge_into(&mut args, &mut diagnostics)
            .unwrap();
        assert_eq!(args.mode, Some(CompileMode::All));

        let mut args = CompileArguments::default();
        manifest("<assets><library/></assets>")
            .merge_into(&mut args, &mut diagnostics)
            .unwrap();
        assert_eq!(args.mode, Some(CompileMode::Definition));

        let mut args = CompileArguments {
            mode: Some(CompileMode::All),
            ..Default::default()
        };
        manifest("<assets><library/></assets>")
            .merge_into(&mut args, &mut diagnostics)
            .unwrap();
        assert_eq!(args.mode, Some(CompileMode::All));
    }

    #[test]
    fn test_caller_name_wins() {
        let mut diagnostics = Diagnostics::new();
        let mut args = CompileArguments {
            name: Some("mine".to_string()),
            ..Default::default()
        };
        manifest("<assets><name>theirs</name><swc>1</swc></assets>")
            .merge_into(&mut args, &mut diagnostics)
            .unwrap();

        assert_eq!(args.name.as_deref(), Some("mine"));
        assert!(args.swc);
    }

    #[test]
    fn test_assets_single_and_multi_frame() {
        let dir = tempdir().unwrap();
        let out = dir.path().join(".temp");
        fs::create_dir_all(dir.path().join("walk")).unwrap();
        fs::write(dir.path().join("walk/0.png"), b"").unwrap();
        fs::write(dir.path().join("walk/1.png"), b"").unwrap();
        fs::write(dir.path().join("coin.png"), b"").unwrap();
        fs::write(dir.path().join("hero.png"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library>
                <movieclips>
                  <mc class="Walk" path="walk/" x="5">
                    <frame path="0.png" name="a"/>
                    <frame path="1.png" alpha="0.5"/>
                  </mc>
                </movieclips>
                <sprites><spr class="Hero" path="hero.png" y="7"/></sprites>
                <bitmaps><bmp class="Coin" path="coin.png"/></bitmaps>
              </library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), &out, &mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["Coin", "Hero", "Walk"]);

        let AssetEntry::Sprite(walk) = &assets["Walk"] else {
            panic!("Walk should be a sprite");
        };
        assert_eq!(walk.class(), AssetClass::MovieClip);
        assert_eq!(walk.asset.bit.x, "5");
        assert_eq!(walk.frames.len(), 2);
        assert_eq!(walk.frames[0].path, "../walk/0.png");
        assert_eq!(walk.frames[0].name, "a");
        assert_eq!(walk.frames[1].alpha, "0.5");

        let AssetEntry::Sprite(hero) = &assets["Hero"] else {
            panic!("Hero should be a sprite");
        };
        assert_eq!(hero.frames.len(), 1);
        assert_eq!(hero.frames[0].y, "7");
        assert!(hero.asset.bit.y.is_empty());

        let AssetEntry::Simple(coin) = &assets["Coin"] else {
            panic!("Coin should be simple");
        };
        assert_eq!(coin.class, AssetClass::BitmapData);
        assert_eq!(coin.path(), "../coin.png");
    }

    #[test]
    fn test_unknown_library_tag_does_not_stop_siblings() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("jump.mp3"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library>
                <videos><vid class="Intro" path="intro.flv"/></videos>
                <sounds><snd class="Jump" path="jump.mp3"/></sounds>
              </library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), dir.path(), &mut diagnostics).unwrap();

        assert_eq!(diagnostics.count(codes::UNKNOWN_TAG), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(assets.contains_key("Jump"));
    }

    #[test]
    fn test_declaration_warnings() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library><binaries>
                <bin path="a.bin"/>
                <bin class="Missing" path="nope.bin"/>
                <bin class="NoPath"/>
                <bin class="Data" path="a.bin" colour="red"/>
                <bmp class="Wrong" path="a.bin"/>
              </binaries></library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), dir.path(), &mut diagnostics).unwrap();

        assert_eq!(diagnostics.count(codes::MISSING_ATTRIBUTE), 2);
        assert_eq!(diagnostics.count(codes::MISSING_PATH), 1);
        assert_eq!(diagnostics.count(codes::UNKNOWN_ATTRIBUTE), 1);
        assert_eq!(diagnostics.count(codes::UNKNOWN_TAG), 1);
        assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["Data"]);
    }

    #[test]
    fn test_missing_frame_skipped_siblings_kept() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("spin")).unwrap();
        fs::write(dir.path().join("spin/a.png"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library><movieclips>
                <mc class="Spin" path="spin">
                  <frame path="a.png"/>
                  <frame path="b.png"/>
                  <object path="a.png"/>
                </mc>
              </movieclips></library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), dir.path(), &mut diagnostics).unwrap();

        assert_eq!(diagnostics.count(codes::MISSING_PATH), 1);
        assert_eq!(diagnostics.count(codes::UNKNOWN_TAG), 1);
        let AssetEntry::Sprite(spin) = &assets["Spin"] else {
            panic!("Spin should be a sprite");
        };
        assert_eq!(spin.frames.len(), 1);
        assert_eq!(spin.frames[0].path, "spin/a.png");
    }

    #[test]
    fn test_simple_class_follows_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("jump.mp3"), b"").unwrap();
        fs::write(dir.path().join("level.json"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library>
                <bitmaps><bmp class="Jump" path="jump.mp3"/></bitmaps>
                <sounds><snd class="Level" path="level.json"/></sounds>
              </library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), dir.path(), &mut diagnostics).unwrap();

        let AssetEntry::Simple(jump) = &assets["Jump"] else {
            panic!("Jump should be simple");
        };
        assert_eq!(jump.class, AssetClass::Sound);
        let AssetEntry::Simple(level) = &assets["Level"] else {
            panic!("Level should be simple");
        };
        assert_eq!(level.class, AssetClass::ByteArray);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_later_declaration_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();

        let manifest = manifest(
            r#"<assets><library><bitmaps>
                <bmp class="Tile" path="a.png"/>
                <bmp class="Tile" path="b.png"/>
              </bitmaps></library></assets>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let assets = manifest.assets(dir.path(), dir.path(), &mut diagnostics).unwrap();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets["Tile"].name(), "Tile");
        let AssetEntry::Simple(tile) = &assets["Tile"] else {
            panic!("Tile should be simple");
        };
        assert_eq!(tile.path(), "b.png");
    }
}
