//! Asset records produced by discovery.
//!
//! An asset is one logical unit slated for a generated module: either a
//! single file (bitmap, sound, binary) or a sprite made of ordered frames.
//! Optional display properties are kept as the raw strings found in the
//! manifest; an empty string means "not set".

use std::fmt;

use super::file_type::FileType;

/// Highest frame count a sprite may reach.
pub const MAX_FRAMES: usize = 4096;

/// Generated class flavour of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetClass {
    Sprite,
    MovieClip,
    BitmapData,
    Sound,
    ByteArray,
    #[default]
    Undefined,
}

impl AssetClass {
    /// Template id used to generate modules of this class.
    pub fn template_name(&self) -> &'static str {
        match self {
            AssetClass::Sprite => "Sprite",
            AssetClass::MovieClip => "MovieClip",
            AssetClass::BitmapData => "BitmapData",
            AssetClass::Sound => "Sound",
            AssetClass::ByteArray => "ByteArray",
            AssetClass::Undefined => "[invalid]",
        }
    }

    /// Whether assets of this class carry a frame sequence.
    pub fn is_sprite(&self) -> bool {
        matches!(self, AssetClass::Sprite | AssetClass::MovieClip)
    }

    /// Classify a plain file by its extension.
    pub fn from_file_type(file_type: FileType) -> Self {
        match file_type {
            FileType::Png | FileType::Jpg | FileType::Gif => AssetClass::BitmapData,
            FileType::Mp3 => AssetClass::Sound,
            FileType::Bmp
            | FileType::Wav
            | FileType::Ogg
            | FileType::Swf
            | FileType::Xml
            | FileType::Txt
            | FileType::Json
            | FileType::Bin => AssetClass::ByteArray,
            FileType::Unsupported => AssetClass::Undefined,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

/// Support class generated once per sprite flavour in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseClass {
    ExtendedSprite,
    ExtendedMovieClip,
}

impl BaseClass {
    pub fn template_name(&self) -> &'static str {
        match self {
            BaseClass::ExtendedSprite => "ExtendedSprite",
            BaseClass::ExtendedMovieClip => "ExtendedMovieClip",
        }
    }

    /// Base class that generated sprites of `class` extend.
    pub fn for_class(class: AssetClass) -> Option<Self> {
        match class {
            AssetClass::Sprite => Some(BaseClass::ExtendedSprite),
            AssetClass::MovieClip => Some(BaseClass::ExtendedMovieClip),
            _ => None,
        }
    }
}

/// One frame of a sprite, or the property set of a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBit {
    pub name: String,
    /// Path relative to the output directory, forward slashes.
    pub path: String,
    pub x: String,
    pub y: String,
    pub alpha: String,
    pub visible: String,
}

impl AssetBit {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// True for frames reserved by a sparse sequence but never filled.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Frame x offset, `0` when unset.
    pub fn x_or_default(&self) -> &str {
        or_default(&self.x, "0")
    }

    /// Frame y offset, `0` when unset.
    pub fn y_or_default(&self) -> &str {
        or_default(&self.y, "0")
    }

    /// Frame alpha, `1.0` when unset.
    pub fn alpha_or_default(&self) -> &str {
        or_default(&self.alpha, "1.0")
    }

    /// Frame visibility, `true` when unset.
    pub fn visible_or_default(&self) -> &str {
        or_default(&self.visible, "true")
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// A single-file asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Asset {
    pub bit: AssetBit,
    pub class: AssetClass,
}

impl Asset {
    pub fn new(name: impl Into<String>, path: impl Into<String>, class: AssetClass) -> Self {
        Self {
            bit: AssetBit {
                name: name.into(),
                path: path.into(),
                ..Default::default()
            },
            class,
        }
    }

    pub fn name(&self) -> &str {
        &self.bit.name
    }

    pub fn path(&self) -> &str {
        &self.bit.path
    }
}

/// An animated asset made of ordered frames.
///
/// The frame list may contain empty entries when frame numbers are not
/// contiguous; those are emitted as empty rows, keeping frame numbering
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteAsset {
    pub asset: Asset,
    pub frames: Vec<AssetBit>,
}

impl SpriteAsset {
    pub fn new(name: impl Into<String>, class: AssetClass) -> Self {
        Self {
            asset: Asset::new(name, "", class),
            frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.asset.name()
    }

    pub fn class(&self) -> AssetClass {
        self.asset.class
    }

    /// Store a frame at `index`, growing the sequence as needed.
    ///
    /// Returns `false` and leaves the sprite untouched when `index` is not
    /// below [`MAX_FRAMES`].
    pub fn set_frame(&mut self, index: usize, frame: AssetBit) -> bool {
        if index >= MAX_FRAMES {
            return false;
        }
        if self.frames.len() <= index {
            self.frames.resize(index + 1, AssetBit::default());
        }
        self.frames[index] = frame;
        true
    }

    /// Number of frames that carry a path.
    pub fn filled_frames(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_empty()).count()
    }
}

/// A discovered asset of either shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEntry {
    Simple(Asset),
    Sprite(SpriteAsset),
}

impl AssetEntry {
    pub fn name(&self) -> &str {
        match self {
            AssetEntry::Simple(asset) => asset.name(),
            AssetEntry::Sprite(sprite) => sprite.name(),
        }
    }

    pub fn class(&self) -> AssetClass {
        match self {
            AssetEntry::Simple(asset) => asset.class,
            AssetEntry::Sprite(sprite) => sprite.class(),
        }
    }
}
