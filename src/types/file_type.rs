//! File type detection by extension.

use std::path::Path;

/// Media file types recognised by discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Png,
    Jpg,
    Gif,
    Bmp,
    Wav,
    Mp3,
    Ogg,
    Swf,
    Xml,
    Txt,
    Json,
    Bin,
    Unsupported,
}

impl FileType {
    /// Detect the type of a file from its name.
    ///
    /// Matching is case-insensitive. Names without an extension are
    /// treated as raw binaries.
    pub fn detect(name: &str) -> Self {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return FileType::Bin;
        };

        match ext.to_ascii_lowercase().as_str() {
            "png" => FileType::Png,
            "jpg" => FileType::Jpg,
            "gif" => FileType::Gif,
            "bmp" => FileType::Bmp,
            "wav" => FileType::Wav,
            "mp3" => FileType::Mp3,
            "ogg" => FileType::Ogg,
            "swf" => FileType::Swf,
            "xml" => FileType::Xml,
            "txt" => FileType::Txt,
            "json" => FileType::Json,
            "exe" => FileType::Bin,
            _ => FileType::Unsupported,
        }
    }

    /// MIME type used in generated embed statements.
    pub fn mime(&self) -> &'static str {
        match self {
            FileType::Png => "image/png",
            FileType::Jpg => "image/jpg",
            FileType::Gif => "image/gif",
            FileType::Mp3 => "audio/mpeg",
            _ => "application/octet-stream",
        }
    }

    pub fn is_supported(&self) -> bool {
        *self != FileType::Unsupported
    }
}
