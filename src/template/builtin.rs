//! Templates compiled into the binary.

/// Built-in templates keyed by template id.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("Main.as", include_str!("../../templates/Main.as")),
    ("Sprite.as", include_str!("../../templates/Sprite.as")),
    ("MovieClip.as", include_str!("../../templates/MovieClip.as")),
    ("ExtendedSprite.as", include_str!("../../templates/ExtendedSprite.as")),
    (
        "ExtendedMovieClip.as",
        include_str!("../../templates/ExtendedMovieClip.as"),
    ),
    ("BitmapData.as", include_str!("../../templates/BitmapData.as")),
    ("Sound.as", include_str!("../../templates/Sound.as")),
    ("ByteArray.as", include_str!("../../templates/ByteArray.as")),
];

/// Look up a built-in template.
pub fn builtin(id: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, source)| *source)
}
