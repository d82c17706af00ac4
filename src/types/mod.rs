//! Core domain types for asgen.
//!
//! - `AssetBit` - one frame or property set
//! - `Asset` / `SpriteAsset` - discovered assets
//! - `FileType` - extension based classification

mod asset;
mod file_type;

pub use asset::{Asset, AssetBit, AssetClass, AssetEntry, BaseClass, SpriteAsset, MAX_FRAMES};
pub use file_type::FileType;
