//! Sprite type loading.
//!
//! [`AssetLoader`] is the seam between the engine and whatever stores sprite
//! definitions. [`JsonSpriteLoader`] implements it for a directory laid out
//! like this:
//!
//! ```text
//! <root>/sprite_type_list.json      {"sprite_types": ["knight", "bat"]}
//! <root>/knight/knight.json         one SpriteTypeDef
//! <root>/knight/knight_idle_1.png   images, referenced by file name
//! ```
//!
//! A sprite type file lists its images and its animation states:
//!
//! ```json
//! {
//!   "width": 64,
//!   "height": 64,
//!   "images": [{ "id": 1, "file_name": "knight_idle_1.png" }],
//!   "animations": [
//!     { "state": "IDLE", "poses": [{ "image_id": 1, "duration": 10 }] }
//!   ]
//! }
//! ```
//!
//! Image handles are the image paths joined to the sprite type directory;
//! the files themselves are never opened here.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, LoadError};
use crate::resources::spritecatalog::{
    AnimationState, ImageHandle, ImageId, Pose, SpriteTypeCatalog,
};
use crate::resources::spritetypestore::SpriteTypeStore;

pub const SPRITE_TYPE_LIST_FILE: &str = "sprite_type_list.json";

/// Source of validated sprite type catalogs.
pub trait AssetLoader {
    /// Load and validate the sprite type called `sprite_type`.
    fn load(&self, sprite_type: &str) -> Result<SpriteTypeCatalog, LoadError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteTypeListDef {
    pub sprite_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteTypeDef {
    /// Frame size in pixels, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub images: Vec<ImageFileDef>,
    pub animations: Vec<AnimationStateDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFileDef {
    pub id: u32,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStateDef {
    pub state: String,
    pub poses: Vec<PoseDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseDef {
    pub image_id: u32,
    /// Signed so out-of-range values reach validation instead of failing
    /// as a parse error.
    pub duration: i64,
}

impl SpriteTypeDef {
    /// Validate the definition and build its catalog, resolving image file
    /// names against `image_dir`.
    pub fn into_catalog(self, image_dir: &Path) -> Result<SpriteTypeCatalog, CatalogError> {
        let images = self.images.into_iter().map(|image| {
            let path = image_dir.join(&image.file_name);
            (ImageId(image.id), ImageHandle::new(path.to_string_lossy()))
        });

        let mut entries = Vec::with_capacity(self.animations.len());
        for animation in self.animations {
            let state = AnimationState::from(animation.state);
            let mut poses = Vec::with_capacity(animation.poses.len());
            for (index, pose) in animation.poses.into_iter().enumerate() {
                let duration = u32::try_from(pose.duration).map_err(|_| {
                    CatalogError::InvalidDuration {
                        state: state.clone(),
                        index,
                        duration: pose.duration,
                    }
                })?;
                poses.push(Pose {
                    image_id: ImageId(pose.image_id),
                    duration,
                });
            }
            entries.push((state, poses));
        }

        SpriteTypeCatalog::build(entries, images)
    }
}

/// Loads sprite types from JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct JsonSpriteLoader {
    root: PathBuf,
}

impl JsonSpriteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the definition and images of `sprite_type`.
    pub fn type_dir(&self, sprite_type: &str) -> PathBuf {
        self.root.join(sprite_type)
    }

    pub fn definition_path(&self, sprite_type: &str) -> PathBuf {
        self.type_dir(sprite_type)
            .join(format!("{sprite_type}.json"))
    }

    /// Names listed in the sprite type list file, in file order.
    pub fn load_sprite_type_names(&self) -> Result<Vec<String>, LoadError> {
        let path = self.root.join(SPRITE_TYPE_LIST_FILE);
        let list: SpriteTypeListDef = read_json(&path)?;
        if list.sprite_types.is_empty() {
            return Err(LoadError::EmptyTypeList(path));
        }
        Ok(list.sprite_types)
    }

    /// Load every listed sprite type. Fails on the first type that does not
    /// load.
    pub fn load_library(&self) -> Result<SpriteTypeStore, LoadError> {
        let mut store = SpriteTypeStore::new();
        for name in self.load_sprite_type_names()? {
            let catalog = self.load(&name)?;
            store.insert(name, catalog);
        }
        info!(
            "Loaded {} sprite types from {}",
            store.len(),
            self.root.display()
        );
        Ok(store)
    }
}

impl AssetLoader for JsonSpriteLoader {
    fn load(&self, sprite_type: &str) -> Result<SpriteTypeCatalog, LoadError> {
        let path = self.definition_path(sprite_type);
        let definition: SpriteTypeDef = read_json(&path)?;
        let catalog = definition
            .into_catalog(&self.type_dir(sprite_type))
            .map_err(|source| LoadError::Definition {
                sprite_type: sprite_type.to_string(),
                source,
            })?;
        info!(
            "Loaded sprite type '{}' with {} animation states",
            sprite_type,
            catalog.len()
        );
        Ok(catalog)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(json: &str) -> SpriteTypeDef {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn definition_builds_catalog_with_joined_paths() {
        let def = definition(
            r#"{
                "images": [
                    {"id": 1, "file_name": "a.png"},
                    {"id": 2, "file_name": "b.png"}
                ],
                "animations": [
                    {"state": "IDLE", "poses": [{"image_id": 1, "duration": 15}, {"image_id": 2, "duration": 5}]}
                ]
            }"#,
        );
        let catalog = def.into_catalog(Path::new("sprites/knight")).unwrap();
        let sequence = catalog.lookup("IDLE").unwrap();
        assert_eq!(sequence.len(), 2);
        let expected = Path::new("sprites/knight").join("b.png");
        assert_eq!(
            catalog.image(ImageId(2)).unwrap().as_str(),
            expected.to_string_lossy()
        );
    }

    #[test]
    fn negative_duration_is_invalid_duration() {
        let def = definition(
            r#"{
                "images": [{"id": 1, "file_name": "a.png"}],
                "animations": [{"state": "IDLE", "poses": [{"image_id": 1, "duration": -4}]}]
            }"#,
        );
        let err = def.into_catalog(Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidDuration {
                index: 0,
                duration: -4,
                ..
            }
        ));
    }

    #[test]
    fn unknown_image_is_dangling() {
        let def = definition(
            r#"{
                "images": [],
                "animations": [{"state": "IDLE", "poses": [{"image_id": 7, "duration": 4}]}]
            }"#,
        );
        assert!(matches!(
            def.into_catalog(Path::new(".")),
            Err(CatalogError::DanglingImage { .. })
        ));
    }

    #[test]
    fn frame_size_is_optional() {
        let def = definition(
            r#"{
                "width": 64,
                "height": 48,
                "images": [{"id": 1, "file_name": "a.png"}],
                "animations": [{"state": "IDLE", "poses": [{"image_id": 1, "duration": 4}]}]
            }"#,
        );
        assert_eq!((def.width, def.height), (Some(64), Some(48)));
        assert!(definition(r#"{"images": [], "animations": []}"#).width.is_none());
    }

    #[test]
    fn definition_path_follows_type_name() {
        let loader = JsonSpriteLoader::new("data");
        assert_eq!(
            loader.definition_path("knight"),
            Path::new("data").join("knight").join("knight.json")
        );
    }
}
