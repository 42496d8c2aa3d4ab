//! Registry of loaded sprite types.
//!
//! Keeps every [`SpriteTypeCatalog`] under the name it was listed with, in
//! listing order, so viewers can present the available types and spawn
//! instances that share the same catalog.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::resources::spritecatalog::SpriteTypeCatalog;

/// Named, ordered collection of shared sprite type catalogs.
#[derive(Debug, Clone, Default)]
pub struct SpriteTypeStore {
    names: Vec<String>,
    catalogs: FxHashMap<String, Arc<SpriteTypeCatalog>>,
}

impl SpriteTypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `catalog` under `name`, replacing any previous entry while
    /// keeping its original listing position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        catalog: SpriteTypeCatalog,
    ) -> Arc<SpriteTypeCatalog> {
        let name = name.into();
        let catalog = Arc::new(catalog);
        if self
            .catalogs
            .insert(name.clone(), Arc::clone(&catalog))
            .is_none()
        {
            self.names.push(name);
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SpriteTypeCatalog>> {
        self.catalogs.get(name)
    }

    /// Sprite type names in listing order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
