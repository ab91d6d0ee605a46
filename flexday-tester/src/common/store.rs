//! Storage and catalog collaborators used when driving the engine.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::rc::Rc;

use flexday_core::{CatalogLoader, KeyValueStore, MissionCatalog};
use thiserror::Error;

/// In-memory stand-in for browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("failed to read catalog {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog {path} is not a mission document")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Catalog source: a JSON document on disk, or the built-in list.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    path: Option<PathBuf>,
}

impl CatalogSource {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl CatalogLoader for CatalogSource {
    type Error = CatalogFileError;

    fn load_catalog(&self) -> Result<MissionCatalog, Self::Error> {
        let Some(path) = &self.path else {
            return Ok(MissionCatalog::builtin());
        };
        let label = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
            path: label.clone(),
            source,
        })?;
        MissionCatalog::from_json(&raw).map_err(|source| CatalogFileError::Parse {
            path: label,
            source,
        })
    }
}

/// Loader over a catalog that was already read, so every iteration shares one parse.
#[derive(Debug, Clone)]
pub struct PreloadedCatalog(MissionCatalog);

impl PreloadedCatalog {
    pub const fn new(catalog: MissionCatalog) -> Self {
        Self(catalog)
    }
}

impl CatalogLoader for PreloadedCatalog {
    type Error = Infallible;

    fn load_catalog(&self) -> Result<MissionCatalog, Self::Error> {
        Ok(self.0.clone())
    }
}
