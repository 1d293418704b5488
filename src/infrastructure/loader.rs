//! Item file loading
//!
//! Supported layouts:
//! - JSON: a top-level array of `{ "id": .., "parent": .., ... }` objects
//! - TOML: `[[items]]` tables with the same keys (`parent` omitted for roots)
//!
//! `id` and `parent` must be integers or strings. A fractional number fails the
//! whole file with a parse error.

use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::TreeService;
use crate::domain::{RawItem, TreeItem};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// On-disk format of an item file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormat {
    Json,
    Toml,
}

impl ItemFormat {
    /// Pick the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ItemFormat::Toml,
            _ => ItemFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlItems {
    #[serde(default)]
    items: Vec<RawItem>,
}

/// Parse raw records from file content.
pub fn parse_items(content: &str, format: ItemFormat) -> Result<Vec<RawItem>, String> {
    match format {
        ItemFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ItemFormat::Toml => toml::from_str::<TomlItems>(content)
            .map(|doc| doc.items)
            .map_err(|e| e.to_string()),
    }
}

/// Reads item collections from files.
pub struct ItemLoader {
    fs: Arc<dyn FileSystem>,
}

impl ItemLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load and validate the records of an item file.
    ///
    /// A record without an id fails the whole load with `MissingId`.
    #[instrument(level = "debug", skip(self))]
    pub fn load_items(&self, path: &Path) -> InfraResult<Vec<TreeItem>> {
        if !self.fs.exists(path) {
            return Err(InfraError::io(
                format!("item file not found: {}", path.display()),
                io::Error::new(io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read item file {}", path.display()), e))?;

        let raw = parse_items(&content, ItemFormat::from_path(path)).map_err(|message| {
            InfraError::Parse {
                path: path.to_path_buf(),
                message,
            }
        })?;
        debug!("load_items: {} records in {}", raw.len(), path.display());

        let items = raw
            .into_iter()
            .map(TreeItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Load an item file straight into a service.
    pub fn load_service(&self, path: &Path) -> InfraResult<TreeService> {
        let items = self.load_items(path)?;
        Ok(TreeService::new(items)?)
    }
}
