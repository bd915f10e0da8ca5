//! Source maps as loadable modules.
//!
//! Screeps can only `require` JavaScript modules, so a chunk's map is
//! rendered as `module.exports = {...};` and the map file on disk is renamed
//! from `<output>.map` to `<output>.map.js`.

use crate::context::Environment;
use crate::error::{DeployError, Result};
use crate::output::{OutputBundle, OutputItem, OutputOptions};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Field holding the embedded original sources; removed from module-style maps.
const SOURCES_CONTENT: &str = "sourcesContent";

/// How a [`SourceMap`] is serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    /// Plain JSON, as bundlers write it.
    Json,
    /// `module.exports = <json>;`
    Module,
}

/// A chunk's source map together with its rendering style.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    data: Value,
    style: MapStyle,
}

impl SourceMap {
    pub fn json(data: Value) -> Self {
        Self {
            data,
            style: MapStyle::Json,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self::json(serde_json::from_str(text)?))
    }

    /// Raw map data, unaffected by the rendering style.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }

    /// Module-style copy of this map with the embedded sources removed.
    pub fn to_module(&self) -> Self {
        let mut data = self.data.clone();
        if let Value::Object(fields) = &mut data {
            fields.remove(SOURCES_CONTENT);
        }
        Self {
            data,
            style: MapStyle::Module,
        }
    }

    /// Serialised form written to disk and uploaded.
    pub fn render(&self) -> String {
        match self.style {
            MapStyle::Json => self.data.to_string(),
            MapStyle::Module => format!("module.exports = {};", self.data),
        }
    }
}

impl std::fmt::Display for SourceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Return a copy of `bundle` in which every chunk map renders as a module.
///
/// Assets and chunks without a map are carried over unchanged.
pub fn generate_source_maps(bundle: &OutputBundle) -> OutputBundle {
    let items = bundle
        .items
        .iter()
        .map(|item| match item {
            OutputItem::Chunk(chunk) => {
                let mut chunk = chunk.clone();
                chunk.map = chunk.map.as_ref().map(SourceMap::to_module);
                OutputItem::Chunk(chunk)
            }
            OutputItem::Asset(asset) => OutputItem::Asset(asset.clone()),
        })
        .collect();

    OutputBundle { items }
}

/// `<file>.map`
pub fn map_path(file: &Path) -> PathBuf {
    append_extension(file, ".map")
}

/// `<file>.map.js`
pub fn module_map_path(file: &Path) -> PathBuf {
    append_extension(file, ".map.js")
}

fn append_extension(file: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = file.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Rename the written `<file>.map` to `<file>.map.js`.
///
/// Only call this when source maps are enabled; a missing map file is an error.
pub async fn write_source_maps(options: &OutputOptions, env: &Environment) -> Result<()> {
    let file = env.resolve(&options.file);
    let from = map_path(&file);
    let to = module_map_path(&file);

    tokio::fs::rename(&from, &to)
        .await
        .map_err(|e| DeployError::fs("renaming source map", &from, e))?;

    log::info!("Renamed {} to {}", from.display(), to.display());
    Ok(())
}
