//! The bundler's output as seen by the deploy hooks.

use crate::context::Environment;
use crate::error::{DeployError, Result};
use crate::sourcemap::{SourceMap, map_path};
use std::path::PathBuf;

/// Output settings of the bundler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Primary output file, e.g. `dist/main.js`.
    pub file: PathBuf,
    /// Whether the bundler emits `<file>.map`.
    pub sourcemap: bool,
}

/// A generated JavaScript chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputChunk {
    pub file_name: String,
    pub code: String,
    pub map: Option<SourceMap>,
}

/// A file emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputAsset {
    pub file_name: String,
    pub source: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    Chunk(OutputChunk),
    Asset(OutputAsset),
}

/// Everything one bundler run produced, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputBundle {
    pub items: Vec<OutputItem>,
}

impl OutputBundle {
    pub fn chunks(&self) -> impl Iterator<Item = &OutputChunk> {
        self.items.iter().filter_map(|item| match item {
            OutputItem::Chunk(chunk) => Some(chunk),
            OutputItem::Asset(_) => None,
        })
    }

    /// Rebuild the in-memory bundle from a primary output the bundler already wrote.
    ///
    /// The map is read from `<file>.map` when `options.sourcemap` is set.
    pub async fn load(options: &OutputOptions, env: &Environment) -> Result<Self> {
        let file = env.resolve(&options.file);
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DeployError::config(format!("invalid output file {}", file.display())))?
            .to_string();

        let code = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| DeployError::fs("reading output file", &file, e))?;

        let map = if options.sourcemap {
            let path = map_path(&file);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Some(SourceMap::parse(&text)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    log::warn!("Source maps enabled but {} does not exist", path.display());
                    None
                }
                Err(e) => return Err(DeployError::fs("reading source map", &path, e)),
            }
        } else {
            None
        };

        Ok(Self {
            items: vec![OutputItem::Chunk(OutputChunk {
                file_name,
                code,
                map,
            })],
        })
    }

    /// Write each chunk's rendered map to `<chunk>.map` beside the primary output.
    pub async fn emit_maps(&self, options: &OutputOptions, env: &Environment) -> Result<()> {
        let file = env.resolve(&options.file);
        let dir = file.parent().unwrap_or_else(|| env.cwd());

        for chunk in self.chunks() {
            let Some(map) = &chunk.map else { continue };
            let path = map_path(&dir.join(&chunk.file_name));
            tokio::fs::write(&path, map.render())
                .await
                .map_err(|e| DeployError::fs("writing source map", &path, e))?;
            log::debug!("Wrote {}", path.display());
        }

        Ok(())
    }
}
