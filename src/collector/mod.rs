//! Assembly of the code bundle uploaded to a branch.

use crate::context::Environment;
use crate::error::{DeployError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Content of one uploaded module.
///
/// Serialises to a plain string for text modules and to `{"binary": "<base64>"}`
/// for binary ones, which is the shape the Screeps code endpoints expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Module {
    Text(String),
    Binary { binary: String },
}

impl Module {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Module::Text(text) => Some(text),
            Module::Binary { .. } => None,
        }
    }
}

/// Module name to content, as sent in one upload call.
pub type CodeBundle = BTreeMap<String, Module>;

/// How a file in the output directory is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactKind {
    Text,
    Binary,
}

fn classify(file_name: &str) -> Option<ArtifactKind> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("js") | Some("map") => Some(ArtifactKind::Text),
        Some("wasm") => Some(ArtifactKind::Binary),
        _ => None,
    }
}

/// Module name for a text artifact: the file name minus one trailing `.js`.
fn module_name(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 3 && file_name.is_char_boundary(len - 3) && file_name[len - 3..].eq_ignore_ascii_case(".js") {
        &file_name[..len - 3]
    } else {
        file_name
    }
}

/// Collect every uploadable artifact next to `output_file`.
///
/// `.js` and `.map` files become text modules named after the file with a
/// trailing `.js` removed, so `main.js` is `main` and `main.js.map.js` is
/// `main.js.map`. `.wasm` files become base64 binary modules under their
/// full file name. Other files are ignored.
///
/// Entries are read in directory order; when two files map to the same name
/// the later one wins.
///
/// # Errors
///
/// Fails when the output directory or one of the matched files cannot be read.
pub async fn get_file_list(output_file: &Path, env: &Environment) -> Result<CodeBundle> {
    let output_file = env.resolve(output_file);
    let base = output_file.parent().unwrap_or_else(|| env.cwd());

    let mut entries = tokio::fs::read_dir(base).await?;
    let mut code = CodeBundle::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        let Some(kind) = classify(file_name) else {
            continue;
        };
        // Follows symlinks, so linked modules are uploaded and directories skipped.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                continue;
            }
        }

        let (name, module) = match kind {
            ArtifactKind::Text => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| DeployError::fs("reading module", &path, e))?;
                (module_name(file_name).to_string(), Module::Text(text))
            }
            ArtifactKind::Binary => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| DeployError::fs("reading binary module", &path, e))?;
                let binary = STANDARD.encode(bytes);
                (file_name.to_string(), Module::Binary { binary })
            }
        };

        log::debug!("Collected module {} from {}", name, path.display());
        if code.insert(name.clone(), module).is_some() {
            log::debug!("Module {} was overwritten by {}", name, path.display());
        }
    }

    log::info!("Collected {} module(s) from {}", code.len(), base.display());
    Ok(code)
}
