//! Loading graphs, options and interaction scripts from disk
//!
//! The format is picked from the file extension: `.json` for JSON,
//! `.yaml`/`.yml` for YAML. All three documents share the same dispatch.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::events::ScriptedEvent;
use crate::graph::GraphData;
use crate::options::PhysicsOptions;

/// Errors that can occur while loading or writing documents
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Serializing output failed
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Document formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// File extensions this format is read from
    pub fn supported_extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
        }
    }

    pub fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Pick the format for a path from its extension
    pub fn for_path(path: &Path) -> LoadResult<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnknownExtension(path.display().to_string()))?;

        [Format::Json, Format::Yaml]
            .into_iter()
            .find(|f| f.supports_extension(ext))
            .ok_or_else(|| LoadError::UnsupportedFormat(ext.to_string()))
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let format = Format::for_path(path)?;
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading document");

    let parse_error = |message: String| LoadError::Parse {
        path: path.display().to_string(),
        message,
    };
    match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a graph document
pub fn load_graph(path: &Path) -> LoadResult<GraphData> {
    load(path)
}

/// Read an options document; missing keys take their defaults
pub fn load_options(path: &Path) -> LoadResult<PhysicsOptions> {
    load(path)
}

/// Read a pointer-event script, sorted by tick
pub fn load_script(path: &Path) -> LoadResult<Vec<ScriptedEvent>> {
    let mut steps: Vec<ScriptedEvent> = load(path)?;
    // stable, so events sharing a tick keep file order
    steps.sort_by_key(|s| s.tick);
    Ok(steps)
}

/// Render a value as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> LoadResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| LoadError::Write(e.to_string()))
}
