//! JSON export of formatted output.
//!
//! Formatted payloads are written as compact JSON so they can be shared
//! offline, optionally printed as URL-safe Base64 for QR-code generators.
//! A recently written file lets the CLI skip the upstream call entirely.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::Serialize;
use serde_json::Value;

/// Directory for default output files.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Errors while reading or writing export files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Filesystem operation failed
    #[error("failed to {action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Default output file for a command: `out/<command>.json`.
pub fn default_output_path(command: &str) -> PathBuf {
    Path::new(DEFAULT_OUTPUT_DIR).join(format!("{command}.json"))
}

/// Whether `path` exists and was modified less than `ttl` ago.
///
/// A zero TTL never counts as fresh.
pub fn is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };

    // A modification time in the future counts as age zero.
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO);
    age < ttl
}

/// Serialize `data` as compact JSON.
pub fn to_compact_json<T: Serialize + ?Sized>(data: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string(data)?)
}

/// Write `data` to `path` as compact JSON.
///
/// Creates parent directories if they don't exist.
pub fn write_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = to_compact_json(data)?;

    std::fs::write(path, json).map_err(|source| ExportError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

/// Read a previously exported payload.
pub fn read_json(path: &Path) -> Result<Value, ExportError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// URL-safe Base64 of the compact JSON form of `data`.
pub fn encode_b64<T: Serialize + ?Sized>(data: &T) -> Result<String, ExportError> {
    Ok(URL_SAFE.encode(to_compact_json(data)?))
}
