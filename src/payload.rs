use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to read payload file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Works out the request body from `--payload` and `--payload-file`.
///
/// A file wins over an inline payload. An empty inline payload counts as none.
pub fn resolve_payload(
    inline: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<Value>, PayloadError> {
    if let Some(path) = file {
        log::info!("Loading payload from file: {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| PayloadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let payload = serde_json::from_str(&contents)?;
        log::info!("Payload loaded successfully from file");
        return Ok(Some(payload));
    }

    match inline {
        Some(inline) if !inline.is_empty() => Ok(Some(serde_json::from_str(inline)?)),
        _ => Ok(None),
    }
}
