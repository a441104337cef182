//! Errors for the fallible surface of the crate: reading and writing
//! intermediate documents. Curve extraction and re-synthesis never fail; they
//! degrade a property to its default value instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document json parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
