//! Local file and stdin reading

use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::encoding;

pub fn read_path(path: &str) -> Result<String> {
    let read_error = |source| Error::Read { resource: path.to_string(), source };
    let path_ref = Path::new(path);
    if path_ref.is_dir() {
        return Err(read_error(io::Error::new(io::ErrorKind::Other, "is a directory")));
    }
    let bytes = std::fs::read(path_ref).map_err(read_error)?;
    if encoding::is_binary(&bytes) {
        tracing::warn!("{} looks like a binary file", path);
    }
    tracing::debug!("read {} bytes from {}", bytes.len(), path);
    Ok(encoding::decode(&bytes))
}

pub fn read_stdin() -> Result<String> {
    encoding::read_to_string(io::stdin().lock())
        .map_err(|source| Error::Read { resource: "stdin".to_string(), source })
}
