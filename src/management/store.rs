use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use futures::AsyncWriteExt;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    IoError(#[from] io::Error),

    #[error("malformed document: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("no document at {0}")]
    NotFound(PathBuf),
}

pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tune2tube");
    path
}

pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = match async_fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(StoreError::IoError(e)),
    };
    Ok(serde_json::from_str(&content)?)
}

/// Writes `value` next to `path`, flushes it to disk, then renames it into
/// place. A crash leaves either the old document or the new one.
pub(crate) async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");

    let mut file = async_fs::File::create(&tmp).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    async_fs::rename(&tmp, path).await?;
    Ok(())
}

pub(crate) async fn remove(path: &Path) -> Result<(), StoreError> {
    match async_fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::IoError(e)),
    }
}
