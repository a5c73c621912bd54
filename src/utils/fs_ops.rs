//! Small async filesystem helpers shared by the store and the image service.
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

/// Move a file, falling back to copy + remove when a plain rename fails
/// (e.g. source and destination on different filesystems).
pub async fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if fs::metadata(from).await.is_err() {
                return Err(rename_err);
            }
            tracing::debug!(from = %from.display(), to = %to.display(), error = %rename_err, "rename failed, copying instead");
            fs::copy(from, to).await?;
            fs::remove_file(from).await
        }
    }
}
