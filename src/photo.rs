use futures::TryStreamExt;
use tokio::fs;

use crate::entry::ImageRef;
use crate::error::{JournalError, Result};

/// Upper bound for a photo pulled into memory for display.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Loads the bytes behind an image reference, refusing anything over `limit`.
/// Remote bodies are streamed so an oversized photo is abandoned early.
pub async fn fetch_photo(client: &reqwest::Client, image: &ImageRef, limit: usize) -> Result<Vec<u8>> {
    match image {
        ImageRef::Local(path) => {
            let size = fs::metadata(path).await?.len();
            if size > limit as u64 {
                return Err(JournalError::ImageTooLarge { limit });
            }
            Ok(fs::read(path).await?)
        }
        ImageRef::Remote(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(JournalError::RemoteStatus {
                    operation: "download photo",
                    status,
                    body: response.text().await.unwrap_or_default(),
                });
            }
            if response.content_length().is_some_and(|len| len > limit as u64) {
                return Err(JournalError::ImageTooLarge { limit });
            }

            response
                .bytes_stream()
                .map_err(JournalError::from)
                .try_fold(Vec::new(), |mut buf, chunk| async move {
                    if buf.len() + chunk.len() > limit {
                        return Err(JournalError::ImageTooLarge { limit });
                    }
                    buf.extend_from_slice(&chunk);
                    Ok(buf)
                })
                .await
        }
    }
}
