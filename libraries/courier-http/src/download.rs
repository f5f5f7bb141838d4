//! Streaming downloads into files with progress reporting.

use crate::error::Result;
use crate::response::{handle_file, handle_response};
use crate::transport::ByteStream;
use courier_core::{Headers, HttpResponse};
use futures_util::StreamExt;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Bytes received so far for one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed_bytes: u64,
    /// From `Content-Length`; `None` when the server did not announce it
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// Completion in `[0, 1]`. Zero while the total is unknown.
    pub fn fraction_completed(&self) -> f64 {
        match self.total_bytes {
            Some(0) => 1.0,
            Some(total) => (self.completed_bytes as f64 / total as f64).min(1.0),
            None => 0.0,
        }
    }

    /// True once every announced byte has arrived.
    pub fn is_complete(&self) -> bool {
        self.total_bytes
            .is_some_and(|total| self.completed_bytes >= total)
    }

    fn finished(completed_bytes: u64) -> Self {
        Self {
            completed_bytes,
            total_bytes: Some(completed_bytes),
        }
    }
}

/// Write `stream` to `destination`, reporting progress after every chunk.
///
/// The body is staged in a temporary file next to `destination` and moved
/// into place only once the stream has ended. `on_progress` runs inline on
/// the awaiting task, never concurrently with itself, and its last call
/// always reports full completion.
pub async fn download_to_file<F>(
    response: &HttpResponse,
    mut stream: ByteStream,
    destination: &Path,
    mut on_progress: F,
) -> Result<Headers>
where
    F: FnMut(Progress) + Send,
{
    handle_response(response)?;

    let total = response.content_length();
    debug!(
        dest = %destination.display(),
        total = ?total,
        "Downloading to file"
    );

    let (file, staged) = staging_file(destination).await?;
    let mut file = File::from_std(file);
    let mut completed: u64 = 0;
    let mut last: Option<Progress> = None;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        completed += chunk.len() as u64;

        let progress = Progress {
            completed_bytes: completed,
            total_bytes: total,
        };
        on_progress(progress);
        last = Some(progress);
    }

    file.flush().await?;
    drop(file);

    if !last.is_some_and(|p| p.total_bytes == Some(p.completed_bytes)) {
        on_progress(Progress::finished(completed));
    }

    info!(
        dest = %destination.display(),
        size = completed,
        "Download complete"
    );

    handle_file(&staged, destination, response).await
}

/// Write an in-memory body to `destination` the same way a streamed
/// download would, with a single completion report.
pub async fn save_to_file<F>(
    response: &HttpResponse,
    data: &[u8],
    destination: &Path,
    mut on_progress: F,
) -> Result<Headers>
where
    F: FnMut(Progress) + Send,
{
    handle_response(response)?;

    let (file, staged) = staging_file(destination).await?;
    let mut file = File::from_std(file);
    file.write_all(data).await?;
    file.flush().await?;
    drop(file);

    on_progress(Progress::finished(data.len() as u64));

    handle_file(&staged, destination, response).await
}

/// A temporary file in the destination's directory, removed on drop unless
/// it has been moved away.
async fn staging_file(destination: &Path) -> Result<(std::fs::File, TempPath)> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await?;
            parent
        }
        _ => Path::new("."),
    };

    let staged = tempfile::Builder::new()
        .prefix(".courier-")
        .suffix(".part")
        .tempfile_in(dir)?;

    Ok(staged.into_parts())
}
