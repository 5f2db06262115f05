use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::{
    api::ApiClient,
    domain::{DownloadError, Quality, ResponseOutcome, SubmissionRequest},
    utils::sanitize_filename,
};

/// Give up looking for a free `name (n).ext` after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub fn default_download_dir(&self) -> PathBuf {
        self.api_client.config().download_dir.clone()
    }

    /// Fetch the server's form page so a `csrftoken` cookie is available for submissions.
    pub async fn prime_session(&self) -> Result<(), DownloadError> {
        self.api_client.prime_session().await.inspect_err(|e| {
            warn!(error = %e, "Could not obtain session cookies");
        })
    }

    /// Run one submission end to end: request, classify, save.
    /// Every failure is logged here before it is handed back to the UI.
    pub async fn submit(
        &self,
        video_url: String,
        quality: Quality,
        download_dir: PathBuf,
    ) -> Result<PathBuf, DownloadError> {
        let result = self.run(video_url, quality, download_dir).await;

        match &result {
            Ok(path) => info!(path = %path.display(), "Download saved"),
            Err(DownloadError::Server(message)) => {
                warn!(%message, "Download rejected by server")
            }
            Err(e) => error!(error = %e, kind = ?e, "Download failed"),
        }

        result
    }

    async fn run(
        &self,
        video_url: String,
        quality: Quality,
        download_dir: PathBuf,
    ) -> Result<PathBuf, DownloadError> {
        let request = SubmissionRequest {
            video_url,
            quality,
            csrf_token: self.api_client.cookies().csrf_token(),
        };

        match self.api_client.submit(&request).await? {
            ResponseOutcome::Success { bytes, filename } => {
                save_payload(download_dir, filename, bytes).await
            }
            ResponseOutcome::Failure { message } => Err(DownloadError::Server(message)),
        }
    }

    pub async fn choose_download_dir(&self, current: PathBuf) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_directory(&current)
            .pick_folder()
            .await
            .map(|handle| handle.path().to_path_buf())
    }
}

/// Write the payload into `dir` under the suggested name.
///
/// The bytes are staged in a temporary file next to the destination and only
/// renamed into place once fully written; on any error the staged file is
/// deleted when it goes out of scope. Existing files are never overwritten,
/// a ` (n)` suffix is added instead.
pub async fn save_payload(
    dir: PathBuf,
    filename: String,
    bytes: Bytes,
) -> Result<PathBuf, DownloadError> {
    tokio::task::spawn_blocking(move || write_staged(&dir, &filename, &bytes))
        .await
        .map_err(|e| DownloadError::Io(format!("Save task failed: {}", e)))?
}

fn write_staged(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
    let name = sanitize_filename(filename);
    if name.is_empty() {
        return Err(DownloadError::MissingFilename);
    }

    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(numbered_name(&name, attempt));
        match staged.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => staged = e.file,
            Err(e) => return Err(e.error.into()),
        }
    }

    Err(DownloadError::Io(format!(
        "No free file name for {} in {}",
        name,
        dir.display()
    )))
}

/// `video.mp4`, `video (1).mp4`, `video (2).mp4`, ...
fn numbered_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, attempt, ext),
        _ => format!("{} ({})", name, attempt),
    }
}
