use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::cookies::SessionCookies;
use super::models::{server_message, ApiConfig};
use crate::domain::{DownloadError, ResponseOutcome, SubmissionRequest};

pub const DOWNLOAD_PATH: &str = "/download/";
pub const CSRF_HEADER: &str = "X-CSRFToken";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
    cookies: SessionCookies,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let cookies = SessionCookies::new(&config.endpoint("/"), &config.cookies);
        let http = Client::builder()
            .cookie_provider(cookies.jar())
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to a client without a cookie jar");
                Client::new()
            });

        Self {
            config,
            http,
            cookies,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Load the form page so the server issues its session and `csrftoken` cookies.
    pub async fn prime_session(&self) -> Result<()> {
        let response = self.http.get(self.config.endpoint("/")).send().await?;

        debug!(
            status = %response.status(),
            has_token = self.cookies.csrf_token().is_some(),
            "Session primed"
        );
        Ok(())
    }

    /// POST the submission and classify the answer by status code.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<ResponseOutcome> {
        let mut builder = self
            .http
            .post(self.config.endpoint(DOWNLOAD_PATH))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form_body(request));

        if let Some(token) = &request.csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }

        debug!(
            url = %request.video_url,
            quality = request.quality.as_form_value(),
            has_token = request.csrf_token.is_some(),
            "Submitting download request"
        );

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let disposition = response.headers().get(CONTENT_DISPOSITION).map(header_text);
            let filename = suggested_filename(disposition.as_deref())?;
            let bytes: Bytes = response.bytes().await?;

            debug!(%status, %filename, size = bytes.len(), "Received file payload");
            Ok(ResponseOutcome::Success { bytes, filename })
        } else {
            let body = response.bytes().await?;
            let data: Value = serde_json::from_slice(&body)
                .map_err(|e| DownloadError::Parse(format!("JSON decode error: {}", e)))?;

            let message = server_message(&data);

            debug!(%status, %message, "Server rejected download request");
            Ok(ResponseOutcome::Failure { message })
        }
    }
}

/// Header bytes as text. UTF-8 when valid, otherwise each byte is taken as latin-1.
fn header_text(value: &HeaderValue) -> String {
    let bytes = value.as_bytes();
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// `video_url=<enc>&video_quality=<enc>`, nothing else.
pub fn form_body(request: &SubmissionRequest) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("video_url", &request.video_url)
        .append_pair("video_quality", request.quality.as_form_value())
        .finish()
}

/// Everything after the first `filename=` in a `Content-Disposition` value.
/// A quoted name ends at its closing quote.
pub fn suggested_filename(content_disposition: Option<&str>) -> Result<String> {
    let header = content_disposition.ok_or(DownloadError::MissingFilename)?;
    let (_, rest) = header
        .split_once("filename=")
        .ok_or(DownloadError::MissingFilename)?;

    let rest = rest.trim();
    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => rest,
    };

    if name.is_empty() {
        return Err(DownloadError::MissingFilename);
    }
    Ok(name.to_string())
}
