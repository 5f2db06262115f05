use std::fmt;

use bytes::Bytes;

/// Quality choices offered by the form. The wire value is what the server expects
/// in `video_quality`: a maximum frame height, or `audio` for an mp3 extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    P360,
    P480,
    #[default]
    P720,
    P1080,
    Audio,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
        Quality::Audio,
    ];

    pub fn as_form_value(&self) -> &'static str {
        match self {
            Quality::P360 => "360",
            Quality::P480 => "480",
            Quality::P720 => "720",
            Quality::P1080 => "1080",
            Quality::Audio => "audio",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Audio => write!(f, "Audio only (mp3)"),
            other => write!(f, "{}p", other.as_form_value()),
        }
    }
}

/// One form submission. Lives until the request resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub video_url: String,
    pub quality: Quality,
    pub csrf_token: Option<String>,
}

/// What the download endpoint answered, decided by status code alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Success { bytes: Bytes, filename: String },
    Failure { message: String },
}
