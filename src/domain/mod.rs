pub mod error;
pub mod model;
pub mod state;

pub use error::{DownloadError, GENERIC_SERVER_ERROR};
pub use model::{Quality, ResponseOutcome, SubmissionRequest};
pub use state::{UiEvent, UiState};
