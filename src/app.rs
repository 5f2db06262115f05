use std::path::PathBuf;

use iced::Task;
use tracing::debug;

use crate::api::{ApiClient, ApiConfig};
use crate::application::DownloadCoordinator;
use crate::domain::{DownloadError, UiEvent};
use crate::ui::{DownloadView, FormMessage};

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
}

impl DownloadApp {
    pub fn with_config(config: ApiConfig) -> Self {
        let coordinator = DownloadCoordinator::new(ApiClient::new(config));
        let view = DownloadView::new(coordinator.default_download_dir());

        Self { view, coordinator }
    }

    /// Boot the app and ask the server for a session so the CSRF cookie is in place.
    pub fn new() -> (Self, Task<Message>) {
        let app = Self::with_config(ApiConfig::from_env());
        let coordinator = app.coordinator.clone();

        let task = Task::perform(
            async move { coordinator.prime_session().await },
            Message::SessionPrimed,
        );
        (app, task)
    }

    fn apply(&mut self, event: UiEvent) {
        let state = std::mem::take(&mut self.view.state);
        self.view.state = state.transition(event);
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Form(FormMessage),
    SessionPrimed(Result<(), DownloadError>),
    DirectoryChosen(Option<PathBuf>),
    /// Final step of every submission, whatever the outcome
    Finished(Result<PathBuf, DownloadError>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::Form(form_msg) => {
            app.view.update(form_msg.clone());

            match form_msg {
                FormMessage::Submit => {
                    if app.view.state.is_loading() {
                        debug!("Submission ignored, a download is already in flight");
                        return Task::none();
                    }

                    app.apply(UiEvent::Submitted);
                    app.view.last_saved = None;

                    let coordinator = app.coordinator.clone();
                    let url = app.view.video_url.clone();
                    let quality = app.view.quality;
                    let dir = app.view.download_dir.clone();

                    return Task::perform(
                        async move { coordinator.submit(url, quality, dir).await },
                        Message::Finished,
                    );
                }
                FormMessage::ChooseDirectory => {
                    let coordinator = app.coordinator.clone();
                    let current = app.view.download_dir.clone();

                    return Task::perform(
                        async move { coordinator.choose_download_dir(current).await },
                        Message::DirectoryChosen,
                    );
                }
                _ => {}
            }
        }
        Message::SessionPrimed(result) => {
            // Failures are already logged; submissions then go out without a token.
            debug!(primed = result.is_ok(), "Session priming finished");
        }
        Message::DirectoryChosen(dir) => {
            if let Some(dir) = dir {
                app.view.download_dir = dir;
            }
        }
        Message::Finished(result) => {
            let event = match result {
                Ok(path) => {
                    app.view.last_saved = Some(path);
                    UiEvent::Succeeded
                }
                Err(e) => UiEvent::Failed(e.user_message()),
            };
            app.apply(event);
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::Form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::UNEXPECTED_ERROR;
    use crate::domain::UiState;

    fn app() -> DownloadApp {
        DownloadApp::with_config(ApiConfig::default())
    }

    fn submit(app: &mut DownloadApp) {
        let _ = update(app, Message::Form(FormMessage::Submit));
    }

    #[test]
    fn test_submit_enters_loading_and_clears_error() {
        let mut app = app();
        app.view.state = UiState::Error("old".to_string());

        submit(&mut app);

        assert_eq!(app.view.state, UiState::Loading);
        assert!(app.view.state.visibility().indicator);
        assert!(!app.view.state.visibility().banner);
    }

    #[test]
    fn test_server_error_shows_banner_and_hides_indicator() {
        let mut app = app();
        submit(&mut app);

        let _ = update(
            &mut app,
            Message::Finished(Err(DownloadError::Server("Invalid URL".to_string()))),
        );

        assert_eq!(app.view.state.error_message(), Some("Invalid URL"));
        assert!(!app.view.state.visibility().indicator);
    }

    #[test]
    fn test_network_error_shows_generic_message() {
        let mut app = app();
        submit(&mut app);

        let _ = update(
            &mut app,
            Message::Finished(Err(DownloadError::Network("refused".to_string()))),
        );

        assert_eq!(app.view.state.error_message(), Some(UNEXPECTED_ERROR));
        assert!(!app.view.state.visibility().indicator);
    }

    #[test]
    fn test_success_returns_to_idle() {
        let mut app = app();
        submit(&mut app);

        let saved = PathBuf::from("downloads/video.mp4");
        let _ = update(&mut app, Message::Finished(Ok(saved.clone())));

        assert_eq!(app.view.state, UiState::Idle);
        assert_eq!(app.view.last_saved, Some(saved));
    }

    #[test]
    fn test_resubmission_ignored_while_loading() {
        let mut app = app();
        submit(&mut app);
        app.view.video_url = "changed".to_string();
        submit(&mut app);

        assert_eq!(app.view.state, UiState::Loading);

        let _ = update(
            &mut app,
            Message::Finished(Err(DownloadError::MissingFilename)),
        );
        assert_eq!(app.view.state.error_message(), Some(UNEXPECTED_ERROR));

        submit(&mut app);
        assert_eq!(app.view.state, UiState::Loading);
    }

    #[test]
    fn test_failed_session_priming_keeps_form_usable() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::SessionPrimed(Err(DownloadError::Network("refused".to_string()))),
        );
        assert_eq!(app.view.state, UiState::Idle);

        submit(&mut app);
        assert_eq!(app.view.state, UiState::Loading);
    }

    #[test]
    fn test_directory_choice() {
        let mut app = app();
        let _ = update(&mut app, Message::DirectoryChosen(None));
        assert_eq!(app.view.download_dir, PathBuf::from("downloads"));

        let _ = update(
            &mut app,
            Message::DirectoryChosen(Some(PathBuf::from("/tmp/videos"))),
        );
        assert_eq!(app.view.download_dir, PathBuf::from("/tmp/videos"));
    }
}
