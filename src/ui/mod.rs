use std::path::PathBuf;

use iced::{
    widget::{button, column, pick_list, row, text, text_input, Space},
    Element, Length,
};

use crate::domain::{Quality, UiState};

/// Main view state
pub struct DownloadView {
    pub video_url: String,
    pub quality: Quality,
    pub download_dir: PathBuf,
    pub state: UiState,
    pub last_saved: Option<PathBuf>,
}

impl DownloadView {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            video_url: String::new(),
            quality: Quality::default(),
            download_dir,
            state: UiState::Idle,
            last_saved: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormMessage {
    VideoUrlChanged(String),
    QualitySelected(Quality),
    ChooseDirectory,
    Submit,
}

impl DownloadView {
    pub fn update(&mut self, message: FormMessage) {
        match message {
            FormMessage::VideoUrlChanged(url) => {
                self.video_url = url;
            }
            FormMessage::QualitySelected(quality) => {
                self.quality = quality;
            }
            FormMessage::ChooseDirectory | FormMessage::Submit => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, FormMessage> {
        let loading = self.state.is_loading();
        let visibility = self.state.visibility();

        let mut content = column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            text("Video URL:").size(16),
            text_input("https://...", &self.video_url)
                .on_input(FormMessage::VideoUrlChanged)
                .on_submit(FormMessage::Submit)
                .padding(10),
            text("Quality:").size(16),
            pick_list(
                &Quality::ALL[..],
                Some(self.quality),
                FormMessage::QualitySelected
            )
            .padding(10),
            row![
                text(format!("Save to: {}", self.download_dir.display())).size(14),
                Space::new().width(Length::Fill),
                button("Change...")
                    .on_press_maybe((!loading).then_some(FormMessage::ChooseDirectory))
                    .padding([6, 12]),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            button("Download")
                .on_press_maybe((!loading).then_some(FormMessage::Submit))
                .padding([10, 20]),
        ]
        .padding(20)
        .spacing(10);

        if visibility.indicator {
            content = content.push(text("Downloading, please wait...").size(14));
        }
        if let Some(message) = self.state.error_message().filter(|_| visibility.banner) {
            content = content.push(text(message).size(14).style(text::danger));
        }
        if let (UiState::Idle, Some(path)) = (&self.state, &self.last_saved) {
            content = content.push(text(format!("Saved: {}", path.display())).size(14));
        }

        content.into()
    }
}
