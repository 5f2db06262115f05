mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    info!("video downloader starting");

    iced::application(app::DownloadApp::new, app::update, app::view)
        .title("Video Downloader")
        .run()
}
