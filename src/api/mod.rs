pub mod client;
pub mod cookies;
pub mod models;

pub use client::ApiClient;
pub use models::ApiConfig;
