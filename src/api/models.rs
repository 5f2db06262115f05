use std::env;
use std::path::PathBuf;

use serde_json::Value;

use crate::domain::GENERIC_SERVER_ERROR;

/// Banner text for the JSON body of a non-2xx response.
///
/// A truthy `error` field is shown as text: a non-empty string as is, a
/// non-zero number or `true` in its JSON form. Anything else, including a body
/// that is not an object, falls back to the generic message.
pub fn server_message(data: &Value) -> String {
    match data.get("error") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|n| n != 0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => GENERIC_SERVER_ERROR.to_string(),
    }
}

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Server origin, without a trailing slash
    pub base_url: String,
    /// Where saved files land
    pub download_dir: PathBuf,
    /// Initial cookie string, e.g. `csrftoken=...; sessionid=...`
    pub cookies: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            download_dir: PathBuf::from("downloads"),
            cookies: String::new(),
        }
    }
}

impl ApiConfig {
    pub const BASE_URL_VAR: &'static str = "VIDEO_DL_BASE_URL";
    pub const DOWNLOAD_DIR_VAR: &'static str = "VIDEO_DL_DOWNLOAD_DIR";
    pub const COOKIES_VAR: &'static str = "VIDEO_DL_COOKIES";

    /// Defaults overridden by any of the `VIDEO_DL_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup(Self::BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(Self::DOWNLOAD_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.download_dir = PathBuf::from(dir);
        }
        if let Some(cookies) = lookup(Self::COOKIES_VAR) {
            config.cookies = cookies;
        }
        config
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
