use std::env;

/// Base URL of the hosted Tarmeez Academy API.
pub const DEFAULT_API_URL: &str = "https://tarmeezacademy.com/api/v1";

/// Page size requested from the listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env::var("TARMEEZ_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            page_size: env::var("TARMEEZ_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
