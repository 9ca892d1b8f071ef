/// Application configuration module
use std::env;

/// NASA's public demonstration key; works without registration but is
/// heavily rate limited.
pub const DEMO_KEY: &str = "DEMO_KEY";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub nasa_api_key: String,
    /// api.nasa.gov family: APOD, Mars photos, NEO, DONKI
    pub nasa_api_url: String,
    pub epic_api_url: String,
    pub eonet_api_url: String,
    pub images_api_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let nasa_api_key = env::var("NASA_API_KEY").unwrap_or_else(|_| DEMO_KEY.to_string());

        let nasa_api_url =
            env::var("NASA_API_URL").unwrap_or_else(|_| "https://api.nasa.gov".to_string());

        let epic_api_url =
            env::var("EPIC_API_URL").unwrap_or_else(|_| "https://epic.gsfc.nasa.gov".to_string());

        let eonet_api_url =
            env::var("EONET_API_URL").unwrap_or_else(|_| "https://eonet.gsfc.nasa.gov".to_string());

        let images_api_url = env::var("IMAGES_API_URL")
            .unwrap_or_else(|_| "https://images-api.nasa.gov".to_string());

        Ok(Self {
            port: env_u16("PORT", 3000),
            nasa_api_key,
            nasa_api_url,
            epic_api_url,
            eonet_api_url,
            images_api_url,
        })
    }

    pub fn uses_demo_key(&self) -> bool {
        self.nasa_api_key == DEMO_KEY
    }
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
