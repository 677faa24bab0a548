use std::env;
use std::time::Duration;

use dotenv::dotenv;

const DEFAULT_OS_PLACES_API_URL: &str = "https://api.os.uk/search/places/v1";
const DEFAULT_OS_PLACES_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct OsPlacesConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub os_places: OsPlacesConfig,
    pub bind_address: String,
}

pub fn init_config() -> Config {
    dotenv().ok();

    Config::from_vars(|name| env::var(name).ok())
}

impl Config {
    fn from_vars<F>(var: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("OS_PLACES_API_KEY")
            .expect("OS_PLACES_API_KEY must be set");

        let timeout_secs = var("OS_PLACES_API_TIMEOUT_SECS")
            .map(|secs| secs
                .parse::<u64>()
                .expect("OS_PLACES_API_TIMEOUT_SECS must be an integer")
            )
            .unwrap_or(DEFAULT_OS_PLACES_API_TIMEOUT_SECS);

        Config {
            os_places: OsPlacesConfig {
                url: var("OS_PLACES_API_URL")
                    .map(|url| url.trim_end_matches('/').to_owned())
                    .unwrap_or_else(|| DEFAULT_OS_PLACES_API_URL.to_owned()),
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
        }
    }
}
