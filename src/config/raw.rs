use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("famspot.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db: Option<Db>,
    pub webserver: Option<WebServer>,
    pub auth: Option<Auth>,
    pub search: Option<Search>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Db {
    pub connection_sqlite: Option<String>,
    pub connection_pool_size: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub busy_timeout: Option<Duration>,
}

impl Default for Db {
    fn default() -> Self {
        Config::default().db.expect("DB configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WebServer {
    pub cors: Option<bool>,
    pub public_media_url: Option<String>,
}

impl Default for WebServer {
    fn default() -> Self {
        Config::default()
            .webserver
            .expect("Webserver configuration")
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Auth {
    pub jwt_secret: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Search {
    pub default_radius_m: Option<f64>,
    pub max_radius_m: Option<f64>,
    pub default_limit: Option<u64>,
    pub max_limit: Option<u64>,
}

impl Default for Search {
    fn default() -> Self {
        Config::default().search.expect("Search configuration")
    }
}
