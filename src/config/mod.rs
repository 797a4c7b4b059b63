use anyhow::{anyhow, Result};
use famspot_core::usecases::SearchLimits;
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "famspot.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";
const ENV_NAME_JWT_SECRET: &str = "JWT_SECRET";

pub struct Config {
    pub db: Db,
    pub webserver: WebServer,
    pub auth: Auth,
    pub search: SearchLimits,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        if let Ok(secret) = env::var(ENV_NAME_JWT_SECRET) {
            cfg.auth.jwt_secret = Some(secret);
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u32,
    pub busy_timeout: Duration,
}

pub struct WebServer {
    pub enable_cors: bool,
    pub public_media_url: Option<String>,
}

pub struct Auth {
    /// A random secret is generated if missing.
    pub jwt_secret: Option<String>,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            webserver,
            auth,
            search,
        } = from;

        let default_db = raw::Db::default();
        let raw::Db {
            connection_sqlite,
            connection_pool_size,
            busy_timeout,
        } = db.unwrap_or_default();
        let conn_sqlite = connection_sqlite
            .or(default_db.connection_sqlite)
            .ok_or_else(|| anyhow!("Missing SQLite connection"))?;
        let conn_pool_size = connection_pool_size
            .or(default_db.connection_pool_size)
            .unwrap_or(1);
        if conn_pool_size == 0 {
            return Err(anyhow!("The connection pool size must be positive"));
        }
        let busy_timeout = busy_timeout
            .or(default_db.busy_timeout)
            .unwrap_or(famspot_db_sqlite::DEFAULT_BUSY_TIMEOUT);
        let db = Db {
            conn_sqlite,
            conn_pool_size,
            busy_timeout,
        };

        let default_webserver = raw::WebServer::default();
        let raw::WebServer {
            cors,
            public_media_url,
        } = webserver.unwrap_or_default();
        let webserver = WebServer {
            enable_cors: cors.or(default_webserver.cors).unwrap_or(false),
            public_media_url: public_media_url
                .or(default_webserver.public_media_url)
                .filter(|url| !url.trim().is_empty()),
        };

        let raw::Auth { jwt_secret } = auth.unwrap_or_default();
        let auth = Auth {
            jwt_secret: jwt_secret.filter(|s| !s.is_empty()),
        };

        let fallback = SearchLimits::default();
        let default_search = raw::Search::default();
        let raw::Search {
            default_radius_m,
            max_radius_m,
            default_limit,
            max_limit,
        } = search.unwrap_or_default();
        let search = SearchLimits {
            default_radius_m: default_radius_m
                .or(default_search.default_radius_m)
                .unwrap_or(fallback.default_radius_m),
            max_radius_m: max_radius_m
                .or(default_search.max_radius_m)
                .unwrap_or(fallback.max_radius_m),
            default_limit: default_limit
                .or(default_search.default_limit)
                .unwrap_or(fallback.default_limit),
            max_limit: max_limit
                .or(default_search.max_limit)
                .unwrap_or(fallback.max_limit),
        };
        if !(search.default_radius_m > 0.0 && search.default_radius_m <= search.max_radius_m) {
            return Err(anyhow!(
                "Invalid search radius: default {} must be in (0, {}]",
                search.default_radius_m,
                search.max_radius_m
            ));
        }
        if !(search.default_limit >= 1 && search.default_limit <= search.max_limit) {
            return Err(anyhow!(
                "Invalid search limit: default {} must be in [1, {}]",
                search.default_limit,
                search.max_limit
            ));
        }

        Ok(Self {
            db,
            webserver,
            auth,
            search,
        })
    }
}
