use anyhow::Result;
use clap::{Parser, Subcommand};
use famspot_application::prelude::refresh_place_stats;
use famspot_db_sqlite::Connections;
use famspot_webserver::{Cfg, JwtState};
use std::path::PathBuf;

mod config;
mod import;

use config::Config;

#[derive(Parser)]
#[command(version, about = "Family friendly places with reviews")]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL to the database
    #[arg(long, value_name = "DATABASE_URL")]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve {
        /// Allow requests from any origin
        #[arg(long)]
        enable_cors: bool,
    },
    /// Import external places from a JSON file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Recalculate the cached rating statistics of a place
    RefreshStats {
        #[arg(value_name = "PLACE_ID")]
        place_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args {
        config,
        db_url,
        command,
    } = Args::parse();

    let mut cfg = Config::try_load_from_file_or_default(config)?;
    if let Some(db_url) = db_url {
        cfg.db.conn_sqlite = db_url;
    }

    let connections = connect(&cfg)?;

    match command.unwrap_or(Command::Serve { enable_cors: false }) {
        Command::Serve { enable_cors } => {
            let Config {
                webserver,
                auth,
                search,
                ..
            } = cfg;
            let web_cfg = Cfg {
                public_media_url: webserver.public_media_url,
                search_limits: search,
            };
            let jwt_state = JwtState::new(auth.jwt_secret.as_deref());
            famspot_webserver::run(
                connections,
                jwt_state,
                enable_cors || webserver.enable_cors,
                web_cfg,
                env!("CARGO_PKG_VERSION"),
            )
            .await;
        }
        Command::Import { file } => {
            import::import_file(&connections, &file)?;
        }
        Command::RefreshStats { place_id } => {
            let stats = refresh_place_stats(&connections, &place_id)?;
            log::info!(
                "Refreshed statistics of place {place_id}: {} reviews, {} photos",
                stats.review_count,
                stats.photo_count
            );
        }
    }
    Ok(())
}

fn connect(cfg: &Config) -> Result<Connections> {
    log::info!("Connecting to SQLite database {}", cfg.db.conn_sqlite);
    let connections = Connections::init(
        &cfg.db.conn_sqlite,
        cfg.db.conn_pool_size,
        cfg.db.busy_timeout,
    )?;
    famspot_db_sqlite::run_embedded_database_migrations(connections.exclusive()?)?;
    Ok(connections)
}
