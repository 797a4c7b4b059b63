use rocket::{config::Config as RocketCfg, Rocket, Route};

use crate::core::usecases::SearchLimits;

pub mod api;
mod guards;
pub mod jwt;


pub(crate) mod sqlite {
    pub use famspot_db_sqlite::Connections;
}

#[derive(Debug, Clone, Default)]
pub struct Cfg {
    /// Prefix of all relative photo storage paths.
    pub public_media_url: Option<String>,
    pub search_limits: SearchLimits,
}

impl Cfg {
    pub fn public_media_url(&self) -> Option<&str> {
        self.public_media_url.as_deref()
    }
}

pub(crate) struct InstanceOptions {
    mounts: Vec<(&'static str, Vec<Route>)>,
    rocket_cfg: Option<RocketCfg>,
    cfg: Cfg,
    version: &'static str,
}

pub(crate) fn rocket_instance(
    options: InstanceOptions,
    db: sqlite::Connections,
    jwt_state: jwt::JwtState,
) -> Rocket<rocket::Build> {
    let InstanceOptions {
        mounts,
        rocket_cfg,
        cfg,
        version,
    } = options;

    let r = match rocket_cfg {
        Some(cfg) => rocket::custom(cfg),
        None => rocket::build(),
    };

    let mut instance = r
        .manage(db)
        .manage(jwt_state)
        .manage(cfg)
        .manage(guards::Version(version))
        .register("/", api::catchers());

    for (m, r) in mounts {
        instance = instance.mount(m, r);
    }
    instance
}

fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![("/", api::routes())]
}

pub async fn run(
    db: sqlite::Connections,
    jwt_state: jwt::JwtState,
    enable_cors: bool,
    cfg: Cfg,
    version: &'static str,
) {
    let options = InstanceOptions {
        mounts: mounts(),
        rocket_cfg: None,
        cfg,
        version,
    };
    let instance = rocket_instance(options, db, jwt_state);
    let server_task = if enable_cors {
        match rocket_cors::CorsOptions::default().to_cors() {
            Ok(cors) => {
                info!("Enabling CORS for all origins");
                instance.attach(cors).launch()
            }
            Err(err) => {
                error!("Invalid CORS configuration: {err}");
                return;
            }
        }
    } else {
        instance.launch()
    };
    info!("Launching web server");
    if let Err(err) = server_task.await {
        error!("Unable to run web server: {err}");
    }
}
