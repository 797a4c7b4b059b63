#[macro_use]
extern crate log;

use famspot_db_sqlite::Connections;

mod adapters;
mod core;
mod web;

pub use web::{jwt::JwtState, Cfg};

pub async fn run(
    connections: Connections,
    jwt_state: JwtState,
    enable_cors: bool,
    cfg: Cfg,
    version: &'static str,
) {
    web::run(connections, jwt_state, enable_cors, cfg, version).await;
}
