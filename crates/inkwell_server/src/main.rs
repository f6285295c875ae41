//! inkwell HTTP server entry point.

use actix_web::{web, App, HttpServer};
use clap::Parser;
use inkwell_core::db::open_db;
use inkwell_server::{configure, cors_layer, session_middleware, AppState, ServerConfig};
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();

    let logging = match config.log_dir.as_deref() {
        Some(dir) => inkwell_core::init_logging(&config.log_level, dir),
        None => inkwell_core::init_stderr_logging(&config.log_level),
    };
    if let Err(err) = logging {
        eprintln!("logging disabled: {err}");
    }

    let settings = config.into_settings().map_err(io::Error::other)?;
    let conn = open_db(&settings.database).map_err(io::Error::other)?;
    let state = web::Data::new(AppState::new(conn));

    info!(
        "event=server_start module=http status=ok bind={} cookie_secure={}",
        settings.bind, settings.cookie_secure
    );

    let key = settings.session_key.clone();
    let secure = settings.cookie_secure;
    let origin = settings.frontend_origin.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), secure))
            .wrap(cors_layer(&origin))
            .configure(configure)
    })
    .bind(settings.bind)?
    .run()
    .await
}
