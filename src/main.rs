use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use elearn_portal::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.production {
        config.validate_for_production().map_err(|e| {
            log::error!("Refusing to start: {}", e);
            std::io::Error::other(e.to_string())
        })?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to initialise state: {}", e)))?;
    state
        .bootstrap()
        .await
        .map_err(|e| std::io::Error::other(format!("failed to bootstrap data: {}", e)))?;

    log::info!("starting HTTP server on {}:{}", bind_address.0, bind_address.1);
    log::info!("serving materials from {}", state.course_service.materials_dir().display());

    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(data.clone())
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
