use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use creatorfunnel::config::AppConfig;
use creatorfunnel::routes::init_routes;
use creatorfunnel::state::app_state::AppState;
use dotenv::dotenv;
use env_logger::Env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    let bind_addr = (config.host.clone(), config.port);
    let allowed_origins = config.allowed_origins.clone();
    log::info!(
        "Starting server on {}:{} ({:?})",
        bind_addr.0,
        bind_addr.1,
        config.environment
    );

    // Create shared state
    let app_state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec![http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .supports_credentials()
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
