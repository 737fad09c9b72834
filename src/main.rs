use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{info, error};

use gemini_chat::config::RelayConfig;
use gemini_chat::web::{self, routes};
use gemini_chat::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Gemini chat relay");

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid relay configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = Data::new(AppState::new(&config));

    info!("Gemini API relay listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(web::cors())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
