use actix_web::{App, HttpServer, middleware::Logger, web::Data};
use log::info;

use polls::config::Config;
use polls::db::{self, PollsDb};
use polls::operations::PollOperations;
use polls::service;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let config = Config::load()
        .expect("Failed to load configuration");

    let pool = db::connect(&config.db_url)
        .await
        .expect("Failed to create database pool");
    PollsDb::new(pool.clone())
        .init_schema()
        .await
        .expect("Failed to create database schema");

    let app = move || {
        let db = PollsDb::new(pool.clone());
        let ops = PollOperations::new(db);
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(ops))
            .configure(service::config::<PollOperations>)
    };
    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(app).bind((config.host.as_str(), config.port))?
        .run()
        .await
}
