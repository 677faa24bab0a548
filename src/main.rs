use std::env;
use std::io;

use actix_web::{App, HttpServer};
use actix_web::middleware::Logger;
use env_logger;
use log::info;

use crate::address::AddressService;
use crate::config::init_config;
use crate::places::OsPlacesClient;

mod address;
mod api;
mod config;
mod places;
mod utils;
#[cfg(test)]
mod test_fixtures;

#[actix_rt::main]
async fn main() -> io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = init_config();
    let service = AddressService::new(OsPlacesClient::new(config.os_places.clone()));

    info!("Listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .data(service.clone())
            .wrap(Logger::default())
            .configure(api::configure::<OsPlacesClient>)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
