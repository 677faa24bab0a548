use actix_web::web;

use crate::api::addresses::{address_by_uprn, addresses};
use crate::places::PlacesApi;

pub mod addresses;

pub fn configure<C: PlacesApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/addresses", web::get().to(addresses::<C>))
        .route("/addresses/{uprn}", web::get().to(address_by_uprn::<C>));
}
