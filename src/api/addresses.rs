use actix_web::{Error, HttpResponse, web};
use log::error;
use serde::Deserialize;
use serde_json::Value;

use crate::address::AddressService;
use crate::address::models::{MatchingQueryConfig, UprnQueryConfig};
use crate::places::{PlacesApi, QueryParamOverrides};

#[derive(Deserialize)]
pub struct AddressRequest {
    query: String,
    dataset: Option<String>,
    threshold: Option<f64>,
}

#[derive(Deserialize)]
pub struct UprnRequest {
    dataset: Option<String>,
}

fn dataset_override(dataset: &Option<String>) -> QueryParamOverrides {
    let mut overrides = QueryParamOverrides::new();
    if let Some(dataset) = dataset {
        overrides.insert("dataset".to_owned(), Value::from(dataset.as_str()));
    }
    overrides
}

pub async fn addresses<C: PlacesApi + 'static>(
    request: web::Query<AddressRequest>,
    service: web::Data<AddressService<C>>
) -> Result<HttpResponse, Error> {
    let mut config = MatchingQueryConfig::default();
    config.os_places_query_param_overrides = dataset_override(&request.dataset);
    config.fuzzy_match_option_overrides.threshold = request.threshold;

    match service.get_addresses_matching_query(&request.query, &config).await {
        Ok(addresses) => { Ok(HttpResponse::Ok().json(addresses)) },
        Err(err) => {
            error!("Error while retrieving addresses: {}", err);
            Ok(HttpResponse::InternalServerError().finish())
        },
    }
}

pub async fn address_by_uprn<C: PlacesApi + 'static>(
    uprn: web::Path<u64>,
    request: web::Query<UprnRequest>,
    service: web::Data<AddressService<C>>
) -> Result<HttpResponse, Error> {
    let config = UprnQueryConfig {
        os_places_query_param_overrides: dataset_override(&request.dataset),
    };

    match service.get_address_by_uprn(&uprn.to_string(), &config).await {
        Ok(Some(address)) => { Ok(HttpResponse::Ok().json(address)) },
        Ok(None) => { Ok(HttpResponse::NotFound().finish()) },
        Err(err) => {
            error!("Error while retrieving address for UPRN {}: {}", uprn, err);
            Ok(HttpResponse::InternalServerError().finish())
        },
    }
}
