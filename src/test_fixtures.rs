use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::places::models::{DeliveryPointAddress, LandPropertyIdentifier, PlacesResponse};
use crate::places::{PlacesApi, PlacesApiError, QueryParamOverrides};

type PlacesResult = Result<PlacesResponse, PlacesApiError>;
type Respond = dyn Fn(&str) -> PlacesResult + Send + Sync;

/// In memory OS Places API recording every request made to it.
#[derive(Clone)]
pub struct MockPlacesApi {
    respond: Arc<Respond>,
    find_requests: Arc<Mutex<Vec<(String, QueryParamOverrides)>>>,
    uprn_requests: Arc<Mutex<Vec<String>>>,
}

impl MockPlacesApi {
    fn new(respond: Arc<Respond>) -> Self {
        MockPlacesApi {
            respond,
            find_requests: Arc::new(Mutex::new(Vec::new())),
            uprn_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(response: fn() -> PlacesResponse) -> Self {
        Self::new(Arc::new(move |_: &str| -> PlacesResult { Ok(response()) }))
    }

    pub fn returning_by_query(response: fn(&str) -> PlacesResponse) -> Self {
        Self::new(Arc::new(move |query: &str| -> PlacesResult { Ok(response(query)) }))
    }

    pub fn failing() -> Self {
        Self::new(Arc::new(|_: &str| -> PlacesResult {
            Err(PlacesApiError::Status(StatusCode::UNAUTHORIZED))
        }))
    }

    pub fn find_requests(&self) -> Vec<(String, QueryParamOverrides)> {
        self.find_requests.lock().unwrap().clone()
    }

    pub fn find_queries(&self) -> Vec<String> {
        self.find_requests().into_iter().map(|(query, _)| query).collect()
    }

    pub fn uprn_requests(&self) -> Vec<String> {
        self.uprn_requests.lock().unwrap().clone()
    }
}

impl PlacesApi for MockPlacesApi {
    fn find<'a>(
        &'a self,
        query: &'a str,
        overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, PlacesResult> {
        self.find_requests.lock().unwrap().push((query.to_owned(), overrides.clone()));
        future::ready((self.respond)(query)).boxed()
    }

    fn uprn<'a>(
        &'a self,
        uprn: &'a str,
        _overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, PlacesResult> {
        self.uprn_requests.lock().unwrap().push(uprn.to_owned());
        future::ready((self.respond)(uprn)).boxed()
    }
}

pub fn dpa_json(uprn: u64, building_number: u64) -> Value {
    json!({
        "UPRN": uprn.to_string(),
        "ADDRESS": format!("{}, THE ROAD, MY TOWN, A123BC", building_number),
        "BUILDING_NUMBER": building_number.to_string(),
        "THOROUGHFARE_NAME": "THE ROAD",
        "DEPENDENT_LOCALITY": "MY TOWN",
        "POST_TOWN": "MY POST TOWN",
        "POSTCODE": "A123BC",
        "COUNTRY_CODE": "E",
        "LOCAL_CUSTODIAN_CODE_DESCRIPTION": "MY COUNTY",
        "POSTAL_ADDRESS_CODE": "D"
    })
}

pub fn lpi_json(uprn: u64, building_number: u64) -> Value {
    json!({
        "UPRN": uprn.to_string(),
        "ADDRESS": format!("{}, THE ROAD, MY TOWN, A123BC", building_number),
        "PAO_START_NUMBER": building_number.to_string(),
        "STREET_DESCRIPTION": "THE ROAD",
        "TOWN_NAME": "MY POST TOWN",
        "POSTCODE_LOCATOR": "A123BC",
        "COUNTRY_CODE": "E",
        "LOCAL_CUSTODIAN_CODE_DESCRIPTION": "MY COUNTY",
        "POSTAL_ADDRESS_CODE": "D"
    })
}

pub fn dpa(uprn: u64, building_number: u64) -> DeliveryPointAddress {
    serde_json::from_value(dpa_json(uprn, building_number)).unwrap()
}

pub fn lpi(uprn: u64, building_number: u64) -> LandPropertyIdentifier {
    serde_json::from_value(lpi_json(uprn, building_number)).unwrap()
}

pub fn response(results: Vec<Value>) -> PlacesResponse {
    serde_json::from_value(response_json(results)).unwrap()
}

pub fn response_json(results: Vec<Value>) -> Value {
    json!({
        "header": { "totalresults": results.len() },
        "results": results
    })
}

/// Two addresses on 'The Road, My Town' with UPRNs and numbers 1 and 2.
pub fn query_response_json() -> Value {
    response_json(vec![
        json!({ "LPI": lpi_json(2, 2) }),
        json!({ "DPA": dpa_json(1, 1) }),
    ])
}

pub fn query_response() -> PlacesResponse {
    serde_json::from_value(query_response_json()).unwrap()
}

pub fn single_response() -> PlacesResponse {
    response(vec![json!({ "DPA": dpa_json(12345, 1), "LPI": lpi_json(12345, 1) })])
}

pub fn empty_response() -> PlacesResponse {
    response(vec![])
}

pub fn non_postal_response() -> PlacesResponse {
    let mut car_park = dpa_json(3, 3);
    car_park["POSTAL_ADDRESS_CODE"] = json!("N");
    let mut substation = lpi_json(4, 4);
    substation["POSTAL_ADDRESS_CODE"] = json!("N");
    response(vec![json!({ "DPA": car_park }), json!({ "LPI": substation })])
}
