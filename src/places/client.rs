use std::collections::BTreeMap;

use futures::future::{BoxFuture, FutureExt};
use log::{debug, info};
use serde_json::{json, Value};

use crate::config::OsPlacesConfig;
use crate::places::error::PlacesApiError;
use crate::places::models::PlacesResponse;

/// Query parameters replacing, or added to, the defaults sent upstream.
/// Array values are sent as repeated parameters.
pub type QueryParamOverrides = BTreeMap<String, Value>;

const MAX_RETRIES: usize = 2;

pub trait PlacesApi {
    fn find<'a>(
        &'a self,
        query: &'a str,
        overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, Result<PlacesResponse, PlacesApiError>>;

    fn uprn<'a>(
        &'a self,
        uprn: &'a str,
        overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, Result<PlacesResponse, PlacesApiError>>;
}

#[derive(Clone)]
pub struct OsPlacesClient {
    http: reqwest::Client,
    config: OsPlacesConfig,
}

impl OsPlacesClient {
    pub fn new(config: OsPlacesConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        OsPlacesClient { http, config }
    }

    fn find_params(&self, query: &str, overrides: &QueryParamOverrides) -> Vec<(String, String)> {
        merge_params(
            vec![
                ("query", json!(query)),
                ("key", json!(self.config.api_key)),
                ("lr", json!("EN")),
                // Only want active addresses
                ("fq", json!(["LOGICAL_STATUS_CODE:1", "LPI_LOGICAL_STATUS_CODE:1"])),
                // LPI performs better by default, especially for business addresses
                ("dataset", json!("LPI")),
            ],
            overrides,
        )
    }

    fn uprn_params(&self, uprn: &str, overrides: &QueryParamOverrides) -> Vec<(String, String)> {
        merge_params(
            vec![
                ("uprn", json!(uprn)),
                ("key", json!(self.config.api_key)),
                ("dataset", json!("DPA,LPI")),
            ],
            overrides,
        )
    }

    async fn get(&self, path: &str, params: Vec<(String, String)>) -> Result<PlacesResponse, PlacesApiError> {
        let endpoint = format!("{}{}", self.config.url, path);
        let mut retries = 0;
        loop {
            match self.send(&endpoint, &params).await {
                Err(err) if err.is_retryable() && retries < MAX_RETRIES => {
                    info!("Retry handler found API error with {}", err);
                    retries += 1;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, endpoint: &str, params: &[(String, String)]) -> Result<PlacesResponse, PlacesApiError> {
        let response = self.http
            .get(endpoint)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesApiError::Status(status));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl PlacesApi for OsPlacesClient {
    fn find<'a>(
        &'a self,
        query: &'a str,
        overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, Result<PlacesResponse, PlacesApiError>> {
        debug!("Searching OS Places API for '{}'", query);
        let params = self.find_params(query, overrides);
        self.get("/find", params).boxed()
    }

    fn uprn<'a>(
        &'a self,
        uprn: &'a str,
        overrides: &'a QueryParamOverrides,
    ) -> BoxFuture<'a, Result<PlacesResponse, PlacesApiError>> {
        debug!("Looking up UPRN {} in OS Places API", uprn);
        let params = self.uprn_params(uprn, overrides);
        self.get("/uprn", params).boxed()
    }
}

/// Overrides replace the default of the same name in place, or are appended.
/// A null override is sent with an empty value.
fn merge_params(defaults: Vec<(&str, Value)>, overrides: &QueryParamOverrides) -> Vec<(String, String)> {
    let mut params: Vec<(String, Value)> = defaults
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect();

    for (name, value) in overrides {
        match params.iter_mut().find(|(existing, _)| existing == name) {
            Some(param) => param.1 = value.clone(),
            None => params.push((name.clone(), value.clone())),
        }
    }

    params
        .into_iter()
        .flat_map(|(name, value)| match value {
            Value::Array(values) => values
                .iter()
                .map(|v| (name.clone(), param_text(v)))
                .collect::<Vec<(String, String)>>(),
            Value::Null => vec![(name, String::new())],
            other => vec![(name, param_text(&other))],
        })
        .collect()
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
