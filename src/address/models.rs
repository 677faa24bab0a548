use serde::{Deserialize, Serialize};

use crate::address::fuzzy::FuzzyOptionOverrides;
use crate::places::QueryParamOverrides;

/// An address unified from either upstream record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_string: String,
    pub building_number: Option<u64>,
    pub building_name: String,
    pub sub_building_name: String,
    pub thoroughfare_name: String,
    pub dependent_locality: String,
    pub post_town: String,
    pub county: String,
    pub postcode: String,
    pub country: String,
    pub uprn: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MatchingQueryConfig {
    pub os_places_query_param_overrides: QueryParamOverrides,
    pub fuzzy_match_option_overrides: FuzzyOptionOverrides,
}

#[derive(Debug, Clone, Default)]
pub struct UprnQueryConfig {
    pub os_places_query_param_overrides: QueryParamOverrides,
}
