use futures::future::try_join;
use log::{debug, info};

use crate::address::fuzzy::{ApproximateMatcher, FuzzyOptions};
use crate::address::known_issues::augment_query;
use crate::address::models::{Address, MatchingQueryConfig, UprnQueryConfig};
use crate::address::postcode::sanitise_uk_postcode;
use crate::address::ranking::{dedupe_by_uprn, rank_addresses};
use crate::address::unify::unify;
use crate::places::models::PlacesResponse;
use crate::places::{PlacesApi, PlacesApiError, QueryParamOverrides};
use crate::utils::sanitise_string;

pub mod fuzzy;
pub mod known_issues;
pub mod models;
pub mod postcode;
pub mod ranking;
pub mod unify;

/// Resolves free text queries and UPRNs into addresses, using the OS Places API.
#[derive(Clone)]
pub struct AddressService<C> {
    client: C,
    matcher: ApproximateMatcher,
}

impl<C: PlacesApi> AddressService<C> {
    pub fn new(client: C) -> Self {
        AddressService { client, matcher: ApproximateMatcher }
    }

    /// Addresses matching `raw_query`, best first. No match is an empty list.
    ///
    /// Queries containing a term the API is known to struggle with are also
    /// searched with the term replaced, and both result sets are combined.
    pub async fn get_addresses_matching_query(
        &self,
        raw_query: &str,
        config: &MatchingQueryConfig,
    ) -> Result<Vec<Address>, PlacesApiError> {
        let query = augment_query(&sanitise_string(raw_query));
        let overrides = &config.os_places_query_param_overrides;

        let primary = self.get_results_for_query(&query.sanitised, overrides);
        let additional = async {
            if query.needs_additional_query() {
                debug!("Also searching for '{}'", query.augmented);
                self.get_results_for_query(&query.augmented, overrides).await
            } else {
                Ok(Vec::new())
            }
        };
        let (mut results, additional_results) = try_join(primary, additional).await?;
        results.extend(additional_results);

        let options = FuzzyOptions::default().with_overrides(&config.fuzzy_match_option_overrides);
        Ok(rank_addresses(
            &self.matcher,
            &query.sanitised,
            &query.augmented,
            dedupe_by_uprn(results),
            &options,
        ))
    }

    /// The address with the given UPRN. When the API returns several records
    /// for it, the last one is used.
    pub async fn get_address_by_uprn(
        &self,
        uprn: &str,
        config: &UprnQueryConfig,
    ) -> Result<Option<Address>, PlacesApiError> {
        let response = self.client
            .uprn(uprn, &config.os_places_query_param_overrides)
            .await?;

        let mut addresses = to_addresses(response);
        if addresses.len() > 1 {
            info!("Multiple results returned for UPRN {}", uprn);
        }
        Ok(addresses.pop())
    }

    async fn get_results_for_query(
        &self,
        query: &str,
        overrides: &QueryParamOverrides,
    ) -> Result<Vec<Address>, PlacesApiError> {
        let response = self.client
            .find(&sanitise_uk_postcode(query), overrides)
            .await?;

        Ok(to_addresses(response))
    }
}

fn to_addresses(response: PlacesResponse) -> Vec<Address> {
    if response.is_empty() {
        return Vec::new();
    }
    response
        .into_records()
        .filter_map(|record| unify(&record))
        .collect()
}
