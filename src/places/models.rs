use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub header: Option<ResponseHeader>,
    #[serde(default)]
    pub results: Vec<RawResult>,
}

impl PlacesResponse {
    pub fn is_empty(&self) -> bool {
        self.header.as_ref().map_or(false, |h| h.totalresults == 0)
    }

    pub fn into_records(self) -> impl Iterator<Item = PlacesRecord> {
        self.results.into_iter().filter_map(RawResult::into_record)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub totalresults: u64,
}

/// One upstream result, as sent: either shape may be present.
#[derive(Debug, Default, Deserialize)]
pub struct RawResult {
    #[serde(rename = "DPA", default)]
    pub dpa: Option<DeliveryPointAddress>,
    #[serde(rename = "LPI", default)]
    pub lpi: Option<LandPropertyIdentifier>,
}

impl RawResult {
    /// Results with neither shape populated are malformed and yield `None`.
    pub fn into_record(self) -> Option<PlacesRecord> {
        match (self.dpa, self.lpi) {
            (Some(dpa), _) => Some(PlacesRecord::Dpa(dpa)),
            (None, Some(lpi)) => Some(PlacesRecord::Lpi(lpi)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PlacesRecord {
    Dpa(DeliveryPointAddress),
    Lpi(LandPropertyIdentifier),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DeliveryPointAddress {
    #[serde(deserialize_with = "lenient_number")]
    pub uprn: Option<u64>,
    pub address: Option<String>,
    pub organisation_name: Option<String>,
    pub sub_building_name: Option<String>,
    pub building_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub building_number: Option<u64>,
    pub thoroughfare_name: Option<String>,
    pub dependent_locality: Option<String>,
    pub post_town: Option<String>,
    pub postcode: Option<String>,
    pub country_code: Option<String>,
    pub local_custodian_code_description: Option<String>,
    pub postal_address_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct LandPropertyIdentifier {
    #[serde(deserialize_with = "lenient_number")]
    pub uprn: Option<u64>,
    pub address: Option<String>,
    pub organisation: Option<String>,
    pub sao_text: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub pao_start_number: Option<u64>,
    pub pao_text: Option<String>,
    pub street_description: Option<String>,
    pub town_name: Option<String>,
    pub postcode_locator: Option<String>,
    pub country_code: Option<String>,
    pub local_custodian_code_description: Option<String>,
    pub postal_address_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

// The live API sends numeric identifiers as strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrText> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
