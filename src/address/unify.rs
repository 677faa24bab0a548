use crate::address::models::Address;
use crate::places::models::{DeliveryPointAddress, LandPropertyIdentifier, PlacesRecord};
use crate::utils::{convert_to_title_case, title_case_option, BlankExtension};

/// Marks records that are not postal addresses, e.g. car parks or substations.
const NON_POSTAL_ADDRESS_CODE: &str = "N";

/// The fields both record shapes have in common, under one set of names.
struct RecordFields<'a> {
    uprn: Option<u64>,
    address: Option<&'a str>,
    organisation: Option<&'a str>,
    sub_building_name: Option<&'a str>,
    building_name: Option<&'a str>,
    building_number: Option<u64>,
    thoroughfare_name: Option<&'a str>,
    dependent_locality: Option<&'a str>,
    post_town: Option<&'a str>,
    county: Option<&'a str>,
    postcode: Option<&'a str>,
    country: Option<&'a str>,
    postal_address_code: Option<&'a str>,
}

impl<'a> From<&'a DeliveryPointAddress> for RecordFields<'a> {
    fn from(dpa: &'a DeliveryPointAddress) -> Self {
        RecordFields {
            uprn: dpa.uprn,
            address: dpa.address.as_deref(),
            organisation: dpa.organisation_name.as_deref(),
            sub_building_name: dpa.sub_building_name.as_deref(),
            building_name: dpa.building_name.as_deref(),
            building_number: dpa.building_number,
            thoroughfare_name: dpa.thoroughfare_name.as_deref(),
            dependent_locality: dpa.dependent_locality.as_deref(),
            post_town: dpa.post_town.as_deref(),
            county: dpa.local_custodian_code_description.as_deref(),
            postcode: dpa.postcode.as_deref(),
            country: dpa.country_code.as_deref(),
            postal_address_code: dpa.postal_address_code.as_deref(),
        }
    }
}

impl<'a> From<&'a LandPropertyIdentifier> for RecordFields<'a> {
    fn from(lpi: &'a LandPropertyIdentifier) -> Self {
        RecordFields {
            uprn: lpi.uprn,
            address: lpi.address.as_deref(),
            organisation: lpi.organisation.as_deref(),
            sub_building_name: lpi.sao_text.as_deref(),
            building_name: lpi.pao_text.as_deref(),
            building_number: lpi.pao_start_number,
            thoroughfare_name: lpi.street_description.as_deref(),
            dependent_locality: None,
            post_town: lpi.town_name.as_deref(),
            county: lpi.local_custodian_code_description.as_deref(),
            postcode: lpi.postcode_locator.as_deref(),
            country: lpi.country_code.as_deref(),
            postal_address_code: lpi.postal_address_code.as_deref(),
        }
    }
}

/// Converts an upstream record into an [`Address`].
///
/// Returns `None` for non-postal records and for records without a UPRN.
pub fn unify(record: &PlacesRecord) -> Option<Address> {
    let fields = match record {
        PlacesRecord::Dpa(dpa) => RecordFields::from(dpa),
        PlacesRecord::Lpi(lpi) => RecordFields::from(lpi),
    };
    unify_fields(fields)
}

fn unify_fields(fields: RecordFields) -> Option<Address> {
    if fields.postal_address_code == Some(NON_POSTAL_ADDRESS_CODE) {
        return None;
    }
    let uprn = fields.uprn?;

    let use_organisation_as_building_name = !fields.organisation.is_blank()
        && fields.building_name.is_blank()
        && fields.sub_building_name.is_blank();

    let building_name = if use_organisation_as_building_name {
        title_case_option(fields.organisation)
    } else {
        title_case_option(fields.building_name)
    };

    let organisation = if use_organisation_as_building_name {
        None
    } else {
        fields.organisation
    };
    let sub_building_name = [organisation, fields.sub_building_name]
        .iter()
        .flatten()
        .filter(|name| !name.is_blank())
        .map(|name| convert_to_title_case(name))
        .collect::<Vec<String>>()
        .join(", ");

    Some(Address {
        address_string: format_address_string(
            fields.address.unwrap_or_default(),
            fields.building_number,
            fields.thoroughfare_name,
            fields.postcode,
        ),
        building_number: fields.building_number,
        building_name,
        sub_building_name,
        thoroughfare_name: title_case_option(fields.thoroughfare_name),
        dependent_locality: title_case_option(fields.dependent_locality),
        post_town: title_case_option(fields.post_town),
        county: title_case_option(fields.county),
        postcode: fields.postcode.unwrap_or_default().to_owned(),
        country: fields.country.unwrap_or_default().to_owned(),
        uprn,
    })
}

/// Strips the postcode off the upstream address line, removes the comma the
/// upstream puts between building number and street, title cases what is left
/// and appends the postcode again.
fn format_address_string(
    address: &str,
    building_number: Option<u64>,
    thoroughfare_name: Option<&str>,
    postcode: Option<&str>,
) -> String {
    let postcode = postcode.filter(|p| !p.is_blank());

    let mut without_postcode = match postcode {
        Some(postcode) => address.replacen(&format!(", {}", postcode), "", 1),
        None => address.to_owned(),
    };
    if let (Some(number), Some(thoroughfare)) = (building_number, thoroughfare_name) {
        without_postcode = without_postcode.replacen(
            &format!("{}, {}", number, thoroughfare),
            &format!("{} {}", number, thoroughfare),
            1,
        );
    }

    let title_cased = convert_to_title_case(&without_postcode);
    match postcode {
        Some(postcode) if title_cased.is_empty() => postcode.to_owned(),
        Some(postcode) => format!("{}, {}", title_cased, postcode),
        None => title_cased,
    }
}
