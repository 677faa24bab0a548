use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref POSTCODE: Regex = Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$")
        .expect("Could not create regex");
    static ref STRING_CONTAINING_POSTCODE: Regex =
        Regex::new(r"(?i)^(.*?)([A-Z]{1,2}[0-9][A-Z0-9]? ?)([0-9][A-Z]{2})(.*)$")
            .expect("Could not create regex");
    static ref NON_POSTCODE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9 ]")
        .expect("Could not create regex");
}

/// Whether the whole input is a UK postcode, with or without the space.
pub fn is_postcode(query: &str) -> bool {
    POSTCODE.is_match(query)
}

/// Formats a UK postcode found anywhere in `input` as `OUTWARD INWARD`,
/// keeping the text around it. Input without a postcode is returned as is.
///
/// The upstream API responds better when postcodes are properly formatted.
pub fn sanitise_uk_postcode(input: &str) -> String {
    if input.is_empty() {
        return input.to_owned();
    }

    let stripped = NON_POSTCODE_CHARS.replace_all(input, "");
    match STRING_CONTAINING_POSTCODE.captures(&stripped) {
        Some(parts) => format!(
            "{}{} {}{}",
            &parts[1],
            parts[2].to_uppercase().trim(),
            parts[3].to_uppercase().trim(),
            &parts[4]
        ),
        None => input.to_owned(),
    }
}
