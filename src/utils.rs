use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_QUERY_CHARS: Regex = Regex::new(r"[^a-z0-9\-.' ]")
        .expect("Could not create regex");
}

pub trait BlankExtension {
    fn is_blank(&self) -> bool;
}

impl BlankExtension for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl <T: AsRef<str>> BlankExtension for Option<T> {
    fn is_blank(&self) -> bool {
        match self {
            Some(value) => value.as_ref().is_blank(),
            None => true,
        }
    }
}

/// Upper cases the first letter of every word and lower cases the rest.
/// Words start after whitespace, a hyphen or an opening parenthesis.
pub fn convert_to_title_case(sentence: &str) -> String {
    if sentence.is_blank() {
        return String::new();
    }

    let mut result = String::with_capacity(sentence.len());
    let mut word_start = true;
    for c in sentence.chars() {
        if word_start {
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace() || c == '-' || c == '(';
    }
    result
}

pub fn title_case_option(value: Option<&str>) -> String {
    value.map(convert_to_title_case).unwrap_or_default()
}

/// Lower cases and trims a query, keeping only letters, digits and `-.' `.
pub fn sanitise_string(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    UNSAFE_QUERY_CHARS.replace_all(&lowered, "").into_owned()
}
