use lazy_static::lazy_static;
use regex::{NoExpand, Regex, RegexBuilder};

/// Search terms the upstream API struggles to match, with the replacement
/// term to search for in an additional query.
const KNOWN_ISSUE_SEARCH_TERM_REPLACEMENTS: &[(&str, &str)] = &[
    ("amazon", "amazon.co.uk"),
    // Entries are often like 'HM Prison Ranby', which the API struggles to match
    ("hmp", "prison"),
];

lazy_static! {
    static ref REPLACEMENTS: Vec<(Regex, &'static str)> = KNOWN_ISSUE_SEARCH_TERM_REPLACEMENTS
        .iter()
        .map(|(term, replacement)| {
            let re = RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .expect("Could not create regex");
            (re, *replacement)
        })
        .collect();
}

#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedQuery {
    pub sanitised: String,
    pub augmented: String,
}

impl AugmentedQuery {
    /// Whether an additional upstream query is needed for the augmented text.
    pub fn needs_additional_query(&self) -> bool {
        self.sanitised != self.augmented
    }
}

/// Applies every known issue replacement in table order, each one seeing the
/// output of the previous.
pub fn augment_query(sanitised: &str) -> AugmentedQuery {
    let augmented = REPLACEMENTS
        .iter()
        .fold(sanitised.to_owned(), |query, (re, replacement)| {
            re.replace_all(&query, NoExpand(replacement)).into_owned()
        });

    AugmentedQuery {
        sanitised: sanitised.to_owned(),
        augmented,
    }
}
