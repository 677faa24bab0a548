//! Approximate matching of a search pattern against address fields.
//!
//! Scores run from `0.0` (perfect) to `1.0` (no resemblance). A fuzzy token
//! is scored by the fewest edits needed to find it anywhere in the field
//! text, divided by the token length, so the `threshold` option bounds the
//! share of characters allowed to differ.

use std::cmp::{min, Ordering};

use serde::Deserialize;

use crate::address::models::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    AddressString,
    BuildingNumber,
    BuildingName,
    SubBuildingName,
    ThoroughfareName,
    DependentLocality,
    PostTown,
    County,
    Postcode,
    Country,
    Uprn,
}

impl AddressField {
    fn text(self, address: &Address) -> String {
        match self {
            AddressField::AddressString => address.address_string.clone(),
            AddressField::BuildingNumber => address
                .building_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            AddressField::BuildingName => address.building_name.clone(),
            AddressField::SubBuildingName => address.sub_building_name.clone(),
            AddressField::ThoroughfareName => address.thoroughfare_name.clone(),
            AddressField::DependentLocality => address.dependent_locality.clone(),
            AddressField::PostTown => address.post_town.clone(),
            AddressField::County => address.county.clone(),
            AddressField::Postcode => address.postcode.clone(),
            AddressField::Country => address.country.clone(),
            AddressField::Uprn => address.uprn.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    pub should_sort: bool,
    /// Highest score still counted as a match. Lower is stricter.
    pub threshold: f64,
    /// Enables `|` alternatives, whitespace separated terms and term operators.
    pub use_extended_search: bool,
    /// When false, matches far from `location` are penalised by `distance`.
    pub ignore_location: bool,
    pub is_case_sensitive: bool,
    pub location: usize,
    pub distance: usize,
    pub keys: Vec<AddressField>,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        FuzzyOptions {
            should_sort: true,
            threshold: 0.2,
            use_extended_search: true,
            ignore_location: true,
            is_case_sensitive: false,
            location: 0,
            distance: 100,
            keys: vec![AddressField::AddressString],
        }
    }
}

impl FuzzyOptions {
    pub fn with_overrides(&self, overrides: &FuzzyOptionOverrides) -> FuzzyOptions {
        FuzzyOptions {
            should_sort: overrides.should_sort.unwrap_or(self.should_sort),
            threshold: overrides.threshold.unwrap_or(self.threshold),
            use_extended_search: overrides.use_extended_search.unwrap_or(self.use_extended_search),
            ignore_location: overrides.ignore_location.unwrap_or(self.ignore_location),
            is_case_sensitive: overrides.is_case_sensitive.unwrap_or(self.is_case_sensitive),
            location: overrides.location.unwrap_or(self.location),
            distance: overrides.distance.unwrap_or(self.distance),
            keys: match &overrides.keys {
                Some(keys) => keys.iter().map(SearchKey::field).collect(),
                None => self.keys.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyOptionOverrides {
    pub should_sort: Option<bool>,
    pub threshold: Option<f64>,
    pub use_extended_search: Option<bool>,
    pub ignore_location: Option<bool>,
    pub is_case_sensitive: Option<bool>,
    pub location: Option<usize>,
    pub distance: Option<usize>,
    pub keys: Option<Vec<SearchKey>>,
}

/// A key given either as a bare field name or as `{ "name": ... }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SearchKey {
    Name(AddressField),
    Object { name: AddressField },
}

impl SearchKey {
    fn field(&self) -> AddressField {
        match self {
            SearchKey::Name(field) | SearchKey::Object { name: field } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    /// Position of the matched address in the searched slice.
    pub index: usize,
    pub score: f64,
}

pub trait FuzzyMatcher {
    fn search(&self, pattern: &str, candidates: &[Address], options: &FuzzyOptions) -> Vec<FuzzyMatch>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMatcher;

impl FuzzyMatcher for ApproximateMatcher {
    fn search(&self, pattern: &str, candidates: &[Address], options: &FuzzyOptions) -> Vec<FuzzyMatch> {
        let pattern = if options.is_case_sensitive {
            pattern.trim().to_owned()
        } else {
            pattern.trim().to_lowercase()
        };
        if pattern.is_empty() {
            return Vec::new();
        }
        let groups = parse_pattern(&pattern, options.use_extended_search);

        let mut matches: Vec<FuzzyMatch> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, address)| {
                options
                    .keys
                    .iter()
                    .filter_map(|key| {
                        let text = key.text(address);
                        let text = if options.is_case_sensitive { text } else { text.to_lowercase() };
                        score_groups(&groups, &text, options)
                    })
                    .min_by(cmp_scores)
                    .map(|score| FuzzyMatch { index, score })
            })
            .collect();

        if options.should_sort {
            matches.sort_by(|a, b| cmp_scores(&a.score, &b.score));
        }
        matches
    }
}

fn cmp_scores(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Fuzzy(Vec<char>),
    Exact(String),
    Include(String),
    Prefix(String),
    Suffix(String),
    InverseInclude(String),
    InversePrefix(String),
    InverseSuffix(String),
}

fn parse_pattern(pattern: &str, extended: bool) -> Vec<Vec<Term>> {
    if !extended {
        return vec![vec![Term::Fuzzy(pattern.chars().collect())]];
    }
    pattern
        .split('|')
        .map(|group| group.split_whitespace().map(parse_term).collect::<Vec<Term>>())
        .filter(|group| !group.is_empty())
        .collect()
}

fn parse_term(raw: &str) -> Term {
    let operand = |prefix: usize, suffix: usize| -> Option<String> {
        if raw.len() > prefix + suffix {
            Some(raw[prefix..raw.len() - suffix].to_owned())
        } else {
            None
        }
    };

    let term = if raw.starts_with("!^") {
        operand(2, 0).map(Term::InversePrefix)
    } else if raw.starts_with('!') && raw.ends_with('$') {
        operand(1, 1).map(Term::InverseSuffix)
    } else if raw.starts_with('!') {
        operand(1, 0).map(Term::InverseInclude)
    } else if raw.starts_with('=') {
        operand(1, 0).map(Term::Exact)
    } else if raw.starts_with('\'') {
        operand(1, 0).map(Term::Include)
    } else if raw.starts_with('^') {
        operand(1, 0).map(Term::Prefix)
    } else if raw.ends_with('$') {
        operand(0, 1).map(Term::Suffix)
    } else {
        None
    };
    term.unwrap_or_else(|| Term::Fuzzy(raw.chars().collect()))
}

/// Score of the first group whose terms all match, averaged over its terms.
fn score_groups(groups: &[Vec<Term>], text: &str, options: &FuzzyOptions) -> Option<f64> {
    groups.iter().find_map(|terms| {
        let mut total = 0.0;
        for term in terms {
            total += score_term(term, text, options)?;
        }
        Some(total / terms.len() as f64)
    })
}

fn score_term(term: &Term, text: &str, options: &FuzzyOptions) -> Option<f64> {
    let exact = |matched: bool| if matched { Some(0.0) } else { None };
    match term {
        Term::Fuzzy(pattern) => approximate_score(pattern, text, options),
        Term::Exact(s) => exact(text == s),
        Term::Include(s) => exact(text.contains(s.as_str())),
        Term::Prefix(s) => exact(text.starts_with(s.as_str())),
        Term::Suffix(s) => exact(text.ends_with(s.as_str())),
        Term::InverseInclude(s) => exact(!text.contains(s.as_str())),
        Term::InversePrefix(s) => exact(!text.starts_with(s.as_str())),
        Term::InverseSuffix(s) => exact(!text.ends_with(s.as_str())),
    }
}

/// Best score of `pattern` against any substring of `text`, if within threshold.
fn approximate_score(pattern: &[char], text: &str, options: &FuzzyOptions) -> Option<f64> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }

    // column[i]: fewest edits matching pattern[..i] to a substring ending here
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best: Option<f64> = None;
    for (j, c) in text.chars().enumerate() {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = if pattern[i - 1] == c { 0 } else { 1 };
            column[i] = min(min(diagonal + cost, above + 1), column[i - 1] + 1);
            diagonal = above;
        }

        let start = (j + 1).saturating_sub(m);
        let score = compute_score(column[m], m, start, options);
        if best.map_or(true, |b| score < b) {
            best = Some(score);
        }
    }
    best.filter(|score| *score <= options.threshold)
}

fn compute_score(errors: usize, pattern_len: usize, start: usize, options: &FuzzyOptions) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if options.ignore_location {
        return accuracy;
    }

    let proximity = if start > options.location {
        start - options.location
    } else {
        options.location - start
    };
    if options.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }
    accuracy + proximity as f64 / options.distance as f64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::address::unify::unify;
    use crate::places::models::PlacesRecord;
    use crate::test_fixtures::dpa;

    fn address(uprn: u64, building_number: u64, address_string: &str) -> Address {
        let mut address = unify(&PlacesRecord::Dpa(dpa(uprn, building_number))).unwrap();
        address.address_string = address_string.to_owned();
        address
    }

    fn search(pattern: &str, candidates: &[Address], options: &FuzzyOptions) -> Vec<usize> {
        ApproximateMatcher
            .search(pattern, candidates, options)
            .iter()
            .map(|m| m.index)
            .collect()
    }

    fn candidates() -> Vec<Address> {
        vec![
            address(1, 1, "1 The Road, My Town, A123BC"),
            address(2, 2, "Something Completely Random, A123BC"),
            address(3, 3, "Amazon.co.uk, 3 Warehouse Lane, Big Town, B45 6CD"),
        ]
    }

    #[test]
    fn test_search_separated_terms() {
        let matched = search("the road my town", &candidates(), &FuzzyOptions::default());
        assert_eq!(matched, vec![0]);
    }

    #[test]
    fn test_search_tolerates_typos() {
        let matched = search("warehoose lane", &candidates(), &FuzzyOptions::default());
        assert_eq!(matched, vec![2]);
    }

    #[test]
    fn test_search_sorts_by_score() {
        let candidates = vec![
            address(1, 1, "1 High Stret, My Town"),
            address(2, 2, "2 High Street, My Town"),
        ];
        let matches = ApproximateMatcher.search("high street", &candidates, &FuzzyOptions::default());
        assert_eq!(matches.iter().map(|m| m.index).collect::<Vec<usize>>(), vec![1, 0]);
        assert_eq!(matches[0].score, 0.0);
        assert!(matches[1].score > 0.0);

        let options = FuzzyOptions { should_sort: false, ..FuzzyOptions::default() };
        assert_eq!(search("high street", &candidates, &options), vec![0, 1]);
    }

    #[test]
    fn test_search_empty_pattern() {
        assert!(search("   ", &candidates(), &FuzzyOptions::default()).is_empty());
    }

    #[test]
    fn test_search_extended_operators() {
        let options = FuzzyOptions::default();
        assert_eq!(search("'amazon.co.uk", &candidates(), &options), vec![2]);
        assert_eq!(search("^1 a123bc$", &candidates(), &options), vec![0]);
        assert_eq!(search("!random a123bc", &candidates(), &options), vec![0]);
        assert_eq!(search("random | warehouse", &candidates(), &options), vec![1, 2]);
        assert_eq!(search("=1", &candidates(), &options), Vec::<usize>::new());

        let options = FuzzyOptions { keys: vec![AddressField::BuildingNumber], ..FuzzyOptions::default() };
        assert_eq!(search("=1", &candidates(), &options), vec![0]);
    }

    #[test]
    fn test_search_without_extended_search() {
        assert_eq!(search("town road", &candidates(), &FuzzyOptions::default()), vec![0]);

        let options = FuzzyOptions { use_extended_search: false, ..FuzzyOptions::default() };
        assert_eq!(search("town road", &candidates(), &options), Vec::<usize>::new());
        assert_eq!(search("the road my town", &candidates(), &options), vec![0]);
    }

    #[test]
    fn test_search_with_location() {
        let options = FuzzyOptions { ignore_location: false, ..FuzzyOptions::default() };
        // 'big town' starts 33 characters in, too far from the start of the text
        assert_eq!(search("big town", &candidates(), &options), Vec::<usize>::new());
        assert_eq!(search("amazon", &candidates(), &options), vec![2]);
    }

    #[test]
    fn test_search_other_keys() {
        let options = FuzzyOptions { keys: vec![AddressField::BuildingNumber], ..FuzzyOptions::default() };
        assert_eq!(search("1", &candidates(), &options), vec![0]);
    }

    #[test]
    fn test_with_overrides() {
        let overrides: FuzzyOptionOverrides = serde_json::from_value(json!({
            "threshold": 0.4,
            "keys": [{ "name": "buildingNumber" }, "postTown"]
        }))
        .unwrap();

        let options = FuzzyOptions::default().with_overrides(&overrides);
        assert_eq!(options.threshold, 0.4);
        assert_eq!(options.keys, vec![AddressField::BuildingNumber, AddressField::PostTown]);
        assert!(options.should_sort);
        assert!(options.use_extended_search);
        assert!(options.ignore_location);
    }

    #[test]
    fn test_approximate_score() {
        let options = FuzzyOptions::default();
        let pattern: Vec<char> = "lane".chars().collect();
        assert_eq!(approximate_score(&pattern, "3 warehouse lane", &options), Some(0.0));
        assert_eq!(approximate_score(&pattern, "3 warehouse lnae", &options), None);

        let lenient = FuzzyOptions { threshold: 0.5, ..FuzzyOptions::default() };
        assert_eq!(approximate_score(&pattern, "3 warehouse lnae", &lenient), Some(0.5));
    }
}
