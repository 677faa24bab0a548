use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use crate::address::fuzzy::{FuzzyMatcher, FuzzyOptions};
use crate::address::models::Address;
use crate::address::postcode::is_postcode;
use crate::utils::sanitise_string;

/// No postcode holds more properties than this.
pub const MAX_RESULTS: usize = 100;

/// Keeps the first address seen for each UPRN, preserving order.
pub fn dedupe_by_uprn(addresses: Vec<Address>) -> Vec<Address> {
    let mut seen = HashSet::with_capacity(addresses.len());
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.uprn))
        .collect()
}

/// Orders candidates by how well they match the query.
///
/// Addresses the fuzzy search rejects are dropped, unless it rejects all of
/// them. Postcode queries are then ordered by building number; other queries
/// put addresses containing the query text ahead of the rest.
pub fn rank_addresses<M: FuzzyMatcher>(
    matcher: &M,
    query: &str,
    augmented_query: &str,
    candidates: Vec<Address>,
    options: &FuzzyOptions,
) -> Vec<Address> {
    let matches = matcher.search(query, &candidates, options);
    let best_matches = if matches.is_empty() {
        candidates
    } else {
        let mut slots: Vec<Option<Address>> = candidates.into_iter().map(Some).collect();
        matches
            .iter()
            .filter_map(|m| slots.get_mut(m.index).and_then(Option::take))
            .collect()
    };

    let mut ranked = if is_postcode(query) {
        let mut by_number = best_matches;
        by_number.sort_by(|a, b| natural_cmp(&a.address_string, &b.address_string));
        by_number
    } else {
        prefer_exact_matches(query, augmented_query, best_matches)
    };
    ranked.truncate(MAX_RESULTS);
    ranked
}

// Separated search terms let looser matches through, so exact ones go first.
fn prefer_exact_matches(query: &str, augmented_query: &str, addresses: Vec<Address>) -> Vec<Address> {
    if query.is_empty() {
        return addresses;
    }
    let (mut exact, rest): (Vec<Address>, Vec<Address>) = addresses.into_iter().partition(|address| {
        let text = sanitise_string(&address.address_string);
        text.contains(query) || text.contains(augmented_query)
    });
    exact.extend(rest);
    exact
}

/// Case insensitive comparison that orders runs of digits by their value,
/// so '2 The Road' sorts before '10 The Road'.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();
    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_digits = take_digits(&mut a_chars);
                let y_digits = take_digits(&mut b_chars);
                let ordering = cmp_digits(&x_digits, &y_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
