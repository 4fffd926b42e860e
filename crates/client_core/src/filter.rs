use caseless::default_case_fold_str;
use shared::domain::Beer;

/// Beers whose name contains `term` under Unicode full case folding, in
/// their original order.
///
/// An empty term keeps the whole collection.
pub fn filter_beers(collection: &[Beer], term: &str) -> Vec<Beer> {
    if term.is_empty() {
        return collection.to_vec();
    }

    let needle = default_case_fold_str(term);
    collection
        .iter()
        .filter(|beer| default_case_fold_str(&beer.name).contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
