//! Paths shared by the backend endpoint and the navigation affordances.

use crate::domain::BeerId;

pub const BEERS_ROUTE: &str = "/beers";
pub const ADD_BEER_ROUTE: &str = "/beers/add";

pub fn beer_detail(id: BeerId) -> String {
    format!("{BEERS_ROUTE}/{id}")
}
