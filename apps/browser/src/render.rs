//! Plain-text rendering of the list controller's binding contract.

use std::io::{self, Write};

use client_core::{ListController, ListStatus};
use shared::{domain::Beer, routes::ADD_BEER_ROUTE};

pub fn render_card(beer: &Beer) -> String {
    let mut card = format!("[{}]  -> {}\n", beer.name, beer.detail_route());
    if !beer.description.is_empty() {
        card.push_str(&format!("    {}\n", beer.description));
    }
    card.push_str(&format!("    {}€ | {}% ABV\n", beer.price, beer.abv));
    card
}

pub fn render_view<W: Write>(out: &mut W, controller: &ListController) -> io::Result<()> {
    match controller.status() {
        ListStatus::Loading => writeln!(out, "Loading beers...")?,
        ListStatus::Error => writeln!(
            out,
            "{}",
            controller.error_message().unwrap_or("An error occurred.")
        )?,
        ListStatus::Ready => {
            writeln!(out, "Our craft beers")?;
            if !controller.search_term().is_empty() {
                writeln!(out, "Search: {}", controller.search_term())?;
            }
            let beers = controller.filtered_view();
            if beers.is_empty() {
                writeln!(out, "No beer matches this search.")?;
            }
            for beer in beers {
                write!(out, "{}", render_card(beer))?;
            }
            writeln!(out, "+ Add a beer -> {ADD_BEER_ROUTE}")?;
        }
    }
    out.flush()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
