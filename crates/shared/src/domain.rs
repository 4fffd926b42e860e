use serde::{Deserialize, Serialize};

use crate::routes;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(BeerId);

/// One catalog entry as served by the `/beers` endpoint.
///
/// Only `name` takes part in search; the remaining display fields are passed
/// through to the presentation layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    #[serde(rename = "id_beer")]
    pub id: BeerId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub abv: f64,
}

impl Beer {
    pub fn detail_route(&self) -> String {
        routes::beer_detail(self.id)
    }
}
