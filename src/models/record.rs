//! Table record derived from a listing entry.

use serde::{Deserialize, Serialize};

use super::ListingEntry;

/// The persisted projection of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub coin_rank: u32,
    pub coin_name: String,
    pub coin_symbol: String,
    pub coin_price: f64,
}

impl From<&ListingEntry> for StoreRecord {
    fn from(entry: &ListingEntry) -> Self {
        Self {
            coin_rank: entry.rank,
            coin_name: entry.name.clone(),
            coin_symbol: entry.symbol.clone(),
            coin_price: entry.price_usd(),
        }
    }
}

impl StoreRecord {
    /// Short identifier for log lines.
    pub fn label(&self) -> String {
        format!("#{} {}", self.coin_rank, self.coin_symbol)
    }
}
