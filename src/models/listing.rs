//! Listing schema shared by the API decoder and the snapshot file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// All listings returned by one fetch, in response order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingCollection {
    /// Snapshot format version (absent in API responses)
    #[serde(default = "schema_version")]
    pub schema_version: u32,

    /// When the fetcher received this collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,

    /// Listing entries
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ListingEntry>,
}

impl Default for ListingCollection {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            fetched_at: None,
            data: Vec::new(),
        }
    }
}

impl ListingCollection {
    pub fn new(data: Vec<ListingEntry>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingEntry> {
        self.data.iter()
    }
}

impl<'a> IntoIterator for &'a ListingCollection {
    type Item = &'a ListingEntry;
    type IntoIter = std::slice::Iter<'a, ListingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// One traded asset at fetch time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,

    /// Market rank, 1 for the largest asset
    #[serde(rename = "cmc_rank", default, deserialize_with = "null_as_default")]
    pub rank: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: Quote,
}

/// Per-currency quotes. Only USD is requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    #[serde(rename = "USD", default, deserialize_with = "null_as_default")]
    pub usd: UsdQuote,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsdQuote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap: f64,

    /// Share of total market cap, nominally 0..=100
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap_dominance: f64,
}

impl ListingEntry {
    pub fn new(rank: u32, name: &str, symbol: &str, price_usd: f64) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            rank,
            quote: Quote {
                usd: UsdQuote {
                    price: price_usd,
                    ..UsdQuote::default()
                },
            },
        }
    }

    pub fn price_usd(&self) -> f64 {
        self.quote.usd.price
    }

    pub fn market_cap_usd(&self) -> f64 {
        self.quote.usd.market_cap
    }

    pub fn market_cap_dominance_pct(&self) -> f64 {
        self.quote.usd.market_cap_dominance
    }

    /// Format the entry as a console line.
    ///
    /// `{rank}. {name} ({symbol}) - {price} USD`, price to 4 decimals.
    /// Exact ties round half-to-even.
    pub fn display_line(&self) -> String {
        format!(
            "{}. {} ({}) - {:.4} USD",
            self.rank,
            self.name,
            self.symbol,
            self.price_usd()
        )
    }
}
