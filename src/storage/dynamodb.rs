//! AWS DynamoDB record store.
//!
//! Every listing becomes one unconditional `PutItem`. There is no condition
//! expression, so the item identity defined by the table's key schema is
//! simply overwritten by the latest write.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{StoreConfig, StoreRecord};
use crate::storage::RecordStore;

/// DynamoDB-backed record store.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    /// Create a new store around an existing client.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Build the SDK client from the default provider chain.
    ///
    /// Credentials come from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY` (or
    /// any other source the chain knows about); the region comes from config.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        if config.table.trim().is_empty() {
            return Err(AppError::config("store.table is empty"));
        }

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        let client = Client::new(&sdk_config);

        info!(
            "DynamoDB store ready: table {} in {}",
            config.table, config.region
        );
        Ok(Self::new(client, config.table.clone()))
    }
}

/// Map a record to DynamoDB attribute values.
pub fn to_item(record: &StoreRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "coinRank".to_string(),
            AttributeValue::N(record.coin_rank.to_string()),
        ),
        (
            "coinName".to_string(),
            AttributeValue::S(record.coin_name.clone()),
        ),
        (
            "coinSymbol".to_string(),
            AttributeValue::S(record.coin_symbol.clone()),
        ),
        (
            "coinPrice".to_string(),
            AttributeValue::N(record.coin_price.to_string()),
        ),
    ])
}

/// Keep the full source chain; dispatch and credential failures otherwise
/// print as a bare "unhandled error".
fn store_error(record: &StoreRecord, err: &(dyn std::error::Error + 'static)) -> AppError {
    AppError::store(record.label(), DisplayErrorContext(err))
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn upsert(&self, record: &StoreRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| store_error(record, &e))?;

        debug!("Put {} into {}", record.label(), self.table);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("dynamodb://{}", self.table)
    }
}
