use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::{
    client::Waiters,
    error::{BuildError, DisplayErrorContext, SdkError},
    types::{
        AttributeDefinition, AttributeValue, BillingMode, DeleteRequest, KeySchemaElement, KeyType,
        PutRequest, ScalarAttributeType, WriteRequest,
    },
    Client,
};
use governor::{clock::DefaultClock, state::direct::NotKeyed, state::InMemoryState, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Url;
use serde_dynamo::{from_item, to_item};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Dataset, EntityKind};

type Item = HashMap<String, AttributeValue>;

const TARGET_NAME: &str = "dynamodb";
const CREDENTIALS_PROVIDER: &str = "tattoo-devtools";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_ATTEMPTS: u32 = 3;

/// How long a freshly created table may take to become ACTIVE
const TABLE_ACTIVE_TIMEOUT: Duration = Duration::from_secs(60);

/// BatchWriteItem accepts at most 25 requests
const BATCH_SIZE: usize = 25;
const MAX_UNPROCESSED_RETRIES: usize = 3;

const SORT_KEY_PROFILE: &str = "PROFILE";

/// Client for the single-table DynamoDB layout. Works against LocalStack
/// and real endpoints alike; the endpoint and static credentials come from
/// [`Config`].
#[derive(Clone)]
pub struct DynamoDbService {
    client: Client,
    table: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

fn sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> AppError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    AppError::unavailable(
        TARGET_NAME,
        format!("{} failed: {}", operation, DisplayErrorContext(&err)),
    )
}

fn build_error(err: BuildError) -> AppError {
    AppError::Other(err.into())
}

fn key_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(build_error)
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(build_error)
}

impl DynamoDbService {
    pub async fn new(config: &Config) -> Result<Self> {
        Url::parse(&config.dynamodb_endpoint).map_err(|e| {
            AppError::Configuration(format!(
                "Invalid DYNAMODB_ENDPOINT {}: {}",
                config.dynamodb_endpoint, e
            ))
        })?;

        let credentials = Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .endpoint_url(config.dynamodb_endpoint.clone())
            .credentials_provider(credentials)
            .timeout_config(
                TimeoutConfig::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .operation_timeout(config.request_timeout())
                    .build(),
            )
            .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
            .load()
            .await;

        // Batches per second, to avoid overwhelming LocalStack during large seeds
        let rate = NonZeroU32::new(config.write_rate_per_second).unwrap_or(nonzero!(10u32));
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            client: Client::new(&sdk_config),
            table: config.dynamodb_table.clone(),
            rate_limiter,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the table if it does not exist yet and wait until it is ACTIVE.
    pub async fn ensure_table(&self) -> Result<()> {
        match self.client.describe_table().table_name(&self.table).send().await {
            Ok(_) => return Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) => {}
            Err(e) => return Err(sdk_error("DescribeTable", e)),
        }

        tracing::info!(table = %self.table, "Creating DynamoDB table");
        let created = self
            .client
            .create_table()
            .table_name(&self.table)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(key_attribute("PK")?)
            .attribute_definitions(key_attribute("SK")?)
            .key_schema(key_element("PK", KeyType::Hash)?)
            .key_schema(key_element("SK", KeyType::Range)?)
            .send()
            .await;

        match created {
            Ok(_) => {}
            // Another writer got there first; it still has to become ACTIVE
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_in_use_exception()) => {}
            Err(e) => return Err(sdk_error("CreateTable", e)),
        }

        self.client
            .wait_until_table_exists()
            .table_name(&self.table)
            .wait(TABLE_ACTIVE_TIMEOUT)
            .await
            .map_err(|e| {
                AppError::unavailable(
                    TARGET_NAME,
                    format!(
                        "Table {} did not become active: {}",
                        self.table,
                        DisplayErrorContext(&e)
                    ),
                )
            })?;

        tracing::debug!(table = %self.table, "DynamoDB table is active");
        Ok(())
    }

    /// Scan every item of one entity type, following pagination.
    ///
    /// A missing table yields no items.
    async fn scan_entity(&self, kind: EntityKind, keys_only: bool) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table)
                .filter_expression("entityType = :entityType")
                .expression_attribute_values(
                    ":entityType",
                    AttributeValue::S(kind.as_str().to_string()),
                )
                .set_exclusive_start_key(start_key.take());
            if keys_only {
                request = request.projection_expression("PK, SK");
            }

            let page = match request.send().await {
                Ok(page) => page,
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_not_found_exception()) =>
                {
                    tracing::warn!(table = %self.table, "DynamoDB table does not exist yet");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(sdk_error("Scan", e)),
            };

            items.extend(page.items().iter().cloned());

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }

    /// Load all records of one type as plain JSON, without storage keys.
    pub async fn load_records(&self, kind: EntityKind) -> Result<Vec<Value>> {
        let items = self.scan_entity(kind, false).await?;
        items
            .into_iter()
            .map(|item| {
                let mut record: Value = from_item(item).map_err(|e| {
                    AppError::unavailable(TARGET_NAME, format!("Malformed item: {}", e))
                })?;
                if let Some(map) = record.as_object_mut() {
                    map.remove("PK");
                    map.remove("SK");
                    map.remove("entityType");
                }
                Ok(record)
            })
            .collect()
    }

    pub async fn count_records(&self, kind: EntityKind) -> Result<usize> {
        Ok(self.scan_entity(kind, true).await?.len())
    }

    /// Delete every stored record of one type. Returns how many were removed.
    pub async fn purge(&self, kind: EntityKind) -> Result<usize> {
        let keys = self.scan_entity(kind, true).await?;
        let requests = keys
            .into_iter()
            .map(|key| {
                let delete = DeleteRequest::builder()
                    .set_key(Some(key))
                    .build()
                    .map_err(build_error)?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<Result<Vec<_>>>()?;
        let removed = requests.len();

        self.batch_write(requests).await?;

        if removed > 0 {
            tracing::info!(entity = kind.as_str(), removed, "Purged existing records");
        }
        Ok(removed)
    }

    /// Write records of one type, keyed `<PREFIX><id>` / `PROFILE`.
    pub async fn put_records(&self, kind: EntityKind, records: &[(String, Value)]) -> Result<usize> {
        let requests = records
            .iter()
            .map(|(id, record)| {
                let mut document = record.clone();
                if let Some(map) = document.as_object_mut() {
                    map.insert("PK".to_string(), json!(format!("{}{}", kind.key_prefix(), id)));
                    map.insert("SK".to_string(), json!(SORT_KEY_PROFILE));
                    map.insert("entityType".to_string(), json!(kind.as_str()));
                }
                let item: Item = to_item(document).map_err(|e| {
                    AppError::InvalidParameters(format!("{} {} cannot be stored: {}", kind.as_str(), id, e))
                })?;
                let put = PutRequest::builder()
                    .set_item(Some(item))
                    .build()
                    .map_err(build_error)?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        let written = requests.len();
        self.batch_write(requests).await?;
        Ok(written)
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> Result<()> {
        for chunk in requests.chunks(BATCH_SIZE) {
            let mut pending = chunk.to_vec();

            for attempt in 0..=MAX_UNPROCESSED_RETRIES {
                self.rate_limiter.until_ready().await;

                let output = self
                    .client
                    .batch_write_item()
                    .request_items(&self.table, pending.clone())
                    .send()
                    .await
                    .map_err(|e| sdk_error("BatchWriteItem", e))?;

                let unprocessed = output
                    .unprocessed_items()
                    .and_then(|items| items.get(&self.table))
                    .cloned()
                    .unwrap_or_default();

                if unprocessed.is_empty() {
                    break;
                }

                if attempt == MAX_UNPROCESSED_RETRIES {
                    return Err(AppError::unavailable(
                        TARGET_NAME,
                        format!(
                            "{} items still unprocessed after {} retries",
                            unprocessed.len(),
                            MAX_UNPROCESSED_RETRIES
                        ),
                    ));
                }

                tracing::debug!(
                    unprocessed = unprocessed.len(),
                    attempt,
                    "Retrying unprocessed DynamoDB writes"
                );
                pending = unprocessed;
            }
        }

        Ok(())
    }

    /// Overwrite all seeded records with `dataset`.
    pub async fn replace_dataset(&self, dataset: &Dataset) -> Result<usize> {
        self.ensure_table().await?;

        let mut written = 0;
        for kind in [EntityKind::Studio, EntityKind::Artist] {
            self.purge(kind).await?;
            written += self.put_records(kind, &dataset.records(kind)?).await?;
        }

        Ok(written)
    }

    /// Remove all seeded records, leaving the table in place.
    pub async fn reset(&self) -> Result<usize> {
        let mut removed = 0;
        for kind in [EntityKind::Artist, EntityKind::Studio] {
            removed += self.purge(kind).await?;
        }
        Ok(removed)
    }
}
