pub mod dynamodb;
pub mod export;
pub mod opensearch;

pub use dynamodb::DynamoDbService;
pub use opensearch::OpenSearchService;
