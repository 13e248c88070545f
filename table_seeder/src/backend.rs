use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb as ddb;
use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};

use crate::error::{request_error, Error, Result};
use crate::items::{Item, CREATED_AT, NAME};

/// Attribute list for a scan projection, referenced through `#pN` aliases so
/// reserved words such as `Name` can be projected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    attributes: Vec<String>,
}

impl Projection {
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection { attributes: attributes.into_iter().map(Into::into).collect() }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn expression(&self) -> String {
        (0..self.attributes.len())
            .map(|i| format!("#p{}", i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn attribute_names(&self) -> HashMap<String, String> {
        self.attributes.iter()
            .enumerate()
            .map(|(i, name)| (format!("#p{}", i), name.to_owned()))
            .collect()
    }
}

/// The DynamoDB operations the seeder needs.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Succeeds when the table exists; [`Error::NotFound`] when it does not.
    async fn describe_table(&self, table: &str) -> Result<()>;

    /// Creates `table` keyed by `Name` (string, hash) and `CreatedAt`
    /// (number, range), billed on demand. [`Error::AlreadyExists`] when the
    /// table is already there.
    async fn create_table(&self, table: &str) -> Result<()>;

    async fn wait_until_active(&self, table: &str, timeout: Duration) -> Result<()>;

    /// Unconditional put.
    async fn put_item(&self, table: &str, item: Item) -> Result<()>;

    /// Every item of the table, following continuation keys to the last page.
    async fn scan(&self, table: &str, projection: Option<&Projection>) -> Result<Vec<Item>>;
}

pub struct DynamoDb {
    client: ddb::Client,
}

impl DynamoDb {
    pub fn new(client: ddb::Client) -> Self {
        DynamoDb { client }
    }

    /// Builds a client from the ambient AWS configuration.
    pub async fn from_env(endpoint: Option<&str>) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let ddb_config = match endpoint {
            Some(endpoint) => ddb::config::Builder::from(&config).endpoint_url(endpoint).build(),
            None => ddb::config::Builder::from(&config).build()
        };
        DynamoDb::new(ddb::Client::from_conf(ddb_config))
    }
}

fn key_schema(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(request_error)
}

fn attribute_definition(name: &str, attribute_type: ScalarAttributeType) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(attribute_type)
        .build()
        .map_err(request_error)
}

#[async_trait]
impl TableBackend for DynamoDb {
    async fn describe_table(&self, table: &str) -> Result<()> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    Err(Error::NotFound(format!("table {}", table)))
                } else {
                    Err(request_error(err))
                }
            }
        }
    }

    async fn create_table(&self, table: &str) -> Result<()> {
        let result = self.client.create_table()
            .table_name(table)
            .key_schema(key_schema(NAME, KeyType::Hash)?)
            .key_schema(key_schema(CREATED_AT, KeyType::Range)?)
            .attribute_definitions(attribute_definition(NAME, ScalarAttributeType::S)?)
            .attribute_definitions(attribute_definition(CREATED_AT, ScalarAttributeType::N)?)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_in_use_exception() {
                    Err(Error::AlreadyExists(format!("table {}", table)))
                } else {
                    Err(request_error(err))
                }
            }
        }
    }

    async fn wait_until_active(&self, table: &str, timeout: Duration) -> Result<()> {
        self.client.wait_until_table_exists()
            .table_name(table)
            .wait(timeout)
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        self.client.put_item()
            .set_table_name(Some(table.to_owned()))
            .set_item(Some(item))
            .send()
            .await
            .map_err(request_error)?;
        Ok(())
    }

    async fn scan(&self, table: &str, projection: Option<&Projection>) -> Result<Vec<Item>> {
        let mut pages = self.client.scan()
            .table_name(table)
            .set_projection_expression(projection.map(Projection::expression))
            .set_expression_attribute_names(projection.map(Projection::attribute_names))
            .into_paginator()
            .send();
        let mut items = Vec::new();
        while let Some(page) = pages.next().await {
            items.extend_from_slice(page.map_err(request_error)?.items());
        }
        Ok(items)
    }
}
