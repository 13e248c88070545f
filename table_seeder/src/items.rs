//! Sample records and their stored attribute layout.
//!
//! Stored attribute names are PascalCase (`Name`, `CreatedAt`, `Message1`...)
//! while the printed JSON uses snake_case keys, so each record shape has a
//! private stored twin that carries the attribute naming.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::error::Result;

pub type Item = HashMap<String, AttributeValue>;

/// Partition key attribute.
pub const NAME: &str = "Name";
/// Sort key attribute, nanoseconds since the Unix epoch.
pub const CREATED_AT: &str = "CreatedAt";
pub const MESSAGE1: &str = "Message1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleItem {
    pub name: String,
    pub created_at: i64,
    pub message1: String,
    pub message2: String,
    pub message3: String,
}

/// The projection of [`SampleItem`] read by the projected scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleItemMin {
    pub name: String,
    pub created_at: i64,
    pub message1: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoredItem {
    name: String,
    created_at: i64,
    message1: String,
    message2: String,
    message3: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoredItemMin {
    name: String,
    created_at: i64,
    message1: String,
}

impl SampleItem {
    /// The `n`th sample record, e.g. `Sample Item 2` with messages `2-1`..`2-3`.
    pub fn numbered(prefix: &str, n: usize, created_at: i64) -> Self {
        SampleItem {
            name: format!("{} {}", prefix, n),
            created_at,
            message1: format!("This is a sample message {}-1", n),
            message2: format!("This is a sample message {}-2", n),
            message3: format!("This is a sample message {}-3", n),
        }
    }

    pub fn to_item(&self) -> Result<Item> {
        let stored = StoredItem {
            name: self.name.to_owned(),
            created_at: self.created_at,
            message1: self.message1.to_owned(),
            message2: self.message2.to_owned(),
            message3: self.message3.to_owned(),
        };
        Ok(to_item(stored)?)
    }

    pub fn from_item(item: Item) -> Result<Self> {
        let stored: StoredItem = from_item(item)?;
        Ok(SampleItem {
            name: stored.name,
            created_at: stored.created_at,
            message1: stored.message1,
            message2: stored.message2,
            message3: stored.message3,
        })
    }
}

impl SampleItemMin {
    pub fn from_item(item: Item) -> Result<Self> {
        let stored: StoredItemMin = from_item(item)?;
        Ok(SampleItemMin {
            name: stored.name,
            created_at: stored.created_at,
            message1: stored.message1,
        })
    }
}
