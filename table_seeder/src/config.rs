use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

const TABLE_NAME: &str = "TABLE_NAME";
const ITEM_NAME_PREFIX: &str = "ITEM_NAME_PREFIX";
const ITEM_COUNT: &str = "ITEM_COUNT";
const TABLE_WAIT_SECS: &str = "TABLE_WAIT_SECS";
const DYNAMODB_ENDPOINT: &str = "DYNAMODB_ENDPOINT";
const TRACE_DEBUG: &str = "TRACE_DEBUG";

pub const DEFAULT_TABLE_NAME: &str = "sdk-for-go-sample-table";
pub const DEFAULT_ITEM_NAME_PREFIX: &str = "Sample Item";
pub const DEFAULT_ITEM_COUNT: usize = 5;
pub const MAX_ITEM_COUNT: usize = 1000;
pub const DEFAULT_TABLE_WAIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub item_name_prefix: String,
    pub item_count: usize,
    /// Upper bound on waiting for a freshly created table to become active.
    pub table_wait: Duration,
    /// Overrides the DynamoDB endpoint, e.g. for DynamoDB Local.
    pub endpoint: Option<String>,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let item_count = match get(ITEM_COUNT) {
            Some(value) => parse(ITEM_COUNT, value)?,
            None => DEFAULT_ITEM_COUNT,
        };
        if item_count > MAX_ITEM_COUNT {
            return Err(Error::Config {
                name: ITEM_COUNT,
                value: item_count.to_string(),
                reason: format!("at most {} items", MAX_ITEM_COUNT),
            })
        }
        let table_wait = match get(TABLE_WAIT_SECS) {
            Some(value) => Duration::from_secs(parse(TABLE_WAIT_SECS, value)?),
            None => DEFAULT_TABLE_WAIT,
        };
        Ok(Config {
            table_name: get(TABLE_NAME).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            item_name_prefix: get(ITEM_NAME_PREFIX).unwrap_or_else(|| DEFAULT_ITEM_NAME_PREFIX.to_string()),
            item_count,
            table_wait,
            endpoint: get(DYNAMODB_ENDPOINT),
            debug: lookup(TRACE_DEBUG).is_some(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            item_name_prefix: DEFAULT_ITEM_NAME_PREFIX.to_string(),
            item_count: DEFAULT_ITEM_COUNT,
            table_wait: DEFAULT_TABLE_WAIT,
            endpoint: None,
            debug: false,
        }
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    match T::from_str(value.trim()) {
        Ok(v) => Ok(v),
        Err(e) => Err(Error::Config { name, value, reason: e.to_string() }),
    }
}
