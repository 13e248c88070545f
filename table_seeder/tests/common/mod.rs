use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use table_seeder::{Error, Item, Projection, Result, TableBackend, CREATED_AT, NAME};

#[derive(Default)]
struct Table {
    items: BTreeMap<(String, i64), Item>,
}

#[derive(Default)]
struct State {
    tables: BTreeMap<String, Table>,
    creates: usize,
    waits: usize,
    describe_failure: Option<String>,
    stale_describe: bool,
}

/// In-memory DynamoDB keyed by the table's partition and sort key.
#[derive(Default)]
pub struct MemoryTables {
    state: Mutex<State>,
}

impl MemoryTables {
    pub fn creates(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn waits(&self) -> usize {
        self.state.lock().unwrap().waits
    }

    /// Makes every describe call fail with a non-not-found error.
    pub fn fail_describe(&self, reason: &str) {
        self.state.lock().unwrap().describe_failure = Some(reason.to_string());
    }

    /// Makes describe report tables as absent even when they exist, as when
    /// another run creates the table between our lookup and our create.
    pub fn stale_describe(&self) {
        self.state.lock().unwrap().stale_describe = true;
    }
}

fn key_of(item: &Item) -> Result<(String, i64)> {
    let partition = match item.get(NAME) {
        Some(AttributeValue::S(s)) => s.clone(),
        _ => return Err(Error::Request("ValidationException: missing partition key".into())),
    };
    let sort = match item.get(CREATED_AT) {
        Some(AttributeValue::N(n)) => n.parse::<i64>()
            .map_err(|_| Error::Request("ValidationException: bad sort key".into()))?,
        _ => return Err(Error::Request("ValidationException: missing sort key".into())),
    };
    Ok((partition, sort))
}

fn project(item: &Item, projection: &Projection) -> Item {
    let names = projection.attribute_names();
    let wanted: Vec<&String> = projection.expression()
        .split(", ")
        .filter_map(|alias| names.get(alias))
        .collect();
    item.iter()
        .filter(|(name, _)| wanted.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect::<HashMap<_, _>>()
}

#[async_trait]
impl TableBackend for MemoryTables {
    async fn describe_table(&self, table: &str) -> Result<()> {
        let state = self.state.lock().unwrap();
        if let Some(reason) = &state.describe_failure {
            return Err(Error::Request(reason.clone().into()))
        }
        if state.stale_describe || !state.tables.contains_key(table) {
            return Err(Error::NotFound(format!("table {}", table)))
        }
        Ok(())
    }

    async fn create_table(&self, table: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        if state.tables.contains_key(table) {
            return Err(Error::AlreadyExists(format!("table {}", table)))
        }
        state.tables.insert(table.to_string(), Table::default());
        Ok(())
    }

    async fn wait_until_active(&self, table: &str, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.waits += 1;
        if !state.tables.contains_key(table) {
            return Err(Error::NotFound(format!("table {}", table)))
        }
        Ok(())
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let target = state.tables.get_mut(table).ok_or_else(|| Error::NotFound(format!("table {}", table)))?;
        let key = key_of(&item)?;
        target.items.insert(key, item);
        Ok(())
    }

    async fn scan(&self, table: &str, projection: Option<&Projection>) -> Result<Vec<Item>> {
        let state = self.state.lock().unwrap();
        let target = state.tables.get(table).ok_or_else(|| Error::NotFound(format!("table {}", table)))?;
        Ok(target.items.values()
            .map(|item| match projection {
                Some(projection) => project(item, projection),
                None => item.clone(),
            })
            .collect())
    }
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}
