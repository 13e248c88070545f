use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info};

pub mod backend;
pub mod config;
pub mod error;
pub mod items;

pub use backend::{DynamoDb, Projection, TableBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use items::{Item, SampleItem, SampleItemMin, CREATED_AT, MESSAGE1, NAME};

/// Creates the sample table unless it exists, then waits for it to be active.
///
/// Only a not-found answer to the lookup counts as absent; any other lookup
/// failure is returned.
pub async fn ensure_table<B>(backend: &B, table: &str, wait: Duration) -> Result<()>
where
    B: TableBackend + ?Sized,
{
    match backend.describe_table(table).await {
        Ok(()) => {
            debug!("table {} exists", table);
            return Ok(())
        }
        Err(Error::NotFound(_)) => {}
        Err(e) => return Err(e)
    }
    match backend.create_table(table).await {
        Ok(()) => info!("created table {}", table),
        Err(Error::AlreadyExists(what)) => info!("{} was created concurrently", what),
        Err(e) => return Err(e)
    }
    backend.wait_until_active(table, wait).await
}

pub async fn put_record<B>(backend: &B, table: &str, record: &SampleItem) -> Result<()>
where
    B: TableBackend + ?Sized,
{
    backend.put_item(table, record.to_item()?).await?;
    debug!("put {} ({})", record.name, record.created_at);
    Ok(())
}

/// Every record with all attributes.
pub async fn scan_all<B>(backend: &B, table: &str) -> Result<Vec<SampleItem>>
where
    B: TableBackend + ?Sized,
{
    backend.scan(table, None)
        .await?
        .into_iter()
        .map(SampleItem::from_item)
        .collect()
}

/// Every record restricted to name, creation time and first message.
pub async fn scan_projected<B>(backend: &B, table: &str) -> Result<Vec<SampleItemMin>>
where
    B: TableBackend + ?Sized,
{
    let projection = Projection::new([NAME, CREATED_AT, MESSAGE1]);
    backend.scan(table, Some(&projection))
        .await?
        .into_iter()
        .map(SampleItemMin::from_item)
        .collect()
}

/// Indented JSON with a single space per level.
pub fn to_pretty_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn now_nanos() -> Result<i64> {
    Ok(SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?.as_nanos() as i64)
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub table: String,
    pub inserted: Vec<String>,
    pub items: Vec<SampleItem>,
    pub projected: Vec<SampleItemMin>,
}

impl Report {
    pub fn render(&self) -> Result<String> {
        let mut out: String = self.inserted.iter().map(|name| format!("{}\n", name)).collect();
        out.push_str(&format!(
            "TableName: {}\nScan with all attributes:\n{}\n\nScan with some attributes:\n{}\n",
            self.table,
            to_pretty_json(&self.items)?,
            to_pretty_json(&self.projected)?
        ));
        Ok(out)
    }
}

/// Provisions the table, inserts the numbered sample records and reads them
/// back twice.
pub async fn seed<B>(backend: &B, config: &Config) -> Result<Report>
where
    B: TableBackend + ?Sized,
{
    ensure_table(backend, &config.table_name, config.table_wait).await?;

    let mut inserted = Vec::new();
    let mut last_created = i64::MIN;
    for n in 1..=config.item_count {
        // sort keys stay distinct even if the clock does not advance
        let created_at = now_nanos()?.max(last_created + 1);
        last_created = created_at;
        let record = SampleItem::numbered(&config.item_name_prefix, n, created_at);
        put_record(backend, &config.table_name, &record).await?;
        info!("inserted {}", record.name);
        inserted.push(record.name);
    }

    let items = scan_all(backend, &config.table_name).await?;
    let projected = scan_projected(backend, &config.table_name).await?;
    info!("scanned {} items from {}", items.len(), config.table_name);

    Ok(Report {
        table: config.table_name.to_owned(),
        inserted,
        items,
        projected,
    })
}
