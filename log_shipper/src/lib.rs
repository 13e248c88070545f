use std::fmt::{Display, Formatter};

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info};

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{CloudWatchLogs, LogEvent, LogStream, LogsBackend};
pub use config::Config;
pub use error::{Error, Result};

/// Local time suffix appended to the stream prefix, minute resolution.
const STREAM_SUFFIX_FORMAT: &str = "%Y%m%d%H%M";

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    pub group: String,
    pub stream: String,
    pub message: String,
}

impl Display for Shipment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogGroup\t: {}\nLogStream\t: {}\nEventMessage\t: \"{}\"", self.group, self.stream, self.message)
    }
}

pub fn stream_name(prefix: &str, now: &NaiveDateTime) -> String {
    format!("{}{}", prefix, now.format(STREAM_SUFFIX_FORMAT))
}

/// Creates the log group unless a group with exactly this name exists.
pub async fn ensure_log_group<B>(backend: &B, group: &str) -> Result<()>
where
    B: LogsBackend + ?Sized,
{
    let groups = backend.describe_log_groups(group).await?;
    if groups.iter().any(|name| name == group) {
        debug!("log group {} exists", group);
        return Ok(())
    }
    match backend.create_log_group(group).await {
        Ok(()) => {
            info!("created log group {}", group);
            Ok(())
        }
        Err(Error::AlreadyExists(what)) => {
            info!("{} was created concurrently", what);
            Ok(())
        }
        Err(e) => Err(e)
    }
}

/// Creates the stream inside `group` unless it already exists.
pub async fn ensure_log_stream<B>(backend: &B, group: &str, stream: &str) -> Result<()>
where
    B: LogsBackend + ?Sized,
{
    let streams = backend.describe_log_streams(group, stream).await?;
    if streams.iter().any(|s| s.name == stream) {
        debug!("log stream {}/{} exists", group, stream);
        return Ok(())
    }
    match backend.create_log_stream(group, stream).await {
        Ok(()) => {
            info!("created log stream {}/{}", group, stream);
            Ok(())
        }
        Err(Error::AlreadyExists(what)) => {
            info!("{} was created concurrently", what);
            Ok(())
        }
        Err(e) => Err(e)
    }
}

/// The upload sequence token of the stream.
///
/// `None` both for a stream that was never written and for one that does not
/// exist; callers cannot tell these apart.
pub async fn next_sequence_token<B>(backend: &B, group: &str, stream: &str) -> Result<Option<String>>
where
    B: LogsBackend + ?Sized,
{
    let streams = backend.describe_log_streams(group, stream).await?;
    Ok(streams.into_iter()
        .find(|s| s.name == stream)
        .and_then(|s| s.upload_sequence_token))
}

/// Appends one event stamped with the current time.
///
/// A rejected append, stale sequence token included, is returned as is.
pub async fn append_event<B>(backend: &B, group: &str, stream: &str, message: &str) -> Result<Option<String>>
where
    B: LogsBackend + ?Sized,
{
    let event = LogEvent { timestamp: Utc::now().timestamp_millis(), message: message.to_string() };
    let token = next_sequence_token(backend, group, stream).await?;
    debug!("appending to {}/{} with sequence token {:?}", group, stream, token);
    backend.put_log_events(group, stream, &[event], token.as_deref()).await
}

/// Provisions the group and a stream named after `now`, then appends the
/// configured message.
pub async fn ship<B>(backend: &B, config: &Config, now: NaiveDateTime) -> Result<Shipment>
where
    B: LogsBackend + ?Sized,
{
    ensure_log_group(backend, &config.group_name).await?;

    let stream = stream_name(&config.stream_prefix, &now);
    ensure_log_stream(backend, &config.group_name, &stream).await?;

    append_event(backend, &config.group_name, &stream, &config.message).await?;
    info!("appended event to {}/{}", config.group_name, stream);

    Ok(Shipment {
        group: config.group_name.to_owned(),
        stream,
        message: config.message.to_owned(),
    })
}
