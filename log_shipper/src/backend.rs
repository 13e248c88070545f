use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs as cwl;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;

use crate::error::{request_error, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStream {
    pub name: String,
    pub upload_sequence_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
}

/// The CloudWatch Logs operations the shipper needs.
///
/// Create calls report a lost race as [`Error::AlreadyExists`] so callers can
/// tell it apart from other rejections.
#[async_trait]
pub trait LogsBackend: Send + Sync {
    /// Names of the groups whose name starts with `prefix`.
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>>;

    async fn create_log_group(&self, group: &str) -> Result<()>;

    /// Streams of `group` whose name starts with `prefix`.
    async fn describe_log_streams(&self, group: &str, prefix: &str) -> Result<Vec<LogStream>>;

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<()>;

    /// Appends `events` and returns the next sequence token, if the service sent one.
    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: &[LogEvent],
        sequence_token: Option<&str>,
    ) -> Result<Option<String>>;

    /// Events of a stream, oldest first.
    async fn list_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>>;
}

pub struct CloudWatchLogs {
    client: cwl::Client,
}

impl CloudWatchLogs {
    pub fn new(client: cwl::Client) -> Self {
        CloudWatchLogs { client }
    }

    /// Builds a client from the ambient AWS configuration.
    pub async fn from_env(endpoint: Option<&str>) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let logs_config = match endpoint {
            Some(endpoint) => cwl::config::Builder::from(&config).endpoint_url(endpoint).build(),
            None => cwl::config::Builder::from(&config).build(),
        };
        CloudWatchLogs::new(cwl::Client::from_conf(logs_config))
    }
}

#[async_trait]
impl LogsBackend for CloudWatchLogs {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>> {
        let mut pages = self.client.describe_log_groups()
            .log_group_name_prefix(prefix)
            .into_paginator()
            .send();
        let mut names = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(request_error)?;
            names.extend(
                page.log_groups()
                    .iter()
                    .filter_map(|group| group.log_group_name())
                    .map(String::from)
            );
        }
        Ok(names)
    }

    async fn create_log_group(&self, group: &str) -> Result<()> {
        match self.client.create_log_group().log_group_name(group).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_already_exists_exception() {
                    Err(Error::AlreadyExists(format!("log group {}", group)))
                } else {
                    Err(request_error(err))
                }
            }
        }
    }

    async fn describe_log_streams(&self, group: &str, prefix: &str) -> Result<Vec<LogStream>> {
        let mut pages = self.client.describe_log_streams()
            .log_group_name(group)
            .log_stream_name_prefix(prefix)
            .into_paginator()
            .send();
        let mut streams = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(request_error)?;
            for stream in page.log_streams() {
                if let Some(name) = stream.log_stream_name() {
                    #[allow(deprecated)]
                    let upload_sequence_token = stream.upload_sequence_token().map(String::from);
                    streams.push(LogStream { name: name.to_string(), upload_sequence_token });
                }
            }
        }
        Ok(streams)
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<()> {
        let result = self.client.create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_already_exists_exception() {
                    Err(Error::AlreadyExists(format!("log stream {}/{}", group, stream)))
                } else {
                    Err(request_error(err))
                }
            }
        }
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: &[LogEvent],
        sequence_token: Option<&str>,
    ) -> Result<Option<String>> {
        // the service may ignore sequence tokens, but still accepts them
        #[allow(deprecated)]
        let mut request = self.client.put_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .set_sequence_token(sequence_token.map(String::from));
        for event in events {
            request = request.log_events(
                InputLogEvent::builder()
                    .timestamp(event.timestamp)
                    .message(event.message.clone())
                    .build()
                    .map_err(request_error)?
            );
        }
        match request.send().await {
            Ok(output) => Ok(output.next_sequence_token().map(String::from)),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    Err(Error::NotFound(format!("log stream {}/{}", group, stream)))
                } else {
                    Err(request_error(err))
                }
            }
        }
    }

    async fn list_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>> {
        let output = self.client.get_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .start_from_head(true)
            .send()
            .await
            .map_err(request_error)?;
        Ok(output.events()
            .iter()
            .map(|event| LogEvent {
                timestamp: event.timestamp().unwrap_or_default(),
                message: event.message().unwrap_or_default().to_string(),
            })
            .collect())
    }
}
