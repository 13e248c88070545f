use std::env;

const LOG_GROUP_NAME: &str = "LOG_GROUP_NAME";
const LOG_STREAM_PREFIX: &str = "LOG_STREAM_PREFIX";
const LOG_MESSAGE: &str = "LOG_MESSAGE";
const LOGS_ENDPOINT: &str = "LOGS_ENDPOINT";
const TRACE_DEBUG: &str = "TRACE_DEBUG";

pub const DEFAULT_GROUP_NAME: &str = "sdk-for-go-v2-log-group";
pub const DEFAULT_STREAM_PREFIX: &str = "sdk-for-go-v2-log-stream-";
pub const DEFAULT_MESSAGE: &str = "This is a sample log event message.";

/// Settings for one shipping run, read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub group_name: String,
    pub stream_prefix: String,
    pub message: String,
    /// Overrides the CloudWatch Logs endpoint, e.g. for LocalStack.
    pub endpoint: Option<String>,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Config {
            group_name: get(LOG_GROUP_NAME).unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string()),
            stream_prefix: get(LOG_STREAM_PREFIX).unwrap_or_else(|| DEFAULT_STREAM_PREFIX.to_string()),
            message: get(LOG_MESSAGE).unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            endpoint: get(LOGS_ENDPOINT),
            debug: lookup(TRACE_DEBUG).is_some(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
