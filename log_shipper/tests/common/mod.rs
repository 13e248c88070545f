use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use async_trait::async_trait;
use log_shipper::{Error, LogEvent, LogStream, LogsBackend, Result};

#[derive(Default)]
struct StreamState {
    token: Option<String>,
    events: Vec<LogEvent>,
}

#[derive(Default)]
struct State {
    groups: BTreeMap<String, BTreeMap<String, StreamState>>,
    group_creates: usize,
    stream_creates: usize,
    appends: usize,
    hide_existing: bool,
    concurrent_writer: bool,
}

/// In-memory CloudWatch Logs that rotates the sequence token on every append
/// and rejects appends carrying a stale one.
#[derive(Default)]
pub struct MemoryLogs {
    state: Mutex<State>,
}

impl MemoryLogs {
    pub fn group_creates(&self) -> usize {
        self.state.lock().unwrap().group_creates
    }

    pub fn stream_creates(&self) -> usize {
        self.state.lock().unwrap().stream_creates
    }

    /// Number of put calls, rejected ones included.
    pub fn puts(&self) -> usize {
        self.state.lock().unwrap().appends
    }

    /// Makes describe calls list nothing, as when another run creates the
    /// group or stream between our lookup and our create.
    pub fn hide_existing(&self) {
        self.state.lock().unwrap().hide_existing = true;
    }

    /// Advances the sequence token of the target stream right before each put,
    /// as another writer appending between our lookup and our put would.
    pub fn concurrent_writer(&self) {
        self.state.lock().unwrap().concurrent_writer = true;
    }

    /// Creates a group behind the provisioner's back, as a concurrent run would.
    pub fn insert_group(&self, group: &str) {
        self.state.lock().unwrap().groups.entry(group.to_string()).or_default();
    }
}

#[async_trait]
impl LogsBackend for MemoryLogs {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.hide_existing {
            return Ok(Vec::new())
        }
        Ok(state.groups.keys().filter(|name| name.starts_with(prefix)).cloned().collect())
    }

    async fn create_log_group(&self, group: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.group_creates += 1;
        if state.groups.contains_key(group) {
            return Err(Error::AlreadyExists(format!("log group {}", group)))
        }
        state.groups.insert(group.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn describe_log_streams(&self, group: &str, prefix: &str) -> Result<Vec<LogStream>> {
        let state = self.state.lock().unwrap();
        let streams = state.groups.get(group).ok_or_else(|| Error::NotFound(format!("log group {}", group)))?;
        if state.hide_existing {
            return Ok(Vec::new())
        }
        Ok(streams.iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, s)| LogStream { name: name.clone(), upload_sequence_token: s.token.clone() })
            .collect())
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.stream_creates += 1;
        let streams = state.groups.get_mut(group).ok_or_else(|| Error::NotFound(format!("log group {}", group)))?;
        if streams.contains_key(stream) {
            return Err(Error::AlreadyExists(format!("log stream {}/{}", group, stream)))
        }
        streams.insert(stream.to_string(), StreamState::default());
        Ok(())
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: &[LogEvent],
        sequence_token: Option<&str>,
    ) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.appends += 1;
        let next = format!("token-{}", state.appends);
        let concurrent_writer = state.concurrent_writer;
        let target = state.groups.get_mut(group)
            .and_then(|streams| streams.get_mut(stream))
            .ok_or_else(|| Error::NotFound(format!("log stream {}/{}", group, stream)))?;
        if concurrent_writer {
            target.token = Some(format!("{}-other", next));
        }
        if target.token.as_deref() != sequence_token {
            return Err(Error::Request("InvalidSequenceTokenException".into()))
        }
        target.events.extend_from_slice(events);
        target.token = Some(next.clone());
        Ok(Some(next))
    }

    async fn list_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>> {
        let state = self.state.lock().unwrap();
        state.groups.get(group)
            .and_then(|streams| streams.get(stream))
            .map(|s| s.events.clone())
            .ok_or_else(|| Error::NotFound(format!("log stream {}/{}", group, stream)))
    }
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}
