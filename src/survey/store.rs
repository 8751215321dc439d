// Storage bindings for collected survey responses.
//
// A store keeps the encoded array of responses as a whole: records are only
// ever appended or deleted all at once, never updated in place.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};

use log::debug;
use snafu::prelude::*;

use survey_wizard::SurveyResponse;

use crate::survey::{StoreDecodeSnafu, StoreEncodeSnafu, StoreReadSnafu, StoreWriteSnafu, SurveyResult};

type Listener = Box<dyn FnMut(&[SurveyResponse]) + Send>;
type ListenerMap = Mutex<HashMap<u64, Listener>>;

/// The storage collaborator the survey persists into.
pub trait ResponseStore {
    /// Every record, in insertion order.
    fn list(&self) -> SurveyResult<Vec<SurveyResponse>>;
    fn append(&self, response: &SurveyResponse) -> SurveyResult<()>;
    /// Deletes every record. Clearing an empty store succeeds trivially.
    fn delete_all(&self) -> SurveyResult<()>;
    /// Change notifications, for bindings that support them. Each
    /// notification carries the full record set (a snapshot replace, not an
    /// incremental update). The subscription is released when the returned
    /// handle is dropped.
    fn subscribe(&self, _on_change: Listener) -> Option<Subscription> {
        None
    }
}

/// Handle for an active store subscription. Dropping it stops the
/// notifications.
pub struct Subscription {
    listeners: Weak<ListenerMap>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().unwrap().remove(&self.id);
            debug!("store subscription {} released", self.id);
        }
    }
}

/// A store backed by a single JSON file holding the encoded array of
/// responses.
///
/// Appending is read-modify-write on the whole file and is not atomic
/// across concurrent processes: two simultaneous writers can lose a record.
/// Deleting removes the file. This binding does not push change
/// notifications.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    fn write_records(&self, records: &[SurveyResponse]) -> SurveyResult<()> {
        let encoded = serde_json::to_string_pretty(records).context(StoreEncodeSnafu {})?;
        fs::write(&self.path, encoded).context(StoreWriteSnafu {
            path: self.path_str(),
        })
    }
}

impl ResponseStore for JsonFileStore {
    fn list(&self) -> SurveyResult<Vec<SurveyResponse>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).context(StoreReadSnafu {
            path: self.path_str(),
        })?;
        serde_json::from_str(&contents).context(StoreDecodeSnafu {
            path: self.path_str(),
        })
    }

    fn append(&self, response: &SurveyResponse) -> SurveyResult<()> {
        let mut records = self.list()?;
        records.push(response.clone());
        debug!(
            "appending response to {:?} ({} records)",
            self.path,
            records.len()
        );
        self.write_records(&records)
    }

    fn delete_all(&self) -> SurveyResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context(StoreWriteSnafu {
                path: self.path_str(),
            })?;
        }
        Ok(())
    }
}

/// An in-process store. Used for dry runs and as the binding that supports
/// change notifications.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SurveyResponse>>,
    listeners: Arc<ListenerMap>,
    next_listener_id: Mutex<u64>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn notify(&self) {
        let snapshot = self.records.lock().unwrap().clone();
        for listener in self.listeners.lock().unwrap().values_mut() {
            listener(&snapshot);
        }
    }
}

impl ResponseStore for MemoryStore {
    fn list(&self) -> SurveyResult<Vec<SurveyResponse>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn append(&self, response: &SurveyResponse) -> SurveyResult<()> {
        self.records.lock().unwrap().push(response.clone());
        self.notify();
        Ok(())
    }

    fn delete_all(&self) -> SurveyResult<()> {
        self.records.lock().unwrap().clear();
        self.notify();
        Ok(())
    }

    fn subscribe(&self, on_change: Listener) -> Option<Subscription> {
        let id = {
            let mut next = self.next_listener_id.lock().unwrap();
            *next += 1;
            *next
        };
        self.listeners.lock().unwrap().insert(id, on_change);
        debug!("store subscription {} registered", id);
        Some(Subscription {
            listeners: Arc::downgrade(&self.listeners),
            id,
        })
    }
}
