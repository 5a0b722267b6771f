//! Follow-up record persistence — a keyed store interface with a
//! JSON-file-backed implementation and an in-memory one.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use outreach_core::OutreachResult;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// One tracked outreach thread, keyed by the contact's email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupRecord {
    pub recruiter_email: String,
    pub recruiter_name: String,
    pub recruiter_company: String,
    /// Mailbox thread the conversation lives in.
    pub thread_id: String,
    pub subject: String,
    pub initial_contact: DateTime<Utc>,
    pub last_contact: DateTime<Utc>,
    pub followup_count: u32,
    pub next_followup: DateTime<Utc>,
    pub max_followups: u32,
    pub followup_wait_days: i64,
    pub timezone: String,
}

// ---------------------------------------------------------------------------
// Store interface
// ---------------------------------------------------------------------------

/// Keyed persistence for follow-up records.
pub trait FollowupStore: Send + Sync {
    fn get(&self, email: &str) -> OutreachResult<Option<FollowupRecord>>;

    /// Insert or replace the record for its email address.
    fn put(&self, record: FollowupRecord) -> OutreachResult<()>;

    /// Returns true when a record was actually removed.
    fn remove(&self, email: &str) -> OutreachResult<bool>;

    fn list_where(
        &self,
        predicate: &dyn Fn(&FollowupRecord) -> bool,
    ) -> OutreachResult<Vec<FollowupRecord>>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// The on-disk document: a single JSON object holding every record.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    emails: Vec<FollowupRecord>,
}

/// Store backed by one pretty-printed JSON file, loaded and rewritten on
/// each operation. Fine at the scale of a personal outreach pipeline; a
/// real database is out of scope here.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> OutreachResult<StoreDocument> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file absent, starting empty");
            return Ok(StoreDocument::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let doc: StoreDocument = serde_json::from_str(&data)?;
        debug!(
            path = %self.path.display(),
            records = doc.emails.len(),
            "loaded follow-up store"
        );
        Ok(doc)
    }

    fn save(&self, doc: &StoreDocument) -> OutreachResult<()> {
        let data = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, data)?;
        debug!(
            path = %self.path.display(),
            records = doc.emails.len(),
            "saved follow-up store"
        );
        Ok(())
    }
}

impl FollowupStore for JsonFileStore {
    fn get(&self, email: &str) -> OutreachResult<Option<FollowupRecord>> {
        let doc = self.load()?;
        Ok(doc.emails.into_iter().find(|r| r.recruiter_email == email))
    }

    fn put(&self, record: FollowupRecord) -> OutreachResult<()> {
        let mut doc = self.load()?;
        match doc
            .emails
            .iter_mut()
            .find(|r| r.recruiter_email == record.recruiter_email)
        {
            Some(existing) => *existing = record,
            None => doc.emails.push(record),
        }
        self.save(&doc)
    }

    fn remove(&self, email: &str) -> OutreachResult<bool> {
        let mut doc = self.load()?;
        let before = doc.emails.len();
        doc.emails.retain(|r| r.recruiter_email != email);
        let removed = doc.emails.len() < before;
        if removed {
            self.save(&doc)?;
        }
        Ok(removed)
    }

    fn list_where(
        &self,
        predicate: &dyn Fn(&FollowupRecord) -> bool,
    ) -> OutreachResult<Vec<FollowupRecord>> {
        let doc = self.load()?;
        Ok(doc.emails.into_iter().filter(|r| predicate(r)).collect())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Thread-safe in-memory store backed by `DashMap`, for tests and dry
/// runs.
pub struct MemoryStore {
    records: DashMap<String, FollowupRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowupStore for MemoryStore {
    fn get(&self, email: &str) -> OutreachResult<Option<FollowupRecord>> {
        Ok(self.records.get(email).map(|r| r.clone()))
    }

    fn put(&self, record: FollowupRecord) -> OutreachResult<()> {
        self.records.insert(record.recruiter_email.clone(), record);
        Ok(())
    }

    fn remove(&self, email: &str) -> OutreachResult<bool> {
        Ok(self.records.remove(email).is_some())
    }

    fn list_where(
        &self,
        predicate: &dyn Fn(&FollowupRecord) -> bool,
    ) -> OutreachResult<Vec<FollowupRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| predicate(r.value()))
            .map(|r| r.value().clone())
            .collect())
    }
}
