//! Follow-up tracking for outreach threads.
//!
//! Every sent outreach email can be tracked for later follow-up. Records
//! live behind a small key-value store interface with a JSON-file-backed
//! implementation for the CLIs and an in-memory one for tests and dry
//! runs; the tracker layers the upsert/pending/record lifecycle on top.

pub mod store;
pub mod tracker;

pub use store::{FollowupRecord, FollowupStore, JsonFileStore, MemoryStore};
pub use tracker::FollowupTracker;
