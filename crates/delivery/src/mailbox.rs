//! Mailbox seam — saving drafts and sending messages.
//! Each client translates an outreach message into the provider call the
//! pipeline needs; transport itself stays out of scope.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use outreach_core::OutreachMessage;

/// Receipt for a saved draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReceipt {
    pub draft_id: String,
    /// Thread the draft opened; follow-ups attach to it.
    pub thread_id: String,
}

/// Receipt for an immediately sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
    pub thread_id: String,
}

/// The authorized mailbox profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxProfile {
    pub email_address: String,
}

/// Trait for mailbox backends.
pub trait Mailbox: Send + Sync {
    fn profile(&self) -> Result<MailboxProfile, anyhow::Error>;
    fn save_draft(&self, message: &OutreachMessage) -> Result<DraftReceipt, anyhow::Error>;
    fn send_now(&self, message: &OutreachMessage) -> Result<SendReceipt, anyhow::Error>;
}

// ─── Outbox mailbox ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    Draft,
    Sent,
}

/// One message held in the outbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub thread_id: String,
    pub status: OutboxStatus,
    pub message: OutreachMessage,
    pub stored_at: DateTime<Utc>,
}

/// In-process mailbox backed by `DashMap`.
///
/// Assigns uuid-based draft/message/thread ids and keeps every message it
/// handled, so pipelines run offline end to end and tests can inspect
/// what would have gone out. In production: POST to the Gmail
/// `users.drafts.create` / `users.messages.send` endpoints.
pub struct OutboxMailbox {
    address: String,
    entries: DashMap<String, OutboxEntry>,
}

impl OutboxMailbox {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        info!(address = %address, "outbox mailbox initialized");
        Self {
            address,
            entries: DashMap::new(),
        }
    }

    /// Entry by draft or message id.
    pub fn entry(&self, id: &str) -> Option<OutboxEntry> {
        self.entries.get(id).map(|e| e.clone())
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Mailbox for OutboxMailbox {
    fn profile(&self) -> Result<MailboxProfile, anyhow::Error> {
        Ok(MailboxProfile {
            email_address: self.address.clone(),
        })
    }

    fn save_draft(&self, message: &OutreachMessage) -> Result<DraftReceipt, anyhow::Error> {
        let draft_id = format!("draft-{}", Uuid::new_v4());
        let thread_id = format!("thread-{}", Uuid::new_v4());

        debug!(
            draft_id = %draft_id,
            to = %message.to,
            subject = %message.subject,
            "saving draft"
        );
        metrics::counter!("outreach.drafts_saved").increment(1);

        self.entries.insert(
            draft_id.clone(),
            OutboxEntry {
                thread_id: thread_id.clone(),
                status: OutboxStatus::Draft,
                message: message.clone(),
                stored_at: Utc::now(),
            },
        );

        Ok(DraftReceipt {
            draft_id,
            thread_id,
        })
    }

    fn send_now(&self, message: &OutreachMessage) -> Result<SendReceipt, anyhow::Error> {
        let message_id = format!("msg-{}", Uuid::new_v4());
        let thread_id = format!("thread-{}", Uuid::new_v4());

        info!(
            message_id = %message_id,
            to = %message.to,
            subject = %message.subject,
            "sending message"
        );
        metrics::counter!("outreach.emails_sent").increment(1);

        self.entries.insert(
            message_id.clone(),
            OutboxEntry {
                thread_id: thread_id.clone(),
                status: OutboxStatus::Sent,
                message: message.clone(),
                stored_at: Utc::now(),
            },
        );

        Ok(SendReceipt {
            message_id,
            thread_id,
        })
    }
}
