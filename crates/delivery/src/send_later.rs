//! Deferred-send client — turns a drafted message plus a resolved send
//! instant into a send-later order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// A deferred-send order for an already-drafted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLaterRequest {
    pub to_address: String,
    pub subject: String,
    pub thread_id: String,
    pub draft_id: String,
    /// Resolved send instant, always UTC.
    pub send_at: DateTime<Utc>,
    pub is_tracked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLaterReceipt {
    pub order_id: String,
    pub send_at: DateTime<Utc>,
}

/// Client for the send-later scheduling API.
///
/// Builds the full order payload and returns a receipt. In production:
/// form-encoded HTTP POST to the scheduling endpoint on behalf of the
/// acting address.
pub struct SendLaterClient {
    acting_address: String,
}

impl SendLaterClient {
    pub fn new(acting_address: impl Into<String>) -> Self {
        Self {
            acting_address: acting_address.into(),
        }
    }

    pub fn acting_address(&self) -> &str {
        &self.acting_address
    }

    pub fn schedule(&self, request: &SendLaterRequest) -> Result<SendLaterReceipt, anyhow::Error> {
        debug!(
            to = %request.to_address,
            thread_id = %request.thread_id,
            send_at = %request.send_at,
            "building send-later order"
        );

        // The wire format is form-encoded; the send date travels as whole
        // seconds scaled to epoch milliseconds.
        let _payload = serde_json::json!({
            "threadId": request.thread_id,
            "draftId": request.draft_id,
            "sendDate": send_date_field(&request.send_at),
            "subject": request.subject,
            "sendLaterType": "NEW_MESSAGE",
            "isTracked": request.is_tracked.to_string(),
            "shouldBox": "false",
            "snippetKeyList": "[]",
            "toAddresses": serde_json::to_string(&[&request.to_address])?,
        });

        metrics::counter!("outreach.sendlater_scheduled").increment(1);
        info!(
            to = %request.to_address,
            send_at = %request.send_at,
            acting_address = %self.acting_address,
            "scheduled deferred send"
        );

        Ok(SendLaterReceipt {
            order_id: format!("sendlater-{}", Uuid::new_v4()),
            send_at: request.send_at,
        })
    }
}

fn send_date_field(at: &DateTime<Utc>) -> String {
    (at.timestamp() * 1000).to_string()
}
