//! Delivery collaborators: the mailbox seam (drafts and immediate sends)
//! and the deferred-send client used for scheduled delivery.

pub mod mailbox;
pub mod send_later;

pub use mailbox::{DraftReceipt, Mailbox, MailboxProfile, OutboxMailbox, SendReceipt};
pub use send_later::{SendLaterClient, SendLaterReceipt, SendLaterRequest};
