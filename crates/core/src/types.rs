use serde::{Deserialize, Serialize};

/// A recruiter contact targeted by an outreach campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub name: String,
    pub company: String,
}

impl Contact {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            company: company.into(),
        }
    }
}

/// A composed outreach email, ready for the mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachMessage {
    pub to: String,
    pub subject: String,
    pub body_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// A file attached to an outreach message. Name and content always travel
/// together; a half-specified attachment cannot be represented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content: Vec<u8>,
}

impl OutreachMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body_html: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body_html: body_html.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, name: impl Into<String>, content: Vec<u8>) -> Self {
        self.attachment = Some(Attachment {
            name: name.into(),
            content,
        });
        self
    }
}
