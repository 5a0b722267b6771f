use thiserror::Error;

pub type OutreachResult<T> = Result<T, OutreachError>;

#[derive(Error, Debug)]
pub enum OutreachError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schedule error: {0}")]
    Schedule(#[from] outreach_scheduling::ScheduleError),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Follow-up store error: {0}")]
    Store(String),

    #[error("Mailbox error: {0}")]
    Mailbox(String),

    #[error("Send-later error: {0}")]
    SendLater(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
