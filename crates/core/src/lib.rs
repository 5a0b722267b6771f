pub mod config;
pub mod error;
pub mod templates;
pub mod types;

pub use config::AppConfig;
pub use error::{OutreachError, OutreachResult};
pub use types::{Attachment, Contact, OutreachMessage};
