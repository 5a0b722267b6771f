use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `OUTREACH__`; CLI arguments override individual
/// fields after loading.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Recipient timezone used for send-window resolution.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub followup: FollowupConfig,
    #[serde(default)]
    pub sendlater: SendLaterConfig,
    #[serde(default)]
    pub mailbox: MailboxConfig,
}

/// Initial outreach message settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// Subject template; empty means the caller must pass one.
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_body_path")]
    pub body_path: String,
    #[serde(default)]
    pub attachment_path: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
}

/// Send-window schedule settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// When disabled, messages are saved as drafts instead of scheduled.
    #[serde(default = "default_schedule_enabled")]
    pub enabled: bool,
    #[serde(default = "default_schedule_csv_path")]
    pub csv_path: String,
}

/// Follow-up tracking settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowupConfig {
    #[serde(default = "default_followup_enabled")]
    pub enabled: bool,
    #[serde(default = "default_followup_store_path")]
    pub store_path: String,
    #[serde(default = "default_followup_wait_days")]
    pub wait_days: i64,
    #[serde(default = "default_max_followups")]
    pub max_followups: u32,
    #[serde(default = "default_followup_subject")]
    pub subject: String,
    #[serde(default = "default_followup_body_path")]
    pub body_path: String,
}

/// Deferred-send settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SendLaterConfig {
    /// Address the deferred send is issued for. Falls back to the
    /// mailbox profile address when unset.
    #[serde(default)]
    pub acting_address: Option<String>,
}

/// Authorized mailbox session settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxConfig {
    #[serde(default = "default_mailbox_address")]
    pub address: String,
}

// Default functions
fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}
fn default_body_path() -> String {
    "message_body.html".to_string()
}
fn default_schedule_enabled() -> bool {
    false
}
fn default_schedule_csv_path() -> String {
    "scheduler.csv".to_string()
}
fn default_followup_enabled() -> bool {
    true
}
fn default_followup_store_path() -> String {
    "followup_db.json".to_string()
}
fn default_followup_wait_days() -> i64 {
    3
}
fn default_max_followups() -> u32 {
    2
}
fn default_followup_subject() -> String {
    "Follow-up: {{recruiter_company}} Application".to_string()
}
fn default_followup_body_path() -> String {
    "followup_template.txt".to_string()
}
fn default_mailbox_address() -> String {
    "outreach@localhost".to_string()
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            subject: String::new(),
            body_path: default_body_path(),
            attachment_path: None,
            attachment_name: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_schedule_enabled(),
            csv_path: default_schedule_csv_path(),
        }
    }
}

impl Default for FollowupConfig {
    fn default() -> Self {
        Self {
            enabled: default_followup_enabled(),
            store_path: default_followup_store_path(),
            wait_days: default_followup_wait_days(),
            max_followups: default_max_followups(),
            subject: default_followup_subject(),
            body_path: default_followup_body_path(),
        }
    }
}

impl Default for SendLaterConfig {
    fn default() -> Self {
        Self {
            acting_address: None,
        }
    }
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            address: default_mailbox_address(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            message: MessageConfig::default(),
            schedule: ScheduleConfig::default(),
            followup: FollowupConfig::default(),
            sendlater: SendLaterConfig::default(),
            mailbox: MailboxConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("OUTREACH")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        let app: Self = config.try_deserialize()?;
        tracing::debug!(
            timezone = %app.timezone,
            schedule_enabled = app.schedule.enabled,
            followup_enabled = app.followup.enabled,
            "loaded configuration from environment"
        );
        Ok(app)
    }
}
