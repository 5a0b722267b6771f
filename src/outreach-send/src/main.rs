//! outreach-send — compose one outreach email to a recruiter and send or
//! schedule it inside the recipient's allowed send windows.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use outreach_core::config::AppConfig;
use outreach_core::templates::TemplateRenderer;
use outreach_core::{Contact, OutreachMessage};
use outreach_delivery::{Mailbox, OutboxMailbox, SendLaterClient, SendLaterRequest};
use outreach_followup::{FollowupTracker, JsonFileStore};
use outreach_scheduling::{SendDecision, SendWindowResolver, WeeklySchedule};

#[derive(Parser, Debug)]
#[command(name = "outreach-send")]
#[command(about = "Compose and schedule one outreach email to a recruiter")]
#[command(version)]
struct Cli {
    /// Company the recruiter hires for
    recruiter_company: String,

    /// Full name of the recruiter
    recruiter_name: String,

    /// Email address of the recruiter
    recruiter_email: String,

    /// Subject template (overrides config)
    #[arg(short, long, env = "OUTREACH__MESSAGE__SUBJECT")]
    subject: Option<String>,

    /// Path to the body template (overrides config)
    #[arg(short, long, env = "OUTREACH__MESSAGE__BODY_PATH")]
    message_body_path: Option<String>,

    /// Path to a file to attach; requires --attachment-name
    #[arg(long, env = "OUTREACH__MESSAGE__ATTACHMENT_PATH")]
    attachment_path: Option<String>,

    /// Filename the attachment is delivered under
    #[arg(long, env = "OUTREACH__MESSAGE__ATTACHMENT_NAME")]
    attachment_name: Option<String>,

    /// Recipient timezone for send-window resolution (overrides config)
    #[arg(short, long, env = "OUTREACH__TIMEZONE")]
    timezone: Option<String>,

    /// Schedule within send windows instead of saving a draft
    #[arg(long, default_value_t = false)]
    schedule: bool,

    /// Schedule CSV path (overrides config)
    #[arg(long, env = "OUTREACH__SCHEDULE__CSV_PATH")]
    schedule_csv_path: Option<String>,

    /// Address deferred sends act for (overrides config)
    #[arg(long, env = "OUTREACH__SENDLATER__ACTING_ADDRESS")]
    acting_address: Option<String>,

    /// Track this thread for automatic follow-up even if disabled in config
    #[arg(short, long, default_value_t = false)]
    followup: bool,

    /// Follow-up store path (overrides config)
    #[arg(long, env = "OUTREACH__FOLLOWUP__STORE_PATH")]
    followup_store_path: Option<String>,

    /// Days to wait before the first follow-up (overrides config)
    #[arg(long, env = "OUTREACH__FOLLOWUP__WAIT_DAYS")]
    followup_wait_days: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(subject) = cli.subject {
        config.message.subject = subject;
    }
    if let Some(path) = cli.message_body_path {
        config.message.body_path = path;
    }
    if let Some(path) = cli.attachment_path {
        config.message.attachment_path = Some(path);
    }
    if let Some(name) = cli.attachment_name {
        config.message.attachment_name = Some(name);
    }
    if let Some(tz) = cli.timezone {
        config.timezone = tz;
    }
    if cli.schedule {
        config.schedule.enabled = true;
    }
    if let Some(path) = cli.schedule_csv_path {
        config.schedule.csv_path = path;
    }
    if let Some(address) = cli.acting_address {
        config.sendlater.acting_address = Some(address);
    }
    if cli.followup {
        config.followup.enabled = true;
    }
    if let Some(path) = cli.followup_store_path {
        config.followup.store_path = path;
    }
    if let Some(days) = cli.followup_wait_days {
        config.followup.wait_days = days;
    }

    if config.message.subject.is_empty() {
        anyhow::bail!("no subject template: pass --subject or set OUTREACH__MESSAGE__SUBJECT");
    }

    let contact = Contact::new(
        &cli.recruiter_email,
        &cli.recruiter_name,
        &cli.recruiter_company,
    );
    info!(
        email = %contact.email,
        name = %contact.name,
        company = %contact.company,
        followup = config.followup.enabled,
        "composing outreach email"
    );

    let message = compose_message(&config, &contact)?;

    let mailbox = OutboxMailbox::new(&config.mailbox.address);
    let tracker = config.followup.enabled.then(|| {
        FollowupTracker::new(
            config.followup.clone(),
            &config.timezone,
            JsonFileStore::new(&config.followup.store_path),
        )
    });

    // Draft-only mode.
    if !config.schedule.enabled {
        let draft = mailbox.save_draft(&message)?;
        info!(draft_id = %draft.draft_id, "draft saved");
        track_thread(&tracker, &contact, &draft.thread_id, &message.subject)?;
        return Ok(());
    }

    // Scheduled mode. A broken schedule setup still saves the draft so
    // the composed message is never lost.
    let resolver = match build_resolver(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!(error = %e, "cannot resolve send windows, saving draft only");
            let draft = mailbox.save_draft(&message)?;
            track_thread(&tracker, &contact, &draft.thread_id, &message.subject)?;
            return Err(e);
        }
    };

    match resolver.decide() {
        SendDecision::SendNow => {
            let receipt = mailbox.send_now(&message)?;
            info!(message_id = %receipt.message_id, "sent immediately inside open window");
            track_thread(&tracker, &contact, &receipt.thread_id, &message.subject)?;
        }
        SendDecision::SendAt(at) => {
            let draft = mailbox.save_draft(&message)?;
            let client = SendLaterClient::new(acting_address(&config, &mailbox)?);
            client.schedule(&SendLaterRequest {
                to_address: contact.email.clone(),
                subject: message.subject.clone(),
                thread_id: draft.thread_id.clone(),
                draft_id: draft.draft_id.clone(),
                send_at: at,
                is_tracked: true,
            })?;
            info!(send_at = %at, draft_id = %draft.draft_id, "deferred send scheduled");
            track_thread(&tracker, &contact, &draft.thread_id, &message.subject)?;
        }
        SendDecision::NoWindowAvailable => {
            let draft = mailbox.save_draft(&message)?;
            track_thread(&tracker, &contact, &draft.thread_id, &message.subject)?;
            error!("no allowed send window in schedule, draft saved");
            anyhow::bail!("no send window available");
        }
    }

    Ok(())
}

/// Render subject and body for the contact and attach the configured file
/// if any. Attachment path and name must appear together.
fn compose_message(config: &AppConfig, contact: &Contact) -> anyhow::Result<OutreachMessage> {
    match (
        &config.message.attachment_path,
        &config.message.attachment_name,
    ) {
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("attachment path and attachment name must both be provided")
        }
        _ => {}
    }

    let body_template = std::fs::read_to_string(&config.message.body_path)
        .with_context(|| format!("reading body template {}", config.message.body_path))?;

    let renderer = TemplateRenderer::for_contact(contact);
    let rendered = renderer.render_message(&config.message.subject, &body_template);

    let mut message = OutreachMessage::new(&contact.email, &rendered.subject, &rendered.body);
    if let (Some(path), Some(name)) = (
        &config.message.attachment_path,
        &config.message.attachment_name,
    ) {
        let content =
            std::fs::read(path).with_context(|| format!("reading attachment {path}"))?;
        message = message.with_attachment(name, content);
    }
    Ok(message)
}

fn build_resolver(config: &AppConfig) -> anyhow::Result<SendWindowResolver> {
    let schedule = WeeklySchedule::load(&config.schedule.csv_path)
        .with_context(|| format!("loading schedule {}", config.schedule.csv_path))?;
    let resolver = SendWindowResolver::new(schedule, &config.timezone)?;
    Ok(resolver)
}

fn acting_address(config: &AppConfig, mailbox: &dyn Mailbox) -> anyhow::Result<String> {
    match &config.sendlater.acting_address {
        Some(address) => Ok(address.clone()),
        None => Ok(mailbox.profile()?.email_address),
    }
}

fn track_thread(
    tracker: &Option<FollowupTracker<JsonFileStore>>,
    contact: &Contact,
    thread_id: &str,
    subject: &str,
) -> anyhow::Result<()> {
    if let Some(tracker) = tracker {
        tracker.track(contact, thread_id, subject)?;
    }
    Ok(())
}
