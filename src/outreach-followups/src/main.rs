//! outreach-followups — send every follow-up that has come due, respecting
//! each record's own cadence and the shared send-window schedule.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use outreach_core::config::AppConfig;
use outreach_core::templates::TemplateRenderer;
use outreach_core::{Contact, OutreachMessage};
use outreach_delivery::{Mailbox, OutboxMailbox, SendLaterClient, SendLaterRequest};
use outreach_followup::{FollowupRecord, FollowupTracker, JsonFileStore};
use outreach_scheduling::{SendDecision, SendWindowResolver, WeeklySchedule};

#[derive(Parser, Debug)]
#[command(name = "outreach-followups")]
#[command(about = "Send all due follow-ups from the tracking store")]
#[command(version)]
struct Cli {
    /// Follow-up subject template (overrides config)
    #[arg(short = 's', long, env = "OUTREACH__FOLLOWUP__SUBJECT")]
    followup_subject: Option<String>,

    /// Path to the follow-up body template (overrides config)
    #[arg(short = 'm', long, env = "OUTREACH__FOLLOWUP__BODY_PATH")]
    followup_body_path: Option<String>,

    /// Follow-up store path (overrides config)
    #[arg(long, env = "OUTREACH__FOLLOWUP__STORE_PATH")]
    followup_store_path: Option<String>,

    /// Recipient timezone for send-window resolution (overrides config)
    #[arg(short, long, env = "OUTREACH__TIMEZONE")]
    timezone: Option<String>,

    /// Schedule within send windows instead of saving drafts
    #[arg(long, default_value_t = false)]
    schedule: bool,

    /// Schedule CSV path (overrides config)
    #[arg(long, env = "OUTREACH__SCHEDULE__CSV_PATH")]
    schedule_csv_path: Option<String>,

    /// Address deferred sends act for (overrides config)
    #[arg(long, env = "OUTREACH__SENDLATER__ACTING_ADDRESS")]
    acting_address: Option<String>,
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
    if let Some(subject) = cli.followup_subject {
        config.followup.subject = subject;
    }
    if let Some(path) = cli.followup_body_path {
        config.followup.body_path = path;
    }
    if let Some(path) = cli.followup_store_path {
        config.followup.store_path = path;
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

    let tracker = FollowupTracker::new(
        config.followup.clone(),
        &config.timezone,
        JsonFileStore::new(&config.followup.store_path),
    );

    let pending = tracker.pending()?;
    if pending.is_empty() {
        info!("no pending follow-ups");
        return Ok(());
    }
    info!(count = pending.len(), "processing pending follow-ups");

    let body_template = std::fs::read_to_string(&config.followup.body_path)
        .with_context(|| format!("reading follow-up template {}", config.followup.body_path))?;

    let mailbox = OutboxMailbox::new(&config.mailbox.address);

    // When the schedule cannot be loaded, every follow-up degrades to a
    // draft instead of aborting the whole run.
    let scheduling = if config.schedule.enabled {
        match build_scheduling(&config, &mailbox) {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!(error = %e, "scheduling unavailable, saving drafts instead");
                None
            }
        }
    } else {
        None
    };

    let mut failures = 0usize;
    for record in pending {
        if let Err(e) = dispatch_followup(
            &record,
            &config,
            &body_template,
            &mailbox,
            &tracker,
            &scheduling,
        ) {
            error!(email = %record.recruiter_email, error = %e, "follow-up failed");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} follow-up(s) failed");
    }
    Ok(())
}

fn dispatch_followup(
    record: &FollowupRecord,
    config: &AppConfig,
    body_template: &str,
    mailbox: &OutboxMailbox,
    tracker: &FollowupTracker<JsonFileStore>,
    scheduling: &Option<(SendWindowResolver, SendLaterClient)>,
) -> anyhow::Result<()> {
    let contact = Contact::new(
        &record.recruiter_email,
        &record.recruiter_name,
        &record.recruiter_company,
    );
    let renderer = TemplateRenderer::for_contact(&contact);
    let rendered = renderer.render_message(&config.followup.subject, body_template);
    let message = OutreachMessage::new(&contact.email, &rendered.subject, &rendered.body);

    info!(
        email = %contact.email,
        company = %contact.company,
        followup_number = record.followup_count + 1,
        "sending follow-up"
    );

    match scheduling {
        None => {
            let draft = mailbox.save_draft(&message)?;
            info!(draft_id = %draft.draft_id, "follow-up draft saved");
            tracker.record_followup(&contact.email)?;
        }
        Some((resolver, client)) => match resolver.decide() {
            SendDecision::SendNow => {
                let receipt = mailbox.send_now(&message)?;
                info!(message_id = %receipt.message_id, "follow-up sent inside open window");
                tracker.record_followup(&contact.email)?;
            }
            SendDecision::SendAt(at) => {
                let draft = mailbox.save_draft(&message)?;
                client.schedule(&SendLaterRequest {
                    to_address: contact.email.clone(),
                    subject: message.subject.clone(),
                    thread_id: draft.thread_id.clone(),
                    draft_id: draft.draft_id.clone(),
                    send_at: at,
                    is_tracked: true,
                })?;
                info!(send_at = %at, "follow-up scheduled");
                tracker.record_followup(&contact.email)?;
            }
            SendDecision::NoWindowAvailable => {
                // Leave the record untouched so the next run retries it.
                anyhow::bail!("no send window available");
            }
        },
    }
    Ok(())
}

fn build_scheduling(
    config: &AppConfig,
    mailbox: &dyn Mailbox,
) -> anyhow::Result<(SendWindowResolver, SendLaterClient)> {
    let schedule = WeeklySchedule::load(&config.schedule.csv_path)
        .with_context(|| format!("loading schedule {}", config.schedule.csv_path))?;
    let resolver = SendWindowResolver::new(schedule, &config.timezone)?;
    let address = match &config.sendlater.acting_address {
        Some(address) => address.clone(),
        None => mailbox.profile()?.email_address,
    };
    Ok((resolver, SendLaterClient::new(address)))
}
