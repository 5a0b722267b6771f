//! Follow-up lifecycle — upsert on send, query what is due, record each
//! follow-up as it goes out.

use chrono::{Duration, Utc};
use tracing::{info, warn};

use outreach_core::config::FollowupConfig;
use outreach_core::{Contact, OutreachResult};

use crate::store::{FollowupRecord, FollowupStore};

/// Tracks outreach threads eligible for follow-up on top of a pluggable
/// store. Construction is explicit: the caller supplies configuration and
/// the store, nothing is read from ambient state.
pub struct FollowupTracker<S: FollowupStore> {
    store: S,
    config: FollowupConfig,
    timezone: String,
}

impl<S: FollowupStore> FollowupTracker<S> {
    pub fn new(config: FollowupConfig, timezone: impl Into<String>, store: S) -> Self {
        Self {
            store,
            config,
            timezone: timezone.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Track a freshly sent outreach thread for follow-up.
    ///
    /// An existing record for the same address keeps its history but gets
    /// the new thread id, a touched `last_contact`, and its follow-up
    /// count reset to zero. A new record schedules its first follow-up
    /// `wait_days` out.
    pub fn track(
        &self,
        contact: &Contact,
        thread_id: &str,
        subject: &str,
    ) -> OutreachResult<FollowupRecord> {
        let now = Utc::now();

        let record = match self.store.get(&contact.email)? {
            Some(mut existing) => {
                existing.thread_id = thread_id.to_string();
                existing.last_contact = now;
                existing.followup_count = 0;
                existing
            }
            None => FollowupRecord {
                recruiter_email: contact.email.clone(),
                recruiter_name: contact.name.clone(),
                recruiter_company: contact.company.clone(),
                thread_id: thread_id.to_string(),
                subject: subject.to_string(),
                initial_contact: now,
                last_contact: now,
                followup_count: 0,
                next_followup: now + Duration::days(self.config.wait_days),
                max_followups: self.config.max_followups,
                followup_wait_days: self.config.wait_days,
                timezone: self.timezone.clone(),
            },
        };

        self.store.put(record.clone())?;
        info!(
            email = %record.recruiter_email,
            thread_id = %record.thread_id,
            next_followup = %record.next_followup,
            "tracked outreach thread for follow-up"
        );
        Ok(record)
    }

    /// Records that are due: next follow-up has arrived and the record
    /// has not exhausted its own follow-up allowance.
    pub fn pending(&self) -> OutreachResult<Vec<FollowupRecord>> {
        let now = Utc::now();
        self.store
            .list_where(&|r| r.next_followup <= now && r.followup_count < r.max_followups)
    }

    /// Record that a follow-up went out: bump the count, touch
    /// `last_contact`, and push `next_followup` out by the record's own
    /// wait period. Unknown addresses log a warning and change nothing.
    pub fn record_followup(&self, email: &str) -> OutreachResult<Option<FollowupRecord>> {
        let Some(mut record) = self.store.get(email)? else {
            warn!(email, "follow-up recorded for untracked address");
            return Ok(None);
        };

        let now = Utc::now();
        record.followup_count += 1;
        record.last_contact = now;
        record.next_followup = now + Duration::days(record.followup_wait_days);

        self.store.put(record.clone())?;
        info!(
            email = %record.recruiter_email,
            followup_count = record.followup_count,
            next_followup = %record.next_followup,
            "recorded follow-up"
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tracker() -> FollowupTracker<MemoryStore> {
        FollowupTracker::new(
            FollowupConfig::default(),
            "America/New_York",
            MemoryStore::new(),
        )
    }

    fn contact() -> Contact {
        Contact::new("grace@globex.com", "Grace Hopper", "Globex")
    }

    // 1. Tracking -----------------------------------------------------------

    #[test]
    fn test_track_new_contact() {
        let tracker = tracker();
        let before = Utc::now();
        let record = tracker
            .track(&contact(), "thread-001", "Globex Application")
            .unwrap();

        assert_eq!(record.recruiter_email, "grace@globex.com");
        assert_eq!(record.followup_count, 0);
        assert_eq!(record.max_followups, 2);
        assert_eq!(record.timezone, "America/New_York");
        assert!(record.next_followup >= before + Duration::days(3));
        assert_eq!(record.initial_contact, record.last_contact);
    }

    #[test]
    fn test_retrack_resets_count_and_keeps_history() {
        let tracker = tracker();
        let first = tracker
            .track(&contact(), "thread-001", "Globex Application")
            .unwrap();
        tracker.record_followup("grace@globex.com").unwrap();

        let second = tracker
            .track(&contact(), "thread-002", "Globex Application")
            .unwrap();

        assert_eq!(second.thread_id, "thread-002");
        assert_eq!(second.followup_count, 0);
        assert_eq!(second.initial_contact, first.initial_contact);
        assert!(second.last_contact >= first.last_contact);
    }

    // 2. Pending ------------------------------------------------------------

    #[test]
    fn test_pending_requires_due_date_and_allowance() {
        let tracker = tracker();
        let now = Utc::now();

        // Due and under the allowance.
        let mut due = tracker.track(&contact(), "t1", "s").unwrap();
        due.next_followup = now - Duration::hours(2);
        tracker.store().put(due).unwrap();

        // Due but exhausted.
        let other = Contact::new("max@acme.com", "Max", "Acme");
        let mut exhausted = tracker.track(&other, "t2", "s").unwrap();
        exhausted.next_followup = now - Duration::hours(2);
        exhausted.followup_count = exhausted.max_followups;
        tracker.store().put(exhausted).unwrap();

        // Not yet due.
        let third = Contact::new("early@acme.com", "Early", "Acme");
        tracker.track(&third, "t3", "s").unwrap();

        let pending = tracker.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].recruiter_email, "grace@globex.com");
    }

    #[test]
    fn test_pending_honors_per_record_allowance() {
        let tracker = tracker();
        let now = Utc::now();

        // A record granted more follow-ups than the default stays pending
        // past the default cap.
        let mut generous = tracker.track(&contact(), "t1", "s").unwrap();
        generous.max_followups = 5;
        generous.followup_count = 3;
        generous.next_followup = now - Duration::hours(1);
        tracker.store().put(generous).unwrap();

        let pending = tracker.pending().unwrap();
        assert_eq!(pending.len(), 1);
    }

    // 3. Recording follow-ups -----------------------------------------------

    #[test]
    fn test_record_followup_bumps_count_and_pushes_date() {
        let tracker = tracker();
        tracker.track(&contact(), "t1", "s").unwrap();

        let before = Utc::now();
        let updated = tracker
            .record_followup("grace@globex.com")
            .unwrap()
            .unwrap();

        assert_eq!(updated.followup_count, 1);
        assert!(updated.next_followup >= before + Duration::days(3));
        assert!(updated.last_contact >= before);
    }

    #[test]
    fn test_record_followup_unknown_address_is_noop() {
        let tracker = tracker();
        assert!(tracker.record_followup("ghost@nowhere.com").unwrap().is_none());
    }

    #[test]
    fn test_exhausted_after_max_followups() {
        let tracker = tracker();
        let now = Utc::now();
        tracker.track(&contact(), "t1", "s").unwrap();

        for _ in 0..2 {
            let mut due = tracker.store().get("grace@globex.com").unwrap().unwrap();
            due.next_followup = now - Duration::hours(1);
            tracker.store().put(due).unwrap();
            assert_eq!(tracker.pending().unwrap().len(), 1);
            tracker.record_followup("grace@globex.com").unwrap();
        }

        // Third attempt: count reached max_followups, nothing pending even
        // when rebackdated.
        let mut spent = tracker.store().get("grace@globex.com").unwrap().unwrap();
        spent.next_followup = now - Duration::hours(1);
        tracker.store().put(spent).unwrap();
        assert!(tracker.pending().unwrap().is_empty());
    }
}
