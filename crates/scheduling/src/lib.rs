//! Weekly send-window scheduling.
//!
//! Recipients should only receive outreach during their working hours, in
//! their own timezone. This crate parses a weekly schedule of allowed
//! send intervals and resolves, for any instant, whether a message may go
//! out immediately or must wait for a jittered slot inside the next
//! allowed window.

pub mod schedule;
pub mod window;

pub use schedule::{ScheduleError, TimeInterval, WeeklySchedule};
pub use window::{SendDecision, SendWindowResolver};
