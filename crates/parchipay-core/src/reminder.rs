//! Due-date reminders.
//!
//! The scheduler is invoked periodically (after data loads), not off payment
//! events, so it must tolerate arbitrary re-invocation within the same day.
//! Idempotence comes from durable markers keyed by committee, year, month and
//! day-offset: each combination notifies at most once, ever.

use chrono::{Datelike, NaiveDate};

use crate::error::StoreError;
use crate::model::{Committee, CommitteeStatus, PaymentStatus};

/// Durable presence-only flag store for one-shot markers.
///
/// Injected rather than reached for, so tests can run against an in-memory
/// store and the scheduler stays deterministic.
pub trait MarkerStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
    fn set(&self, key: &str) -> Result<(), StoreError>;
}

/// How close today is to the cycle's payment due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueProximity {
    None,
    Reminder,
    Urgent,
}

#[derive(Debug, Clone, Copy)]
pub struct ReminderWindow {
    pub proximity: DueProximity,
    /// Whole days until this month's due date. Negative once it has passed.
    pub days_remaining: i64,
}

/// Classify today against the due day of the current calendar month.
///
/// `Urgent` within two days of the due date, `Reminder` within five,
/// `None` otherwise -- including on the due date itself and after it
/// (due-today handling belongs to [`should_notify`]).
pub fn reminder_window(due_day: u32, today: NaiveDate) -> ReminderWindow {
    let due = due_date_in_month(due_day, today);
    let days_remaining = (due - today).num_days();
    let proximity = match days_remaining {
        1..=2 => DueProximity::Urgent,
        3..=5 => DueProximity::Reminder,
        _ => DueProximity::None,
    };
    ReminderWindow {
        proximity,
        days_remaining,
    }
}

/// Which one-shot reminder a notification intent represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOffset {
    TwoDay,
    DueToday,
}

impl ReminderOffset {
    fn tag(self) -> &'static str {
        match self {
            ReminderOffset::TwoDay => "2day",
            ReminderOffset::DueToday => "today",
        }
    }
}

/// A reminder the scheduler wants to publish. The caller turns accepted
/// intents into ledger notifications.
#[derive(Debug, Clone)]
pub struct ReminderIntent {
    pub committee_id: String,
    pub offset: ReminderOffset,
    pub message: String,
}

impl ReminderIntent {
    /// Durable marker key: one per committee, calendar month and offset.
    pub fn marker_key(&self, today: NaiveDate) -> String {
        format!(
            "reminder-{}-{}-{}-{}",
            self.committee_id,
            today.year(),
            today.month(),
            self.offset.tag()
        )
    }
}

/// Decide whether a reminder is due for this member today.
///
/// Skips members who are not part of the committee, have already won, or
/// have this cycle's payment settled (Paid or Late), inactive committees,
/// and due dates already past this month. Emits the two-day reminder at
/// exactly two days out and the final reminder on the due date.
pub fn should_notify(
    committee: &Committee,
    user_id: &str,
    today: NaiveDate,
) -> Option<ReminderIntent> {
    let member = committee.member(user_id)?;
    if member.has_won || committee.status != CommitteeStatus::Active {
        return None;
    }

    let status = member.payment_status_for(committee.current_cycle());
    if status == PaymentStatus::Paid || status == PaymentStatus::Late {
        return None;
    }

    let due = due_date_in_month(committee.payment_due_day, today);
    if today > due {
        return None;
    }

    match (due - today).num_days() {
        2 => Some(ReminderIntent {
            committee_id: committee.id.clone(),
            offset: ReminderOffset::TwoDay,
            message: format!(
                "\u{1f514} Reminder: Payment for \"{}\" is due in 2 days.",
                committee.name
            ),
        }),
        0 => Some(ReminderIntent {
            committee_id: committee.id.clone(),
            offset: ReminderOffset::DueToday,
            message: format!(
                "\u{23f0} Final Reminder: Payment for \"{}\" is due today!",
                committee.name
            ),
        }),
        _ => None,
    }
}

/// Reminder scheduler over a durable marker store.
pub struct ReminderScheduler<'a, S: MarkerStore> {
    store: &'a S,
}

impl<'a, S: MarkerStore> ReminderScheduler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run one pass for a user over their committees.
    ///
    /// Returns the intents that actually fired this pass; anything already
    /// marked in the store is silently skipped. Markers are recorded before
    /// the intent is handed back, so a crash between the two leans toward
    /// dropping a reminder rather than duplicating it.
    pub fn run(
        &self,
        committees: &[&Committee],
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<ReminderIntent>, StoreError> {
        let mut fired = Vec::new();
        for committee in committees {
            let Some(intent) = should_notify(committee, user_id, today) else {
                continue;
            };
            let key = intent.marker_key(today);
            if self.store.exists(&key)? {
                continue;
            }
            self.store.set(&key)?;
            fired.push(intent);
        }
        Ok(fired)
    }
}

/// Due date for the current calendar month, with the day clamped to the
/// month's length (a due day of 31 falls on Feb 28/29).
fn due_date_in_month(due_day: u32, today: NaiveDate) -> NaiveDate {
    let mut day = due_day.max(1);
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
            return date;
        }
        day -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    use crate::model::{Member, MemberStatus, PaymentRecord};

    #[derive(Default)]
    struct MemoryMarkers(RefCell<HashSet<String>>);

    impl MarkerStore for MemoryMarkers {
        fn exists(&self, key: &str) -> Result<bool, StoreError> {
            Ok(self.0.borrow().contains(key))
        }
        fn set(&self, key: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().insert(key.to_string());
            Ok(())
        }
    }

    fn committee_with_member(status: Option<PaymentStatus>, has_won: bool) -> Committee {
        let payment_history = status
            .map(|s| vec![PaymentRecord { cycle: 1, status: s }])
            .unwrap_or_default();
        Committee {
            id: "committee-r".into(),
            name: "Rainy Day".into(),
            admin_id: "user-1".into(),
            monthly_amount: 2000,
            total_members: 1,
            duration: 4,
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            payment_due_day: 7,
            status: CommitteeStatus::Active,
            members: vec![Member {
                user_id: "user-2".into(),
                name: "Sita".into(),
                mobile: String::new(),
                status: MemberStatus::Active,
                payment_history,
                has_won,
            }],
            draw_history: Vec::new(),
            rules: None,
            whatsapp_group_url: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn window_classification() {
        assert_eq!(reminder_window(7, day(5)).proximity, DueProximity::Urgent);
        assert_eq!(reminder_window(7, day(5)).days_remaining, 2);
        assert_eq!(reminder_window(7, day(6)).proximity, DueProximity::Urgent);
        assert_eq!(reminder_window(7, day(3)).proximity, DueProximity::Reminder);
        assert_eq!(reminder_window(7, day(2)).proximity, DueProximity::Reminder);
        assert_eq!(reminder_window(7, day(1)).proximity, DueProximity::None);
        // Due today and past-due are outside the window.
        assert_eq!(reminder_window(7, day(7)).proximity, DueProximity::None);
        assert_eq!(reminder_window(7, day(8)).proximity, DueProximity::None);
        assert!(reminder_window(7, day(8)).days_remaining < 0);
    }

    #[test]
    fn due_day_clamps_to_month_length() {
        let feb = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
        assert_eq!(
            due_date_in_month(31, feb),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn two_day_reminder_fires_at_exactly_two_days() {
        let c = committee_with_member(None, false);
        let intent = should_notify(&c, "user-2", day(5)).expect("intent");
        assert_eq!(intent.offset, ReminderOffset::TwoDay);
        assert!(intent.message.contains("due in 2 days"));
        assert!(should_notify(&c, "user-2", day(4)).is_none());
        assert!(should_notify(&c, "user-2", day(6)).is_none());
    }

    #[test]
    fn due_today_reminder_fires_on_the_due_date() {
        let c = committee_with_member(Some(PaymentStatus::Pending), false);
        let intent = should_notify(&c, "user-2", day(7)).expect("intent");
        assert_eq!(intent.offset, ReminderOffset::DueToday);
        assert!(intent.message.contains("due today"));
        assert!(should_notify(&c, "user-2", day(8)).is_none());
    }

    #[test]
    fn settled_or_won_members_are_skipped() {
        let paid = committee_with_member(Some(PaymentStatus::Paid), false);
        assert!(should_notify(&paid, "user-2", day(5)).is_none());
        let late = committee_with_member(Some(PaymentStatus::Late), false);
        assert!(should_notify(&late, "user-2", day(5)).is_none());
        // A past winner never gets reminders, whatever their payment state.
        let won = committee_with_member(None, true);
        assert!(should_notify(&won, "user-2", day(5)).is_none());
        assert!(should_notify(&won, "user-2", day(7)).is_none());
    }

    #[test]
    fn inactive_committee_and_non_member_are_skipped() {
        let mut c = committee_with_member(None, false);
        assert!(should_notify(&c, "user-99", day(5)).is_none());
        c.status = CommitteeStatus::Completed;
        assert!(should_notify(&c, "user-2", day(5)).is_none());
    }

    #[test]
    fn scheduler_fires_each_marker_at_most_once() {
        let c = committee_with_member(None, false);
        let committees = [&c];
        let store = MemoryMarkers::default();
        let scheduler = ReminderScheduler::new(&store);

        let first = scheduler.run(&committees, "user-2", day(5)).unwrap();
        assert_eq!(first.len(), 1);
        // Same logical day, any number of repeats: nothing more fires.
        for _ in 0..3 {
            assert!(scheduler.run(&committees, "user-2", day(5)).unwrap().is_empty());
        }
        // The due-today offset is a distinct marker.
        let due = scheduler.run(&committees, "user-2", day(7)).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].offset, ReminderOffset::DueToday);
    }

    #[test]
    fn marker_key_shape() {
        let c = committee_with_member(None, false);
        let intent = should_notify(&c, "user-2", day(5)).unwrap();
        assert_eq!(intent.marker_key(day(5)), "reminder-committee-r-2024-8-2day");
    }
}
