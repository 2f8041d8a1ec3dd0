//! Committee record plus the cycle and eligibility evaluator.
//!
//! The evaluator operations are pure reads over committee state. Eligibility
//! must be recomputed immediately before every draw attempt -- payment
//! markings may have changed since the last render.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::member::{Member, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitteeStatus {
    Active,
    Completed,
}

/// One committed draw result. Immutable once appended; the history is
/// append-only and ordered by cycle ascending, contiguous from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draw {
    pub cycle: u32,
    pub winner_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A rotating-savings committee: fixed membership, fixed monthly
/// contribution, one payout draw per cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Committee {
    pub id: String,
    pub name: String,
    pub admin_id: String,
    pub monthly_amount: u64,
    /// Declared member count, recorded at creation (explicit members + admin).
    pub total_members: u32,
    /// Lifetime in cycles.
    pub duration: u32,
    pub start_date: NaiveDate,
    /// Fixed day of the month contributions fall due.
    pub payment_due_day: u32,
    pub status: CommitteeStatus,
    pub members: Vec<Member>,
    pub draw_history: Vec<Draw>,
    #[serde(default)]
    pub rules: Option<String>,
    #[serde(default)]
    pub whatsapp_group_url: Option<String>,
}

impl Committee {
    // ── Evaluator ────────────────────────────────────────────────────

    /// Current payment cycle, numbered from 1: one past the draws held.
    pub fn current_cycle(&self) -> u32 {
        self.draw_history.len() as u32 + 1
    }

    /// Members qualified for the current cycle's draw: paid up for this
    /// cycle and never a winner. Late and pending payers are excluded.
    pub fn eligible_for_draw(&self) -> Vec<&Member> {
        let cycle = self.current_cycle();
        self.members
            .iter()
            .filter(|m| !m.has_won && m.payment_status_for(cycle) == PaymentStatus::Paid)
            .collect()
    }

    /// Whether the draw history already covers the full duration.
    pub fn is_exhausted(&self) -> bool {
        self.draw_history.len() as u32 >= self.duration
    }

    /// Total payout pool per cycle.
    pub fn pool_amount(&self) -> u64 {
        self.monthly_amount * u64::from(self.total_members)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn member(&self, user_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.member(user_id).is_some()
    }

    /// Display name for a past winner, if the membership still resolves.
    pub fn winner_name(&self, draw: &Draw) -> Option<&str> {
        self.member(&draw.winner_id).map(|m| m.name.as_str())
    }

    /// Members without a `Paid` marking for the current cycle (pending or
    /// late). Feeds the defaulter tally and group payment reminders.
    pub fn defaulters(&self) -> Vec<&Member> {
        let cycle = self.current_cycle();
        self.members
            .iter()
            .filter(|m| m.payment_status_for(cycle) != PaymentStatus::Paid)
            .collect()
    }

    /// This cycle's collected amount: contribution times paid members.
    pub fn collected_this_cycle(&self) -> u64 {
        let cycle = self.current_cycle();
        let paid = self
            .members
            .iter()
            .filter(|m| m.payment_status_for(cycle) == PaymentStatus::Paid)
            .count() as u64;
        self.monthly_amount * paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::member::{MemberStatus, PaymentRecord};

    fn member(user_id: &str, has_won: bool, records: &[(u32, PaymentStatus)]) -> Member {
        Member {
            user_id: user_id.into(),
            name: user_id.into(),
            mobile: String::new(),
            status: MemberStatus::Active,
            payment_history: records
                .iter()
                .map(|&(cycle, status)| PaymentRecord { cycle, status })
                .collect(),
            has_won,
        }
    }

    fn committee(members: Vec<Member>, draws: u32) -> Committee {
        Committee {
            id: "committee-t".into(),
            name: "Test".into(),
            admin_id: "user-1".into(),
            monthly_amount: 1000,
            total_members: members.len() as u32,
            duration: 4,
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            payment_due_day: 7,
            status: CommitteeStatus::Active,
            members,
            draw_history: (1..=draws)
                .map(|cycle| Draw {
                    cycle,
                    winner_id: format!("user-{cycle}"),
                    timestamp: Utc::now(),
                })
                .collect(),
            rules: None,
            whatsapp_group_url: None,
        }
    }

    #[test]
    fn current_cycle_is_one_past_draw_count() {
        assert_eq!(committee(vec![], 0).current_cycle(), 1);
        assert_eq!(committee(vec![], 3).current_cycle(), 4);
    }

    #[test]
    fn eligibility_requires_paid_and_never_won() {
        let c = committee(
            vec![
                member("paid", false, &[(1, PaymentStatus::Paid)]),
                member("late", false, &[(1, PaymentStatus::Late)]),
                member("pending", false, &[]),
                member("winner", true, &[(1, PaymentStatus::Paid)]),
            ],
            0,
        );
        let eligible = c.eligible_for_draw();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].user_id, "paid");
    }

    #[test]
    fn eligibility_tracks_current_cycle() {
        // Paid for cycle 1 only; after one draw the current cycle is 2.
        let c = committee(vec![member("m", false, &[(1, PaymentStatus::Paid)])], 1);
        assert!(c.eligible_for_draw().is_empty());
    }

    #[test]
    fn exhaustion_at_duration() {
        assert!(!committee(vec![], 3).is_exhausted());
        assert!(committee(vec![], 4).is_exhausted());
    }

    #[test]
    fn defaulters_and_collection() {
        let c = committee(
            vec![
                member("a", false, &[(1, PaymentStatus::Paid)]),
                member("b", false, &[(1, PaymentStatus::Late)]),
                member("c", false, &[]),
            ],
            0,
        );
        assert_eq!(c.collected_this_cycle(), 1000);
        let names: Vec<_> = c.defaulters().iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
