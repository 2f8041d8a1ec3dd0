//! Committee mutation service.
//!
//! Every mutation is a pure transformation: it takes the committee by
//! reference and returns a fresh value, or a [`Refusal`] with the original
//! left untouched. Callers publish the result through
//! [`Directory::replace_committee`](crate::directory::Directory::replace_committee)
//! so readers never observe a half-applied update.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::Refusal;
use crate::model::{
    Committee, CommitteeStatus, Draw, Member, PaymentRecord, PaymentStatus, User,
};

/// Standardized day-of-month payments fall due for new committees.
pub const DEFAULT_DUE_DAY: u32 = 7;

/// Creation parameters. `members` are the explicitly selected memberships;
/// the creating admin is added on top.
#[derive(Debug, Clone)]
pub struct CommitteeParams {
    pub name: String,
    pub monthly_amount: u64,
    pub duration: u32,
    pub start_date: NaiveDate,
    pub whatsapp_group_url: Option<String>,
    pub members: Vec<Member>,
}

/// Build a new active committee with a fresh identity.
///
/// The creating admin becomes an implicit member with empty payment history,
/// and the declared member count includes them.
pub fn create_committee(params: CommitteeParams, admin: &User) -> Committee {
    let mut members = params.members;
    members.push(Member::from_user(admin));
    let total_members = members.len() as u32;
    Committee {
        id: format!("committee-{}", Uuid::new_v4()),
        name: params.name,
        admin_id: admin.id.clone(),
        monthly_amount: params.monthly_amount,
        total_members,
        duration: params.duration,
        start_date: params.start_date,
        payment_due_day: DEFAULT_DUE_DAY,
        status: CommitteeStatus::Active,
        members,
        draw_history: Vec::new(),
        rules: None,
        whatsapp_group_url: params.whatsapp_group_url,
    }
}

/// Commit a draw outcome: append to the history and mark the winner.
///
/// The winner's eligibility is re-checked here even though the draw engine
/// was fed the eligible set -- committee state may have moved between the
/// snapshot and the commit.
pub fn record_draw(
    committee: &Committee,
    winner_id: &str,
    now: DateTime<Utc>,
) -> Result<Committee, Refusal> {
    if committee.is_exhausted() {
        return Err(Refusal::DurationExhausted {
            duration: committee.duration,
        });
    }
    if !committee
        .eligible_for_draw()
        .iter()
        .any(|m| m.user_id == winner_id)
    {
        return Err(Refusal::WinnerNotEligible {
            user_id: winner_id.to_string(),
        });
    }

    let mut updated = committee.clone();
    let cycle = updated.current_cycle();
    updated.draw_history.push(Draw {
        cycle,
        winner_id: winner_id.to_string(),
        timestamp: now,
    });
    for member in &mut updated.members {
        if member.user_id == winner_id {
            member.has_won = true;
        }
    }
    Ok(updated)
}

/// Advance a member's payment marking for the current cycle.
///
/// No record yet means the first press marks `Paid`; an existing record
/// steps along `Pending -> Paid -> Late -> Pending`. This is the only way
/// payment status changes.
pub fn cycle_payment_status(committee: &Committee, member_id: &str) -> Result<Committee, Refusal> {
    if !committee.has_member(member_id) {
        return Err(Refusal::MemberNotFound {
            user_id: member_id.to_string(),
        });
    }

    let mut updated = committee.clone();
    let cycle = updated.current_cycle();
    for member in &mut updated.members {
        if member.user_id != member_id {
            continue;
        }
        match member.payment_history.iter_mut().find(|p| p.cycle == cycle) {
            Some(record) => record.status = record.status.next(),
            None => member.payment_history.push(PaymentRecord {
                cycle,
                status: PaymentStatus::Paid,
            }),
        }
    }
    Ok(updated)
}

/// Attach generated rules text.
pub fn set_rules(committee: &Committee, rules: String) -> Committee {
    let mut updated = committee.clone();
    updated.rules = Some(rules);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberStatus, Role};

    fn admin() -> User {
        User {
            id: "user-1".into(),
            name: "Ramesh".into(),
            mobile: "9876543210".into(),
            role: Role::Admin,
        }
    }

    fn paid_member(user_id: &str) -> Member {
        Member {
            user_id: user_id.into(),
            name: user_id.into(),
            mobile: String::new(),
            status: MemberStatus::Active,
            payment_history: vec![PaymentRecord {
                cycle: 1,
                status: PaymentStatus::Paid,
            }],
            has_won: false,
        }
    }

    fn fresh_committee(members: Vec<Member>) -> Committee {
        create_committee(
            CommitteeParams {
                name: "Test Fund".into(),
                monthly_amount: 5000,
                duration: 4,
                start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                whatsapp_group_url: None,
                members,
            },
            &admin(),
        )
    }

    #[test]
    fn creation_adds_implicit_admin_member() {
        let c = fresh_committee(vec![paid_member("user-2"), paid_member("user-3")]);
        assert_eq!(c.total_members, 3);
        assert_eq!(c.status, CommitteeStatus::Active);
        assert_eq!(c.payment_due_day, DEFAULT_DUE_DAY);
        assert!(c.draw_history.is_empty());
        let admin_member = c.member("user-1").expect("admin membership");
        assert!(admin_member.payment_history.is_empty());
        assert!(!admin_member.has_won);
    }

    #[test]
    fn record_draw_appends_and_marks_winner() {
        let c = fresh_committee(vec![paid_member("user-2")]);
        let updated = record_draw(&c, "user-2", Utc::now()).unwrap();
        assert_eq!(updated.draw_history.len(), 1);
        assert_eq!(updated.draw_history[0].cycle, 1);
        assert_eq!(updated.draw_history[0].winner_id, "user-2");
        assert!(updated.member("user-2").unwrap().has_won);
        assert_eq!(updated.current_cycle(), 2);
        // Original untouched.
        assert!(c.draw_history.is_empty());
        assert!(!c.member("user-2").unwrap().has_won);
    }

    #[test]
    fn record_draw_refuses_ineligible_winner() {
        let c = fresh_committee(vec![paid_member("user-2")]);
        // The admin has no Paid record for cycle 1.
        assert!(matches!(
            record_draw(&c, "user-1", Utc::now()),
            Err(Refusal::WinnerNotEligible { .. })
        ));
        // Past winners stay excluded.
        let after = record_draw(&c, "user-2", Utc::now()).unwrap();
        assert!(matches!(
            record_draw(&after, "user-2", Utc::now()),
            Err(Refusal::WinnerNotEligible { .. })
        ));
    }

    #[test]
    fn record_draw_refuses_past_duration() {
        let mut c = fresh_committee(vec![paid_member("user-2")]);
        c.duration = 0;
        assert!(matches!(
            record_draw(&c, "user-2", Utc::now()),
            Err(Refusal::DurationExhausted { duration: 0 })
        ));
    }

    #[test]
    fn first_marking_creates_paid_record() {
        let c = fresh_committee(vec![]);
        let updated = cycle_payment_status(&c, "user-1").unwrap();
        assert_eq!(
            updated.member("user-1").unwrap().payment_status_for(1),
            PaymentStatus::Paid
        );
        // Exactly one record for the cycle.
        assert_eq!(updated.member("user-1").unwrap().payment_history.len(), 1);
    }

    #[test]
    fn marking_cycles_through_three_states() {
        let c = fresh_committee(vec![]);
        let mut current = cycle_payment_status(&c, "user-1").unwrap();
        assert_eq!(
            current.member("user-1").unwrap().payment_status_for(1),
            PaymentStatus::Paid
        );
        current = cycle_payment_status(&current, "user-1").unwrap();
        assert_eq!(
            current.member("user-1").unwrap().payment_status_for(1),
            PaymentStatus::Late
        );
        current = cycle_payment_status(&current, "user-1").unwrap();
        assert_eq!(
            current.member("user-1").unwrap().payment_status_for(1),
            PaymentStatus::Pending
        );
        current = cycle_payment_status(&current, "user-1").unwrap();
        assert_eq!(
            current.member("user-1").unwrap().payment_status_for(1),
            PaymentStatus::Paid
        );
        // Still a single record despite repeated cycling.
        assert_eq!(current.member("user-1").unwrap().payment_history.len(), 1);
    }

    #[test]
    fn marking_unknown_member_is_refused() {
        let c = fresh_committee(vec![]);
        assert!(matches!(
            cycle_payment_status(&c, "user-404"),
            Err(Refusal::MemberNotFound { .. })
        ));
    }

    #[test]
    fn set_rules_replaces_text() {
        let c = fresh_committee(vec![]);
        let updated = set_rules(&c, "1. Pay on time.".into());
        assert_eq!(updated.rules.as_deref(), Some("1. Pay on time."));
        assert!(c.rules.is_none());
    }
}
