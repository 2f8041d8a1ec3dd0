//! In-memory registry of users and committees.
//!
//! The registry lives for the process only; durable state is limited to the
//! reminder markers and read-notification ids in the kv store. `seeded()`
//! loads the sample dataset the app ships with.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Refusal;
use crate::model::{
    Committee, CommitteeStatus, Draw, Member, MemberStatus, PaymentRecord, PaymentStatus, Role,
    User,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    users: Vec<User>,
    committees: Vec<Committee>,
}

impl Directory {
    pub fn new(users: Vec<User>, committees: Vec<Committee>) -> Self {
        Self { users, committees }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn committees(&self) -> &[Committee] {
        &self.committees
    }

    pub fn committee(&self, id: &str) -> Option<&Committee> {
        self.committees.iter().find(|c| c.id == id)
    }

    /// The committees a user sees: admins see the ones they run, members
    /// the ones they participate in.
    pub fn committees_for(&self, user: &User) -> Vec<&Committee> {
        self.committees
            .iter()
            .filter(|c| match user.role {
                Role::Admin => c.admin_id == user.id,
                Role::Member => c.has_member(&user.id),
            })
            .collect()
    }

    /// Ids of the committees a user sees, for ledger filtering.
    pub fn committee_ids_for(&self, user: &User) -> Vec<&str> {
        self.committees_for(user)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect()
    }

    // ── Mutation publication ─────────────────────────────────────────

    /// Swap in an updated committee value wholesale. This is the single
    /// publication point for mutations: readers see the old value or the
    /// new one, never a mix.
    pub fn replace_committee(&mut self, updated: Committee) -> Result<(), Refusal> {
        match self.committees.iter_mut().find(|c| c.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                Ok(())
            }
            None => Err(Refusal::CommitteeNotFound { id: updated.id }),
        }
    }

    pub fn add_committee(&mut self, committee: Committee) {
        self.committees.push(committee);
    }

    // ── Sample dataset ───────────────────────────────────────────────

    /// The sample dataset: five users, two running committees.
    pub fn seeded() -> Self {
        let users = vec![
            user("user-1", "Ramesh Patel", "9876543210", Role::Admin),
            user("user-2", "Sita Sharma", "9876543211", Role::Member),
            user("user-3", "Amit Kumar", "9876543212", Role::Member),
            user("user-4", "Priya Singh", "9876543213", Role::Member),
            user("user-5", "Vijay Verma", "9876543214", Role::Member),
        ];

        let office = Committee {
            id: "committee-1".into(),
            name: "Office Friends Bachat".into(),
            admin_id: "user-1".into(),
            monthly_amount: 5000,
            total_members: 4,
            duration: 4,
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            payment_due_day: 7,
            status: CommitteeStatus::Active,
            members: vec![
                member(
                    "user-2",
                    "Sita Sharma",
                    "9876543211",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Late)],
                    false,
                ),
                member(
                    "user-3",
                    "Amit Kumar",
                    "9876543212",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    true,
                ),
                member(
                    "user-4",
                    "Priya Singh",
                    "9876543213",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Pending)],
                    false,
                ),
                member(
                    "user-1",
                    "Ramesh Patel",
                    "9876543210",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    false,
                ),
            ],
            draw_history: vec![Draw {
                cycle: 1,
                winner_id: "user-3".into(),
                timestamp: Utc.with_ymd_and_hms(2024, 8, 7, 12, 0, 0).unwrap(),
            }],
            rules: Some(
                "1. All payments must be made by the 5th of each month.\n\
                 2. Late payments will incur a small penalty.\n\
                 3. The draw will be held on the 7th of each month."
                    .into(),
            ),
            whatsapp_group_url: Some("https://chat.whatsapp.com/sampleinvite123".into()),
        };

        let family = Committee {
            id: "committee-2".into(),
            name: "Family Fortune Fund".into(),
            admin_id: "user-1".into(),
            monthly_amount: 10000,
            total_members: 5,
            duration: 5,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
            payment_due_day: 7,
            status: CommitteeStatus::Active,
            members: vec![
                member(
                    "user-1",
                    "Ramesh Patel",
                    "9876543210",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    false,
                ),
                member(
                    "user-2",
                    "Sita Sharma",
                    "9876543211",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    false,
                ),
                member(
                    "user-3",
                    "Amit Kumar",
                    "9876543212",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Pending)],
                    false,
                ),
                member(
                    "user-4",
                    "Priya Singh",
                    "9876543213",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    true,
                ),
                member(
                    "user-5",
                    "Vijay Verma",
                    "9876543214",
                    &[(1, PaymentStatus::Paid), (2, PaymentStatus::Paid)],
                    false,
                ),
            ],
            draw_history: vec![Draw {
                cycle: 1,
                winner_id: "user-4".into(),
                timestamp: Utc.with_ymd_and_hms(2024, 7, 22, 12, 0, 0).unwrap(),
            }],
            rules: None,
            whatsapp_group_url: None,
        };

        Self::new(users, vec![office, family])
    }
}

fn user(id: &str, name: &str, mobile: &str, role: Role) -> User {
    User {
        id: id.into(),
        name: name.into(),
        mobile: mobile.into(),
        role,
    }
}

fn member(
    user_id: &str,
    name: &str,
    mobile: &str,
    records: &[(u32, PaymentStatus)],
    has_won: bool,
) -> Member {
    Member {
        user_id: user_id.into(),
        name: name.into(),
        mobile: mobile.into(),
        status: MemberStatus::Active,
        payment_history: records
            .iter()
            .map(|&(cycle, status)| PaymentRecord { cycle, status })
            .collect(),
        has_won,
    }
}
