use serde::{Deserialize, Serialize};

use super::user::User;

/// Per-cycle payment state for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Late,
}

impl PaymentStatus {
    /// Advance one step along the admin's marking cycle:
    /// `Pending -> Paid -> Late -> Pending`. Total over all inputs.
    pub fn next(self) -> Self {
        match self {
            PaymentStatus::Pending => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Late,
            PaymentStatus::Late => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
}

/// One payment record per cycle number, at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub cycle: u32,
    pub status: PaymentStatus,
}

/// A committee membership. Owned by exactly one committee.
///
/// `has_won` is per-membership: the same user joining a different committee
/// starts with independent winner state there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user_id: String,
    pub name: String,
    pub mobile: String,
    pub status: MemberStatus,
    pub payment_history: Vec<PaymentRecord>,
    pub has_won: bool,
}

impl Member {
    /// Fresh membership for a user: empty payment history, never won.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            mobile: user.mobile.clone(),
            status: MemberStatus::Active,
            payment_history: Vec::new(),
            has_won: false,
        }
    }

    /// Payment status for `cycle`. A missing record reads as `Pending`.
    pub fn payment_status_for(&self, cycle: u32) -> PaymentStatus {
        self.payment_history
            .iter()
            .find(|p| p.cycle == cycle)
            .map(|p| p.status)
            .unwrap_or(PaymentStatus::Pending)
    }

    /// Whether an explicit record exists for `cycle`.
    pub fn has_record_for(&self, cycle: u32) -> bool {
        self.payment_history.iter().any(|p| p.cycle == cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycle_is_three_state() {
        assert_eq!(PaymentStatus::Pending.next(), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::Paid.next(), PaymentStatus::Late);
        assert_eq!(PaymentStatus::Late.next(), PaymentStatus::Pending);
    }

    #[test]
    fn status_cycle_returns_after_three_steps() {
        for start in [PaymentStatus::Paid, PaymentStatus::Pending, PaymentStatus::Late] {
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn missing_record_reads_pending() {
        let user = User {
            id: "user-9".into(),
            name: "Asha".into(),
            mobile: "9000000000".into(),
            role: crate::model::Role::Member,
        };
        let member = Member::from_user(&user);
        assert_eq!(member.payment_status_for(1), PaymentStatus::Pending);
        assert!(!member.has_record_for(1));
    }
}
