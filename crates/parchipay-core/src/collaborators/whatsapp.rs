//! Outbound WhatsApp handoff.
//!
//! Message composition is pure; `share` builds a `wa.me` link and hands it
//! to the platform's opener for a user-initiated send. Fire-and-forget:
//! there is no delivery confirmation and failures never propagate.

use indoc::formatdoc;

use crate::model::{Committee, Member, PaymentStatus};

/// Announcement for a freshly committed draw. Expects the updated
/// committee, so the last recorded draw is the one being announced.
pub fn winner_announcement(committee: &Committee, winner: &Member) -> String {
    let cycle = committee
        .draw_history
        .last()
        .map(|d| d.cycle)
        .unwrap_or_else(|| committee.current_cycle());
    formatdoc! {"
        \u{1f389} *Winner Announcement!* \u{1f389}

        Congratulations to *{winner}*!

        They have won the draw for Month {cycle} in our committee, *\"{name}\"*.

        Let's all wish them the best!

        - Sent via ParchiPay",
        winner = winner.name,
        cycle = cycle,
        name = committee.name,
    }
}

/// Group reminder listing members who have not paid for the current cycle.
///
/// `None` when every non-winner has settled up (nothing worth sending).
/// Late payers are deliberately not chased again here.
pub fn payment_reminder(committee: &Committee) -> Option<String> {
    let cycle = committee.current_cycle();
    let pending: Vec<&Member> = committee
        .members
        .iter()
        .filter(|m| !m.has_won && m.payment_status_for(cycle) == PaymentStatus::Pending)
        .collect();

    if pending.is_empty() {
        return None;
    }

    let names = pending
        .iter()
        .map(|m| format!("- {}", m.name))
        .collect::<Vec<_>>()
        .join("\n");

    Some(formatdoc! {"
        \u{1f514} *Payment Reminder for \"{name}\"* \u{1f514}

        Hello everyone,

        This is a friendly reminder that the payment of *\u{20b9}{amount}* for Month {cycle} is due soon.

        The following members still need to complete their payment:
        {names}

        Please make your payment on time to ensure the draw can happen smoothly.

        Thank you!

        - Sent via ParchiPay",
        name = committee.name,
        amount = committee.monthly_amount,
        cycle = cycle,
        names = names,
    })
}

/// The universal share link for a pre-filled message.
pub fn share_url(message: &str) -> String {
    format!("https://wa.me/?text={}", urlencoding::encode(message))
}

/// Hand a message off to the external messaging app.
///
/// No return value and no delivery guarantee; a failed handoff is reported
/// on stderr and otherwise ignored.
pub fn share(message: &str) {
    let url = share_url(message);
    if let Err(e) = open::that(&url) {
        eprintln!("whatsapp handoff failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;

    #[test]
    fn announcement_names_winner_and_drawn_month() {
        let dir = Directory::seeded();
        let committee = dir.committee("committee-1").unwrap();
        let winner = committee.member("user-3").unwrap();
        let message = winner_announcement(committee, winner);
        assert!(message.contains("Amit Kumar"));
        assert!(message.contains("Month 1"));
        assert!(message.contains("Office Friends Bachat"));
        assert!(message.ends_with("- Sent via ParchiPay"));
    }

    #[test]
    fn reminder_lists_only_pending_non_winners() {
        let dir = Directory::seeded();
        // committee-1 cycle 2: Sita is Late, Priya Pending, Amit won, admin Paid.
        let message = payment_reminder(dir.committee("committee-1").unwrap()).unwrap();
        assert!(message.contains("- Priya Singh"));
        assert!(!message.contains("- Sita Sharma"));
        assert!(!message.contains("- Amit Kumar"));
        assert!(message.contains("Month 2"));
        assert!(message.contains("\u{20b9}5000"));
    }

    #[test]
    fn reminder_is_none_when_everyone_settled() {
        let dir = Directory::seeded();
        let mut committee = dir.committee("committee-1").unwrap().clone();
        for member in &mut committee.members {
            for record in &mut member.payment_history {
                record.status = PaymentStatus::Paid;
            }
        }
        assert!(payment_reminder(&committee).is_none());
    }

    #[test]
    fn share_url_is_percent_encoded() {
        let url = share_url("hello world & friends");
        assert!(url.starts_with("https://wa.me/?text="));
        assert!(url.contains("hello%20world%20%26%20friends"));
        assert!(!url.contains(' '));
    }
}
